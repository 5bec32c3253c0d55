use crate::domain::model::{Element, RitualEntry};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

const LOOKBACK_DAYS: i64 = 7;
const DOMINANCE_RATIO: f64 = 1.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceRecommendation {
    #[serde(rename = "type")]
    pub kind: String,
    /// `None` when the axis is already balanced.
    pub elemental_focus: Option<Element>,
    pub ritual_suggestion: String,
    pub kinetic_boost_needed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceAnalysis {
    pub analysis: String,
    pub average_spirit: Option<f64>,
    pub average_matter: Option<f64>,
    pub recommendation: Option<BalanceRecommendation>,
}

/// Compares spirit against matter across the past week of rituals.
pub fn analyze_balance(history: &[RitualEntry], now: DateTime<Utc>) -> BalanceAnalysis {
    let since = now - Duration::days(LOOKBACK_DAYS);
    let recent: Vec<&RitualEntry> = history
        .iter()
        .filter(|entry| entry.created_at >= since && entry.created_at <= now)
        .collect();

    if recent.is_empty() {
        return BalanceAnalysis {
            analysis: "No recent ritual history to analyze.".to_string(),
            average_spirit: None,
            average_matter: None,
            recommendation: None,
        };
    }

    let count = recent.len() as f64;
    let spirit = recent.iter().filter_map(|e| e.spirit_score).sum::<f64>() / count;
    let matter = recent.iter().filter_map(|e| e.matter_score).sum::<f64>() / count;

    let recommendation = if matter > spirit * DOMINANCE_RATIO {
        BalanceRecommendation {
            kind: "Alchemical Axis Restoration".to_string(),
            elemental_focus: Some(Element::Air),
            ritual_suggestion: "To restore alchemical balance, engage in a high-kinetic 'Air' ritual. \
                Focus on light, airy foods, rapid stirring motions, and dynamic meal preparation to boost Spirit energy."
                .to_string(),
            kinetic_boost_needed: true,
        }
    } else if spirit > matter * DOMINANCE_RATIO {
        BalanceRecommendation {
            kind: "Alchemical Axis Grounding".to_string(),
            elemental_focus: Some(Element::Earth),
            ritual_suggestion: "To restore alchemical balance, engage in a grounding 'Earth' ritual. \
                Focus on root vegetables, slow cooking methods, and deliberate, mindful preparation to balance Matter energy."
                .to_string(),
            kinetic_boost_needed: false,
        }
    } else {
        BalanceRecommendation {
            kind: "Alchemical Balance Maintained".to_string(),
            elemental_focus: None,
            ritual_suggestion:
                "Your alchemical axis appears balanced. Continue with mindful cooking and ritual.".to_string(),
            kinetic_boost_needed: false,
        }
    };

    BalanceAnalysis {
        analysis: format!(
            "Alchemical Balance Analysis (last 7 days): Average Spirit Score: {:.2}, Average Matter Score: {:.2}.",
            spirit, matter
        ),
        average_spirit: Some(spirit),
        average_matter: Some(matter),
        recommendation: Some(recommendation),
    }
}
