use crate::core::chakra::ChakraResonance;
use crate::core::collective::GroupEquilibrium;
use crate::core::lunar::{CookingWindow, LunarPhaseInfo, Nakshatra};
use crate::core::menu::DailyMenu;
use crate::core::planets::PlanetaryHour;
use crate::core::quantities::AlchemicalState;
use crate::core::recommend::EnvironmentalRecommendation;
use crate::core::seasonal::SeasonalContext;
use crate::core::wellness::BalanceAnalysis;
use crate::domain::model::{GeoLocation, Planet, PlanetarySnapshot};
use crate::utils::error::{KitchenError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The output of one kitchen run: the sky, what it means, and what to cook.
#[derive(Debug, Clone, Serialize)]
pub struct KitchenReport {
    pub moment: DateTime<Utc>,
    pub location: GeoLocation,
    pub snapshot: PlanetarySnapshot,
    pub state: AlchemicalState,
    pub planetary_hour: PlanetaryHour,
    pub lunar_phase: Option<LunarPhaseInfo>,
    pub lunar_mansion: Option<Nakshatra>,
    pub cooking_windows: Vec<CookingWindow>,
    pub seasonal: SeasonalContext,
    pub dominant_transit: Option<Planet>,
    pub collective: Option<GroupEquilibrium>,
    pub chakras: Vec<ChakraResonance>,
    pub menu: DailyMenu,
    pub wellness: BalanceAnalysis,
    pub recommendations: Vec<EnvironmentalRecommendation>,
}

const CSV_HEADER: [&str; 15] = [
    "rank",
    "recipe_id",
    "name",
    "cuisine",
    "weighted_environmental_score",
    "environmental_match",
    "total_potency",
    "kinetic",
    "thermo",
    "spirit",
    "essence",
    "matter",
    "substance",
    "profile_score",
    "cooking_window",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: usize,
    recipe_id: &'a str,
    name: &'a str,
    cuisine: &'a str,
    weighted_environmental_score: f64,
    environmental_match: bool,
    total_potency: f64,
    kinetic: f64,
    thermo: f64,
    spirit: f64,
    essence: f64,
    matter: f64,
    substance: f64,
    profile_score: Option<f64>,
    cooking_window: Option<&'a str>,
}

impl KitchenReport {
    pub fn recommendations_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for (index, rec) in self.recommendations.iter().enumerate() {
            let q = &rec.quantities.quantities;
            writer.serialize(CsvRow {
                rank: index + 1,
                recipe_id: &rec.recipe_id,
                name: &rec.name,
                cuisine: &rec.cuisine,
                weighted_environmental_score: rec.weighted_environmental_score,
                environmental_match: rec.is_environmental_match,
                total_potency: rec.potency.total,
                kinetic: rec.quantities.kinetic,
                thermo: rec.quantities.thermo,
                spirit: q.spirit,
                essence: q.essence,
                matter: q.matter,
                substance: q.substance,
                profile_score: rec.profile_score.map(|s| s.total),
                cooking_window: rec.optimal_cooking_window.as_ref().map(|w| w.mansion),
            })?;
        }
        writer
            .into_inner()
            .map_err(|e| KitchenError::ProcessingError {
                message: format!("Failed to flush CSV output: {}", e),
            })
    }

    pub fn recommendations_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.recommendations)?)
    }

    /// Everything except the recommendation list.
    pub fn context_json(&self) -> Result<Vec<u8>> {
        let mut value = serde_json::to_value(self)?;
        if let Some(map) = value.as_object_mut() {
            map.remove("recommendations");
        }
        Ok(serde_json::to_vec_pretty(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::engine::{compose_report, ReportOptions};
    use crate::domain::model::{
        Catalog, GeoLocation, KitchenInput, Planet, PlanetaryPosition, PlanetarySnapshot,
        PositionSource, ZodiacSystem,
    };
    use chrono::{TimeZone, Utc};

    fn empty_report() -> super::KitchenReport {
        let moment = Utc.with_ymd_and_hms(2025, 3, 28, 18, 0, 0).unwrap();
        let snapshot = PlanetarySnapshot {
            moment,
            zodiac_system: ZodiacSystem::Tropical,
            source: PositionSource::Fallback,
            positions: [(Planet::Sun, PlanetaryPosition::from_longitude(8.5, false))]
                .into_iter()
                .collect(),
        };
        compose_report(
            KitchenInput {
                moment,
                location: GeoLocation::default(),
                snapshot,
                natal: None,
                participants: Vec::new(),
                catalog: Catalog::default(),
                history: Vec::new(),
            },
            &ReportOptions::default(),
        )
    }

    #[test]
    fn test_csv_keeps_header_without_recommendations() {
        let report = empty_report();
        assert!(report.recommendations.is_empty());

        let csv = String::from_utf8(report.recommendations_csv().unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("rank,recipe_id,name,cuisine"));
        assert!(lines[0].ends_with("profile_score,cooking_window"));
    }

    #[test]
    fn test_context_json_omits_recommendations() {
        let report = empty_report();
        let context: serde_json::Value =
            serde_json::from_slice(&report.context_json().unwrap()).unwrap();
        assert!(context.get("recommendations").is_none());
        assert!(context.get("seasonal").is_some());
    }
}
