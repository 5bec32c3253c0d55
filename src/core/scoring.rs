use crate::core::elements::{harmony, profile_compatibility, CROSS_ELEMENT_COMPATIBILITY, SAME_ELEMENT_COMPATIBILITY};
use crate::core::planets::planet_element;
use crate::core::quantities::AlchemicalState;
use crate::domain::model::{ElementalProperties, Planet};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileScore {
    pub harmony: f64,
    /// Table compatibility rescaled from [0.7, 0.9] to [0, 1].
    pub compatibility: f64,
    pub hour_alignment: f64,
    pub total: f64,
}

/// Scores an ingredient or recipe profile against the sky's current state.
pub fn score_profile(
    profile: &ElementalProperties,
    state: &AlchemicalState,
    hour_ruler: Option<Planet>,
) -> ProfileScore {
    let normalized = profile.normalized();
    let harmony = harmony(&normalized, &state.elemental_balance);

    let raw = profile_compatibility(&normalized, &state.elemental_balance);
    let span = SAME_ELEMENT_COMPATIBILITY - CROSS_ELEMENT_COMPATIBILITY;
    let compatibility = ((raw - CROSS_ELEMENT_COMPATIBILITY) / span).clamp(0.0, 1.0);

    let hour_alignment = match hour_ruler.and_then(planet_element) {
        Some(element) if element == normalized.dominant() => 1.0,
        _ => 0.5,
    };

    ProfileScore {
        harmony,
        compatibility,
        hour_alignment,
        total: 0.5 * harmony + 0.3 * compatibility + 0.2 * hour_alignment,
    }
}
