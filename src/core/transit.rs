//! Transits against a natal chart, recipe potency and cooking rituals.

use crate::core::lunar::CookingWindow;
use crate::core::planets::planet_element;
use crate::core::zodiac::angular_separation;
use crate::domain::model::{Element, ElementalProperties, Planet, PlanetarySnapshot, Recipe};
use serde::Serialize;

pub const DEFAULT_ORB_DEG: f64 = 1.0;

const PRIORITY: [Planet; 4] = [Planet::Sun, Planet::Mars, Planet::Venus, Planet::Saturn];

/// First body whose current position sits within `orb` of its natal one.
/// Sun, Mars, Venus and Saturn are checked first.
pub fn dominant_transit(
    natal: &PlanetarySnapshot,
    current: &PlanetarySnapshot,
    orb: f64,
) -> Option<Planet> {
    let rest = Planet::ALL.into_iter().filter(|p| !PRIORITY.contains(p));
    PRIORITY.into_iter().chain(rest).find(|&planet| {
        match (natal.longitude_of(planet), current.longitude_of(planet)) {
            (Some(a), Some(b)) => angular_separation(a, b) < orb,
            _ => false,
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Potency {
    pub total: f64,
    pub kinetic: f64,
    pub thermo: f64,
}

fn thermodynamic_parity(element: Option<Element>) -> f64 {
    match element {
        Some(Element::Fire) => 1.0,
        Some(Element::Air) => 0.7,
        Some(Element::Earth) => 0.5,
        Some(Element::Water) => 0.3,
        None => 0.5,
    }
}

fn is_steam(sun: Element, hour: Element) -> bool {
    matches!(
        (sun, hour),
        (Element::Fire, Element::Water)
            | (Element::Water, Element::Fire)
            | (Element::Air, Element::Earth)
            | (Element::Earth, Element::Air)
    )
}

pub fn total_potency(
    profile: Option<&ElementalProperties>,
    transit: Option<Planet>,
    sun_element: Option<Element>,
    hour_ruler: Option<Planet>,
) -> Potency {
    let recipe_element = profile.map(|p| p.dominant());
    let hour_element = hour_ruler.and_then(planet_element);

    let alignment = if transit.is_some() { 1.0 } else { 0.5 };
    let elemental_match = match (sun_element, recipe_element) {
        (Some(sun), Some(recipe)) if sun == recipe => 1.0,
        _ => 0.5,
    };
    let parity = thermodynamic_parity(recipe_element);
    let hour_bonus = match (hour_element, recipe_element) {
        (Some(hour), Some(recipe)) if hour == recipe => 0.25,
        _ => 0.0,
    };

    let mut kinetic = match transit {
        Some(Planet::Mars) => 1.0,
        Some(Planet::Venus) => 0.3,
        Some(Planet::Saturn) => 0.1,
        _ => 0.5,
    };
    if let (Some(sun), Some(hour)) = (sun_element, hour_element) {
        if is_steam(sun, hour) {
            kinetic *= 1.5;
        }
    }

    Potency {
        total: 0.4 * alignment + 0.3 * elemental_match + 0.3 * parity + hour_bonus,
        kinetic,
        thermo: parity,
    }
}

pub fn cooking_ritual(recipe: &Recipe, transit: Option<Planet>) -> String {
    let name = recipe.name.to_lowercase();
    let description = recipe.description.to_lowercase();
    let title = &recipe.name;

    match transit {
        Some(Planet::Mars) if name.contains("stir-fry") || description.contains("saute") => format!(
            "For '{title}', embrace the fiery energy of Mars. Use high heat and quick, aggressive motions. \
             Channel your energy into the sizzle of the pan. This is a ritual of action and transformation."
        ),
        Some(Planet::Mars) => format!(
            "For '{title}', stir with intention and energy. Embrace the transformative power of fire and heat. \
             This is a moment of action and creation."
        ),
        Some(Planet::Venus) if name.contains("salad") || description.contains("garnish") => format!(
            "For '{title}', focus on the beauty and aesthetics of the dish. Arrange the ingredients with care \
             and artistry. Appreciate the colors, textures, and aromas. This is a ritual of love and pleasure."
        ),
        Some(Planet::Venus) => format!(
            "For '{title}', focus on the beauty of the ingredients. Appreciate the colors, textures, and aromas. \
             This is an act of love and pleasure."
        ),
        Some(Planet::Saturn)
            if name.contains("soup") || name.contains("stew") || description.contains("braise") =>
        {
            format!(
                "For '{title}', move with deliberation and patience. Connect with the slow nourishment of the \
                 earth. Allow the flavors to meld and deepen over time. This is a ritual of grounding and stability."
            )
        }
        Some(Planet::Saturn) => format!(
            "For '{title}', move with deliberation and patience. Connect with the earth and the slow \
             nourishment it provides. This is a ritual of grounding and stability."
        ),
        _ => format!("For '{title}', simply cook with mindfulness and enjoy the moment."),
    }
}

/// Start of the first window whose food type appears in the recipe's
/// category, as `YYYY-MM-DDTHH:MM:00`.
pub fn suggested_timestamp(recipe: &Recipe, windows: &[CookingWindow]) -> Option<String> {
    let category = recipe.category.to_lowercase();
    windows
        .iter()
        .find(|window| category.contains(&window.food_type.to_lowercase()))
        .map(|window| format!("{}T{}:00", window.date, window.start_time))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookingInstruction {
    pub recipe_id: String,
    pub dominant_transit: Option<Planet>,
    pub ritual_instruction: String,
    pub suggested_timestamp: Option<String>,
    pub total_potency: f64,
    pub kinetic_rating: f64,
    pub thermo_rating: f64,
}

/// Ritual text, timing and potency for cooking one recipe now.
pub fn cooking_instruction(
    recipe: &Recipe,
    transit: Option<Planet>,
    sun_element: Option<Element>,
    hour_ruler: Option<Planet>,
    windows: &[CookingWindow],
) -> CookingInstruction {
    let potency = total_potency(
        recipe.elemental_properties.as_ref(),
        transit,
        sun_element,
        hour_ruler,
    );
    CookingInstruction {
        recipe_id: recipe.id.clone(),
        dominant_transit: transit,
        ritual_instruction: cooking_ritual(recipe, transit),
        suggested_timestamp: suggested_timestamp(recipe, windows),
        total_potency: potency.total,
        kinetic_rating: potency.kinetic,
        thermo_rating: potency.thermo,
    }
}
