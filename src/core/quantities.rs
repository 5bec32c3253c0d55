//! Spirit, essence, matter and substance: the four alchemical quantities,
//! for a recipe at the stove and for a chart as a whole.

use crate::core::planets::planet_element;
use crate::core::thermodynamics::{kalchm, monica, thermodynamics, ThermodynamicMetrics};
use crate::domain::model::{
    Element, ElementalProperties, Planet, PlanetarySnapshot, PositionSource, ZodiacSign,
};
use serde::{Deserialize, Serialize};

const UNKNOWN_DENSITY: f64 = 0.5;
const WATER_HOUR_BONUS: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlchemicalQuantities {
    pub spirit: f64,
    pub essence: f64,
    pub matter: f64,
    pub substance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecipeQuantities {
    #[serde(flatten)]
    pub quantities: AlchemicalQuantities,
    pub kinetic: f64,
    pub thermo: f64,
}

pub fn recipe_quantities(
    profile: Option<&ElementalProperties>,
    calories: Option<f64>,
    kinetic: f64,
    thermo: f64,
    hour_ruler: Option<Planet>,
) -> RecipeQuantities {
    let p = profile.copied().unwrap_or_default();
    let bonus = if hour_ruler.and_then(planet_element) == Some(Element::Water) {
        WATER_HOUR_BONUS
    } else {
        0.0
    };
    let density = calories.map(|c| c / 1000.0).unwrap_or(UNKNOWN_DENSITY);

    let quantities = AlchemicalQuantities {
        spirit: (0.5 * kinetic + 0.25 * p.air + 0.25 * p.fire).min(1.0),
        essence: (0.7 * p.water + 0.3 * bonus).min(1.0),
        matter: (0.6 * density + 0.4 * p.earth).min(1.0),
        substance: (0.5 * thermo + 0.25 * p.earth + 0.25 * p.water).min(1.0),
    };
    RecipeQuantities {
        quantities,
        kinetic,
        thermo,
    }
}

fn chart_weight(planet: Planet) -> f64 {
    match planet {
        Planet::Sun | Planet::Moon | Planet::Ascendant => 3.0,
        Planet::Mercury | Planet::Venus | Planet::Mars => 1.5,
        Planet::Jupiter | Planet::Saturn => 1.0,
        Planet::Uranus | Planet::Neptune | Planet::Pluto | Planet::NorthNode => 0.5,
        Planet::SouthNode => 1.0,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Weighted share of each element among the occupied signs.
pub fn chart_balance(snapshot: &PlanetarySnapshot) -> ElementalProperties {
    let mut balance = ElementalProperties::new(0.0, 0.0, 0.0, 0.0);
    let mut total = 0.0;
    for (planet, position) in &snapshot.positions {
        let weight = chart_weight(*planet);
        let element = position.sign.element();
        balance.set(element, balance.get(element) + weight);
        total += weight;
    }
    if total <= 0.0 {
        return ElementalProperties::balanced();
    }
    ElementalProperties::new(
        balance.fire / total,
        balance.water / total,
        balance.earth / total,
        balance.air / total,
    )
}

pub fn natal_quantities(snapshot: &PlanetarySnapshot) -> AlchemicalQuantities {
    let b = chart_balance(snapshot);
    AlchemicalQuantities {
        spirit: round3(0.6 * b.fire + 0.4 * b.air),
        essence: round3(0.6 * b.water + 0.4 * b.air),
        matter: round3(0.6 * b.earth + 0.4 * b.water),
        substance: round3(0.6 * b.earth + 0.4 * b.fire),
    }
}

/// Everything the engine derives from one snapshot of the sky.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlchemicalState {
    pub elemental_balance: ElementalProperties,
    pub quantities: AlchemicalQuantities,
    pub thermodynamics: ThermodynamicMetrics,
    pub kalchm: f64,
    pub monica: f64,
    pub sun_sign: Option<ZodiacSign>,
    pub moon_sign: Option<ZodiacSign>,
    pub dominant_element: Element,
    pub source: PositionSource,
}

pub fn alchemize(snapshot: &PlanetarySnapshot) -> AlchemicalState {
    let elemental_balance = chart_balance(snapshot);
    let quantities = natal_quantities(snapshot);
    let metrics = thermodynamics(&elemental_balance);
    let k = kalchm(&quantities);

    AlchemicalState {
        elemental_balance,
        quantities,
        thermodynamics: metrics,
        kalchm: k,
        monica: monica(&metrics, k),
        sun_sign: snapshot.sign_of(Planet::Sun),
        moon_sign: snapshot.sign_of(Planet::Moon),
        dominant_element: elemental_balance.dominant(),
        source: snapshot.source,
    }
}
