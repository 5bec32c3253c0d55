use crate::core::quantities::{chart_balance, natal_quantities, AlchemicalQuantities};
use crate::domain::model::{Element, ElementalProperties, PlanetarySnapshot};
use serde::Serialize;

/// One diner's contribution to a shared meal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemberChart {
    pub elemental_distribution: ElementalProperties,
    pub smes: AlchemicalQuantities,
}

impl MemberChart {
    pub fn from_snapshot(snapshot: &PlanetarySnapshot) -> Self {
        Self {
            elemental_distribution: chart_balance(snapshot),
            smes: natal_quantities(snapshot),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmonizingProfile {
    #[serde(rename = "Spirit-boosting (Kinetic)")]
    SpiritBoosting,
    #[serde(rename = "Matter-grounding (Stabilizing)")]
    MatterGrounding,
}

impl HarmonizingProfile {
    pub fn label(&self) -> &'static str {
        match self {
            HarmonizingProfile::SpiritBoosting => "Spirit-boosting (Kinetic)",
            HarmonizingProfile::MatterGrounding => "Matter-grounding (Stabilizing)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEquilibrium {
    pub participant_count: usize,
    pub average_elemental_distribution: ElementalProperties,
    /// 0.25 minus each element's share; positive means the table lacks it.
    pub elemental_deficits: ElementalProperties,
    pub group_smes_scores: AlchemicalQuantities,
    pub is_collective: bool,
    pub harmonizing_profile: HarmonizingProfile,
}

pub fn group_equilibrium(members: &[MemberChart]) -> Option<GroupEquilibrium> {
    if members.is_empty() {
        return None;
    }
    let count = members.len() as f64;

    let mut elements = ElementalProperties::new(0.0, 0.0, 0.0, 0.0);
    let mut smes = AlchemicalQuantities::default();
    for member in members {
        for (element, value) in member.elemental_distribution.iter() {
            elements.set(element, elements.get(element) + value / count);
        }
        smes.spirit += member.smes.spirit / count;
        smes.essence += member.smes.essence / count;
        smes.matter += member.smes.matter / count;
        smes.substance += member.smes.substance / count;
    }

    let mass = if elements.total() == 0.0 {
        1.0
    } else {
        elements.total()
    };
    let mut average = elements;
    let mut deficits = elements;
    for element in Element::ALL {
        let share = elements.get(element) / mass;
        average.set(element, share);
        deficits.set(element, 0.25 - share);
    }

    let harmonizing_profile = match deficits.dominant() {
        Element::Fire | Element::Air => HarmonizingProfile::SpiritBoosting,
        Element::Earth | Element::Water => HarmonizingProfile::MatterGrounding,
    };

    Some(GroupEquilibrium {
        participant_count: members.len(),
        average_elemental_distribution: average,
        elemental_deficits: deficits,
        group_smes_scores: smes,
        is_collective: members.len() > 1,
        harmonizing_profile,
    })
}

/// Potency multiplier when the current hour feeds what the group lacks.
pub fn collective_modifier(profile: HarmonizingProfile, hour_element: Option<Element>) -> f64 {
    match (profile, hour_element) {
        (HarmonizingProfile::SpiritBoosting, Some(Element::Fire))
        | (HarmonizingProfile::MatterGrounding, Some(Element::Earth)) => 1.2,
        _ => 1.0,
    }
}
