use crate::core::elements::harmony;
use crate::domain::model::ElementalProperties;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chakra {
    Root,
    Sacral,
    SolarPlexus,
    Heart,
    Throat,
    ThirdEye,
    Crown,
}

impl Chakra {
    pub const ALL: [Chakra; 7] = [
        Chakra::Root,
        Chakra::Sacral,
        Chakra::SolarPlexus,
        Chakra::Heart,
        Chakra::Throat,
        Chakra::ThirdEye,
        Chakra::Crown,
    ];

    pub fn blend(&self) -> ElementalProperties {
        match self {
            Chakra::Root => ElementalProperties::new(0.1, 0.2, 0.7, 0.0),
            Chakra::Sacral => ElementalProperties::new(0.1, 0.7, 0.2, 0.0),
            Chakra::SolarPlexus => ElementalProperties::new(0.7, 0.0, 0.1, 0.2),
            Chakra::Heart => ElementalProperties::new(0.1, 0.3, 0.0, 0.6),
            Chakra::Throat => ElementalProperties::new(0.1, 0.2, 0.0, 0.7),
            Chakra::ThirdEye => ElementalProperties::new(0.2, 0.4, 0.0, 0.4),
            Chakra::Crown => ElementalProperties::new(0.4, 0.1, 0.0, 0.5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChakraResonance {
    pub chakra: Chakra,
    pub harmony: f64,
}

/// All chakras ranked by harmony with `profile`, strongest first.
pub fn resonance(profile: &ElementalProperties) -> Vec<ChakraResonance> {
    let profile = profile.normalized();
    let mut ranked: Vec<ChakraResonance> = Chakra::ALL
        .into_iter()
        .map(|chakra| ChakraResonance {
            chakra,
            harmony: harmony(&profile, &chakra.blend()),
        })
        .collect();
    // stable sort keeps Root..Crown order among equals
    ranked.sort_by(|a, b| b.harmony.total_cmp(&a.harmony));
    ranked
}

pub fn dominant_chakra(profile: &ElementalProperties) -> Chakra {
    resonance(profile)
        .first()
        .map(|r| r.chakra)
        .unwrap_or(Chakra::Root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blends_sum_to_one() {
        for chakra in Chakra::ALL {
            assert!((chakra.blend().total() - 1.0).abs() < 1e-9, "{:?}", chakra);
        }
    }

    #[test]
    fn test_dominant_chakra_follows_profile() {
        let grounded = ElementalProperties::new(0.05, 0.15, 0.8, 0.0);
        assert_eq!(dominant_chakra(&grounded), Chakra::Root);

        let fiery = ElementalProperties::new(0.8, 0.0, 0.0, 0.2);
        assert_eq!(dominant_chakra(&fiery), Chakra::SolarPlexus);
    }

    #[test]
    fn test_resonance_is_sorted() {
        let ranked = resonance(&ElementalProperties::balanced());
        assert_eq!(ranked.len(), 7);
        for pair in ranked.windows(2) {
            assert!(pair[0].harmony >= pair[1].harmony);
        }
    }
}
