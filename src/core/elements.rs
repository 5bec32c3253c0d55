//! Elemental compatibility and profile comparison.
//!
//! Every pairing of elements is compatible. Like pairs with like most
//! strongly (0.9); any two different elements sit at 0.7.

use crate::domain::model::{Element, ElementalProperties};

pub const SAME_ELEMENT_COMPATIBILITY: f64 = 0.9;
pub const CROSS_ELEMENT_COMPATIBILITY: f64 = 0.7;

pub fn compatibility(a: Element, b: Element) -> f64 {
    if a == b {
        SAME_ELEMENT_COMPATIBILITY
    } else {
        CROSS_ELEMENT_COMPATIBILITY
    }
}

/// Expected table compatibility between two profiles, in [0.7, 0.9].
pub fn profile_compatibility(a: &ElementalProperties, b: &ElementalProperties) -> f64 {
    let a = a.normalized();
    let b = b.normalized();
    let mut score = 0.0;
    for (ea, wa) in a.iter() {
        for (eb, wb) in b.iter() {
            score += wa * wb * compatibility(ea, eb);
        }
    }
    score
}

/// 1 minus the mean absolute difference of the four weights.
pub fn harmony(a: &ElementalProperties, b: &ElementalProperties) -> f64 {
    let distance: f64 = Element::ALL
        .iter()
        .map(|&e| (a.get(e) - b.get(e)).abs())
        .sum();
    1.0 - distance / 4.0
}

/// Weighted average of several profiles.
pub fn blend(parts: &[(ElementalProperties, f64)]) -> ElementalProperties {
    let total_weight: f64 = parts.iter().map(|(_, w)| w.max(0.0)).sum();
    if total_weight <= 0.0 {
        return ElementalProperties::balanced();
    }

    let mut mixed = ElementalProperties::new(0.0, 0.0, 0.0, 0.0);
    for (profile, weight) in parts {
        let weight = weight.max(0.0) / total_weight;
        for (element, value) in profile.normalized().iter() {
            mixed.set(element, mixed.get(element) + value * weight);
        }
    }
    mixed.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatibility_table() {
        assert_eq!(compatibility(Element::Fire, Element::Fire), 0.9);
        assert_eq!(compatibility(Element::Fire, Element::Water), 0.7);
        for a in Element::ALL {
            for b in Element::ALL {
                assert_eq!(compatibility(a, b), compatibility(b, a));
            }
        }
    }

    #[test]
    fn test_profile_compatibility_bounds() {
        let fire = ElementalProperties::new(1.0, 0.0, 0.0, 0.0);
        let water = ElementalProperties::new(0.0, 1.0, 0.0, 0.0);
        assert!((profile_compatibility(&fire, &fire) - 0.9).abs() < 1e-12);
        assert!((profile_compatibility(&fire, &water) - 0.7).abs() < 1e-12);

        let balanced = ElementalProperties::balanced();
        let mixed = profile_compatibility(&balanced, &balanced);
        assert!((mixed - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_harmony() {
        let a = ElementalProperties::balanced();
        assert_eq!(harmony(&a, &a), 1.0);

        let fire = ElementalProperties::new(1.0, 0.0, 0.0, 0.0);
        let water = ElementalProperties::new(0.0, 1.0, 0.0, 0.0);
        assert!((harmony(&fire, &water) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_blend() {
        let fire = ElementalProperties::new(1.0, 0.0, 0.0, 0.0);
        let earth = ElementalProperties::new(0.0, 0.0, 1.0, 0.0);
        let mixed = blend(&[(fire, 3.0), (earth, 1.0)]);
        assert!((mixed.fire - 0.75).abs() < 1e-12);
        assert!((mixed.earth - 0.25).abs() < 1e-12);

        assert_eq!(blend(&[]), ElementalProperties::balanced());
    }
}
