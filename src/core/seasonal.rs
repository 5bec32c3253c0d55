use crate::core::zodiac::sun_sign_for_date;
use crate::domain::model::{Element, ZodiacSign};
use chrono::NaiveDate;
use serde::Serialize;

const IN_SEASON: f64 = 1.2;
const OUT_OF_SEASON: f64 = 0.9;

pub fn boost_keywords(element: Element) -> &'static [&'static str] {
    match element {
        Element::Fire => &["chili", "pepper", "garlic"],
        Element::Earth => &["grains", "potatoes", "squash"],
        Element::Air => &["microgreens", "sprouts"],
        Element::Water => &["soups", "broths", "melons"],
    }
}

/// The zodiac season a date falls in and the ingredients it favors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalContext {
    pub sign: ZodiacSign,
    pub element: Element,
    pub boosted: Vec<&'static str>,
}

impl SeasonalContext {
    pub fn for_date(date: NaiveDate) -> Self {
        let sign = sun_sign_for_date(date);
        let element = sign.element();
        Self {
            sign,
            element,
            boosted: boost_keywords(element).to_vec(),
        }
    }
}

pub fn seasonal_modifier(ingredient_name: &str, context: &SeasonalContext) -> f64 {
    let name = ingredient_name.to_lowercase();
    let matched = Element::ALL
        .into_iter()
        .find(|&e| boost_keywords(e).iter().any(|kw| name.contains(kw)));
    match matched {
        Some(element) if element == context.element => IN_SEASON,
        Some(_) => OUT_OF_SEASON,
        None => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(month: u32, day: u32) -> SeasonalContext {
        SeasonalContext::for_date(NaiveDate::from_ymd_opt(2024, month, day).unwrap())
    }

    #[test]
    fn test_leo_season_boosts_fire() {
        let leo = context(8, 10);
        assert_eq!(leo.sign, ZodiacSign::Leo);
        assert_eq!(leo.element, Element::Fire);
        assert_eq!(leo.boosted, vec!["chili", "pepper", "garlic"]);
    }

    #[test]
    fn test_seasonal_modifier() {
        let taurus = context(5, 5);
        assert_eq!(seasonal_modifier("Roasted Potatoes", &taurus), 1.2);
        assert_eq!(seasonal_modifier("Black Pepper", &taurus), 0.9);
        assert_eq!(seasonal_modifier("Basil", &taurus), 1.0);
        // fire keywords are checked before earth ones
        assert_eq!(seasonal_modifier("Chili potatoes", &taurus), 0.9);
    }
}
