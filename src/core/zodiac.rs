use crate::domain::model::{normalize_degrees, ZodiacSign};
use chrono::{Datelike, NaiveDate};

pub fn sign_for_longitude(longitude: f64) -> ZodiacSign {
    ZodiacSign::from_index((normalize_degrees(longitude) / 30.0).floor() as usize)
}

/// Tropical sun sign by calendar date.
pub fn sun_sign_for_date(date: NaiveDate) -> ZodiacSign {
    let (month, day) = (date.month(), date.day());
    match (month, day) {
        (3, 21..=31) | (4, 1..=19) => ZodiacSign::Aries,
        (4, 20..=31) | (5, 1..=20) => ZodiacSign::Taurus,
        (5, 21..=31) | (6, 1..=20) => ZodiacSign::Gemini,
        (6, 21..=31) | (7, 1..=22) => ZodiacSign::Cancer,
        (7, 23..=31) | (8, 1..=22) => ZodiacSign::Leo,
        (8, 23..=31) | (9, 1..=22) => ZodiacSign::Virgo,
        (9, 23..=31) | (10, 1..=22) => ZodiacSign::Libra,
        (10, 23..=31) | (11, 1..=21) => ZodiacSign::Scorpio,
        (11, 22..=31) | (12, 1..=21) => ZodiacSign::Sagittarius,
        (12, 22..=31) | (1, 1..=19) => ZodiacSign::Capricorn,
        (1, 20..=31) | (2, 1..=18) => ZodiacSign::Aquarius,
        _ => ZodiacSign::Pisces,
    }
}

/// Shortest arc between two ecliptic longitudes, in [0, 180].
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let diff = normalize_degrees(a - b);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn test_sun_sign_boundaries() {
        assert_eq!(sun_sign_for_date(date(3, 20)), ZodiacSign::Pisces);
        assert_eq!(sun_sign_for_date(date(3, 21)), ZodiacSign::Aries);
        assert_eq!(sun_sign_for_date(date(8, 10)), ZodiacSign::Leo);
        assert_eq!(sun_sign_for_date(date(5, 5)), ZodiacSign::Taurus);
        assert_eq!(sun_sign_for_date(date(12, 31)), ZodiacSign::Capricorn);
        assert_eq!(sun_sign_for_date(date(1, 19)), ZodiacSign::Capricorn);
        assert_eq!(sun_sign_for_date(date(1, 20)), ZodiacSign::Aquarius);
        assert_eq!(sun_sign_for_date(date(2, 29)), ZodiacSign::Pisces);
    }

    #[test]
    fn test_sign_for_longitude() {
        assert_eq!(sign_for_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(sign_for_longitude(112.63), ZodiacSign::Cancer);
        assert_eq!(sign_for_longitude(333.5), ZodiacSign::Aquarius);
        assert_eq!(sign_for_longitude(720.5), ZodiacSign::Aries);
    }

    #[test]
    fn test_angular_separation_wraps() {
        assert!((angular_separation(359.5, 0.3) - 0.8).abs() < 1e-9);
        assert!((angular_separation(10.0, 190.0) - 180.0).abs() < 1e-9);
    }
}
