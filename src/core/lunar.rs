use crate::core::ephemeris::{julian_day, moon_longitude};
use crate::domain::model::normalize_degrees;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;

const SYNODIC_MONTH_DAYS: f64 = 29.530_588_67;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LunarPhase {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

impl LunarPhase {
    pub fn name(&self) -> &'static str {
        match self {
            LunarPhase::NewMoon => "New Moon",
            LunarPhase::WaxingCrescent => "Waxing Crescent",
            LunarPhase::FirstQuarter => "First Quarter",
            LunarPhase::WaxingGibbous => "Waxing Gibbous",
            LunarPhase::FullMoon => "Full Moon",
            LunarPhase::WaningGibbous => "Waning Gibbous",
            LunarPhase::LastQuarter => "Last Quarter",
            LunarPhase::WaningCrescent => "Waning Crescent",
        }
    }

    pub fn is_waning(&self) -> bool {
        matches!(self, LunarPhase::WaningGibbous | LunarPhase::WaningCrescent)
    }

    fn from_position(p: f64) -> Self {
        if !(0.03..=0.97).contains(&p) {
            LunarPhase::NewMoon
        } else if p > 0.22 && p < 0.28 {
            LunarPhase::FirstQuarter
        } else if p > 0.47 && p < 0.53 {
            LunarPhase::FullMoon
        } else if p > 0.72 && p < 0.78 {
            LunarPhase::LastQuarter
        } else if p < 0.25 {
            LunarPhase::WaxingCrescent
        } else if p < 0.5 {
            LunarPhase::WaxingGibbous
        } else if p < 0.75 {
            LunarPhase::WaningGibbous
        } else {
            LunarPhase::WaningCrescent
        }
    }
}

impl fmt::Display for LunarPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunarPhaseInfo {
    pub phase: LunarPhase,
    /// Fraction of the synodic month elapsed since new moon.
    pub position: f64,
    pub illumination: f64,
}

fn reference_new_moon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 21, 20, 53, 0)
        .single()
        .unwrap_or_default()
}

pub fn lunar_phase(moment: DateTime<Utc>) -> LunarPhaseInfo {
    let elapsed = (moment - reference_new_moon()).num_milliseconds() as f64 / 86_400_000.0;
    let position = (elapsed / SYNODIC_MONTH_DAYS).rem_euclid(1.0);
    let illumination = 0.5 * (1.0 - (2.0 * PI * position).cos());
    LunarPhaseInfo {
        phase: LunarPhase::from_position(position),
        position,
        illumination: (illumination * 1000.0).round() / 1000.0,
    }
}

/// Affinity multiplier for an ingredient category under `phase`.
pub fn lunar_modifier(phase: LunarPhase, category: &str) -> f64 {
    match (phase, category) {
        (LunarPhase::NewMoon, "Root/Grounding") => 1.2,
        (LunarPhase::FullMoon, "High-Water/Cooling") => 1.2,
        (p, "Detoxifying") if p.is_waning() => 1.1,
        _ => 1.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Nakshatra {
    pub name: &'static str,
    pub start: f64,
    pub end: f64,
    pub food_type: &'static str,
}

const fn mansion(name: &'static str, start: f64, end: f64, food_type: &'static str) -> Nakshatra {
    Nakshatra {
        name,
        start,
        end,
        food_type,
    }
}

pub const NAKSHATRAS: [Nakshatra; 27] = [
    mansion("Ashwini", 0.0, 13.33, "Quick & Light"),
    mansion("Bharani", 13.33, 26.66, "Spicy/Transformative"),
    mansion("Krittika", 26.66, 40.0, "Fiery & Sharp"),
    mansion("Rohini", 40.0, 53.33, "Sweet/Nurturing"),
    mansion("Mrigashira", 53.33, 66.66, "Light & Airy"),
    mansion("Ardra", 66.66, 80.0, "Moist & Soft"),
    mansion("Punarvasu", 80.0, 93.33, "Nourishing & Restorative"),
    mansion("Pushya", 93.33, 106.66, "Rich & Milky"),
    mansion("Ashlesha", 106.66, 120.0, "Pungent & Intense"),
    mansion("Magha", 120.0, 133.33, "Royal & Grand"),
    mansion("Purva Phalguni", 133.33, 146.66, "Sweet & Oily"),
    mansion("Uttara Phalguni", 146.66, 160.0, "Simple & Wholesome"),
    mansion("Hasta", 160.0, 173.33, "Light & Easy-to-digest"),
    mansion("Chitra", 173.33, 186.66, "Colorful & Artistic"),
    mansion("Swati", 186.66, 200.0, "Windy & Gassy"),
    mansion("Vishakha", 200.0, 213.33, "Rich & Festive"),
    mansion("Anuradha", 213.33, 226.66, "Mild & Balanced"),
    mansion("Jyeshtha", 226.66, 240.0, "Heavy & Pungent"),
    mansion("Mula", 240.0, 253.33, "Root Vegetables"),
    mansion("Purva Ashadha", 253.33, 266.66, "Liquid & Flowing"),
    mansion("Uttara Ashadha", 266.66, 280.0, "Simple & Pure"),
    mansion("Shravana", 280.0, 293.33, "Light & Sattvic"),
    mansion("Dhanishta", 293.33, 306.66, "Rich & Rhythmic"),
    mansion("Shatabhisha", 306.66, 320.0, "Cleansing & Bitter"),
    mansion("Purva Bhadrapada", 320.0, 333.33, "Fiery & Hot"),
    mansion("Uttara Bhadrapada", 333.33, 346.66, "Grounding & Stable"),
    mansion("Revati", 346.66, 360.0, "Sweet & Nourishing"),
];

pub fn nakshatra_for(moon_longitude: f64) -> &'static Nakshatra {
    let longitude = normalize_degrees(moon_longitude);
    NAKSHATRAS
        .iter()
        .find(|m| m.start <= longitude && longitude < m.end)
        .unwrap_or(&NAKSHATRAS[26])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookingWindow {
    pub date: NaiveDate,
    pub mansion: &'static str,
    pub food_type: &'static str,
    /// HH:MM UTC
    pub start_time: String,
}

/// One window per day from `start`, keyed on the Moon's mansion at the
/// same time of day.
pub fn cooking_windows(start: DateTime<Utc>, days: u32) -> Vec<CookingWindow> {
    (0..days)
        .map(|day| {
            let moment = start + Duration::days(i64::from(day));
            let mansion = nakshatra_for(moon_longitude(julian_day(moment)));
            CookingWindow {
                date: moment.date_naive(),
                mansion: mansion.name,
                food_type: mansion.food_type,
                start_time: moment.format("%H:%M").to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_moment_is_new_moon() {
        let info = lunar_phase(reference_new_moon());
        assert_eq!(info.phase, LunarPhase::NewMoon);
        assert_eq!(info.illumination, 0.0);
    }

    #[test]
    fn test_half_cycle_is_full_moon() {
        let half = Duration::milliseconds((SYNODIC_MONTH_DAYS / 2.0 * 86_400_000.0) as i64);
        let info = lunar_phase(reference_new_moon() + half);
        assert_eq!(info.phase, LunarPhase::FullMoon);
        assert_eq!(info.illumination, 1.0);
    }

    #[test]
    fn test_phase_names_by_position() {
        assert_eq!(LunarPhase::from_position(0.1), LunarPhase::WaxingCrescent);
        assert_eq!(LunarPhase::from_position(0.25), LunarPhase::FirstQuarter);
        assert_eq!(LunarPhase::from_position(0.4), LunarPhase::WaxingGibbous);
        assert_eq!(LunarPhase::from_position(0.6), LunarPhase::WaningGibbous);
        assert_eq!(LunarPhase::from_position(0.75), LunarPhase::LastQuarter);
        assert_eq!(LunarPhase::from_position(0.9), LunarPhase::WaningCrescent);
        assert_eq!(LunarPhase::from_position(0.98), LunarPhase::NewMoon);
    }

    #[test]
    fn test_lunar_modifier() {
        assert_eq!(lunar_modifier(LunarPhase::NewMoon, "Root/Grounding"), 1.2);
        assert_eq!(lunar_modifier(LunarPhase::FullMoon, "High-Water/Cooling"), 1.2);
        assert_eq!(lunar_modifier(LunarPhase::WaningCrescent, "Detoxifying"), 1.1);
        assert_eq!(lunar_modifier(LunarPhase::LastQuarter, "Detoxifying"), 1.0);
        assert_eq!(lunar_modifier(LunarPhase::FullMoon, "Root/Grounding"), 1.0);
    }

    #[test]
    fn test_nakshatra_lookup() {
        assert_eq!(nakshatra_for(0.0).name, "Ashwini");
        assert_eq!(nakshatra_for(13.33).name, "Bharani");
        assert_eq!(nakshatra_for(245.0).food_type, "Root Vegetables");
        assert_eq!(nakshatra_for(359.99).name, "Revati");
        assert_eq!(nakshatra_for(-1.0).name, "Revati");
        assert_eq!(nakshatra_for(365.0).name, "Ashwini");
    }

    #[test]
    fn test_cooking_windows_one_per_day() {
        let start = Utc.with_ymd_and_hms(2025, 3, 28, 18, 30, 0).unwrap();
        let windows = cooking_windows(start, 7);
        assert_eq!(windows.len(), 7);
        assert_eq!(windows[0].date, NaiveDate::from_ymd_opt(2025, 3, 28).unwrap());
        assert_eq!(windows[6].date, NaiveDate::from_ymd_opt(2025, 4, 3).unwrap());
        assert!(windows.iter().all(|w| w.start_time == "18:30"));
        // the Moon moves about one mansion per day
        assert_ne!(windows[0].mansion, windows[3].mansion);
    }
}
