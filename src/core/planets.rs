//! Planetary tables and the planetary-hour clock.

use crate::domain::model::{Element, GeoLocation, Planet};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::Serialize;

const EARTH_MASS_KG: f64 = 5.972e24;
const SUN_DEPRESSION_DEG: f64 = -0.833;
const OBLIQUITY_DEG: f64 = 23.4397;
const J2000: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Saturn first, descending by apparent speed.
pub const CHALDEAN_ORDER: [Planet; 7] = [
    Planet::Saturn,
    Planet::Jupiter,
    Planet::Mars,
    Planet::Sun,
    Planet::Venus,
    Planet::Mercury,
    Planet::Moon,
];

const MASSES_KG: [(&str, f64); 11] = [
    ("Sun", 1.989e30),
    ("Moon", 7.342e22),
    ("Mercury", 3.285e23),
    ("Venus", 4.867e24),
    ("Earth", 5.972e24),
    ("Mars", 6.39e23),
    ("Jupiter", 1.898e27),
    ("Saturn", 5.683e26),
    ("Uranus", 8.681e25),
    ("Neptune", 1.024e26),
    ("Pluto", 1.309e22),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightScale {
    /// Log-scaled between Pluto (0) and the Sun (1).
    Normalized,
    /// Multiples of Earth's mass.
    Relative,
    Kilograms,
}

pub fn planet_element(planet: Planet) -> Option<Element> {
    match planet {
        Planet::Sun | Planet::Mars | Planet::Jupiter => Some(Element::Fire),
        Planet::Moon | Planet::Neptune | Planet::Pluto => Some(Element::Water),
        Planet::Mercury | Planet::Uranus => Some(Element::Air),
        Planet::Venus | Planet::Saturn => Some(Element::Earth),
        Planet::NorthNode | Planet::SouthNode | Planet::Ascendant => None,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn mass_kg(name: &str) -> Option<f64> {
    MASSES_KG
        .iter()
        .find(|(body, _)| *body == name)
        .map(|(_, mass)| *mass)
}

fn relative_mass(mass: f64) -> f64 {
    round_to(mass / EARTH_MASS_KG, 4)
}

fn normalized_mass(relative: f64) -> f64 {
    if relative <= 0.0 {
        return 0.0;
    }
    let pluto = relative_mass(1.309e22).log10();
    let sun = relative_mass(1.989e30).log10();
    round_to((relative.log10() - pluto) / (sun - pluto), 4)
}

/// Mass-derived weight of a body. `name` is matched case-sensitively
/// ("Jupiter", not "jupiter"); unknown bodies get a neutral weight.
pub fn planet_weight(name: &str, scale: WeightScale) -> f64 {
    match (mass_kg(name), scale) {
        (Some(mass), WeightScale::Kilograms) => mass,
        (Some(mass), WeightScale::Relative) => relative_mass(mass),
        (Some(mass), WeightScale::Normalized) => normalized_mass(relative_mass(mass)),
        (None, WeightScale::Kilograms) => EARTH_MASS_KG,
        (None, WeightScale::Relative) => 1.0,
        (None, WeightScale::Normalized) => 0.5,
    }
}

pub fn day_ruler(weekday: Weekday) -> Planet {
    match weekday {
        Weekday::Sun => Planet::Sun,
        Weekday::Mon => Planet::Moon,
        Weekday::Tue => Planet::Mars,
        Weekday::Wed => Planet::Mercury,
        Weekday::Thu => Planet::Jupiter,
        Weekday::Fri => Planet::Venus,
        Weekday::Sat => Planet::Saturn,
    }
}

fn chaldean_index(planet: Planet) -> usize {
    CHALDEAN_ORDER
        .iter()
        .position(|p| *p == planet)
        .unwrap_or(0)
}

fn julian_to_utc(jd: f64) -> Option<DateTime<Utc>> {
    let millis = ((jd - UNIX_EPOCH_JD) * 86_400_000.0).round() as i64;
    Utc.timestamp_millis_opt(millis).single()
}

fn midnight_julian(date: NaiveDate) -> f64 {
    let seconds = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    UNIX_EPOCH_JD + seconds as f64 / 86_400.0
}

/// Sunrise and sunset (UTC) on `date` at `location`, using the NOAA
/// sunrise equation. `None` during polar day or polar night.
pub fn sun_times(date: NaiveDate, location: GeoLocation) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let n = (midnight_julian(date) - J2000 + 0.0008).ceil();
    let mean_solar_noon = n - location.longitude / 360.0;

    let m = (357.5291 + 0.985_600_28 * mean_solar_noon).rem_euclid(360.0);
    let m_rad = m.to_radians();
    let center = 1.9148 * m_rad.sin() + 0.02 * (2.0 * m_rad).sin() + 0.0003 * (3.0 * m_rad).sin();
    let lambda = (m + center + 180.0 + 102.9372).rem_euclid(360.0).to_radians();
    let transit = J2000 + mean_solar_noon + 0.0053 * m_rad.sin() - 0.0069 * (2.0 * lambda).sin();

    let declination = (lambda.sin() * OBLIQUITY_DEG.to_radians().sin()).asin();
    let latitude = location.latitude.to_radians();
    let cos_hour_angle = (SUN_DEPRESSION_DEG.to_radians().sin() - latitude.sin() * declination.sin())
        / (latitude.cos() * declination.cos());
    if !(-1.0..=1.0).contains(&cos_hour_angle) {
        return None;
    }
    let hour_angle = cos_hour_angle.acos().to_degrees();

    let sunrise = julian_to_utc(transit - hour_angle / 360.0)?;
    let sunset = julian_to_utc(transit + hour_angle / 360.0)?;
    Some((sunrise, sunset))
}

/// 06:00 and 18:00 local mean solar time, expressed in UTC.
fn mean_solar_times(date: NaiveDate, location: GeoLocation) -> (DateTime<Utc>, DateTime<Utc>) {
    let offset = Duration::milliseconds((location.longitude / 15.0 * 3_600_000.0).round() as i64);
    let midnight = date.and_time(NaiveTime::MIN).and_utc() - offset;
    (midnight + Duration::hours(6), midnight + Duration::hours(18))
}

fn day_bounds(date: NaiveDate, location: GeoLocation) -> (DateTime<Utc>, DateTime<Utc>) {
    sun_times(date, location).unwrap_or_else(|| mean_solar_times(date, location))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanetaryHour {
    pub ruler: Planet,
    pub day_ruler: Planet,
    pub is_daytime: bool,
    /// 1 through 12 within the day or night half.
    pub hour_number: u8,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

fn hour_within(
    moment: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> (usize, DateTime<Utc>, DateTime<Utc>) {
    let span_ms = (end - start).num_milliseconds().max(12);
    let hour_ms = span_ms / 12;
    let elapsed = (moment - start).num_milliseconds().max(0);
    let index = ((elapsed / hour_ms) as usize).min(11);
    let hour_start = start + Duration::milliseconds(hour_ms * index as i64);
    let hour_end = if index == 11 {
        end
    } else {
        hour_start + Duration::milliseconds(hour_ms)
    };
    (index, hour_start, hour_end)
}

/// The planet ruling `moment` at `location`.
///
/// Daylight and darkness are each split into twelve unequal hours. The
/// weekday whose sunrise opened the current period picks the day ruler,
/// so the hours before dawn still belong to the previous day.
pub fn planetary_hour(moment: DateTime<Utc>, location: GeoLocation) -> PlanetaryHour {
    let offset = Duration::milliseconds((location.longitude / 15.0 * 3_600_000.0).round() as i64);
    let local_date = (moment + offset).date_naive();
    let (sunrise, sunset) = day_bounds(local_date, location);

    let (ruling_date, is_daytime, start, end) = if moment < sunrise {
        let previous = local_date.pred_opt().unwrap_or(local_date);
        let (_, previous_sunset) = day_bounds(previous, location);
        (previous, false, previous_sunset, sunrise)
    } else if moment < sunset {
        (local_date, true, sunrise, sunset)
    } else {
        let next = local_date.succ_opt().unwrap_or(local_date);
        let (next_sunrise, _) = day_bounds(next, location);
        (local_date, false, sunset, next_sunrise)
    };

    let ruler_of_day = day_ruler(ruling_date.weekday());
    let (index, starts_at, ends_at) = hour_within(moment, start, end);
    let offset_hours = if is_daytime { index } else { 12 + index };
    let ruler = CHALDEAN_ORDER[(chaldean_index(ruler_of_day) + offset_hours) % 7];

    PlanetaryHour {
        ruler,
        day_ruler: ruler_of_day,
        is_daytime,
        hour_number: index as u8 + 1,
        starts_at,
        ends_at,
    }
}
