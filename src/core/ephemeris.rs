//! Low-precision analytic ephemeris for offline use.
//!
//! Sun and Moon use the short almanac series, the planets use mean
//! Keplerian elements (valid 1800-2050) reduced to geocentric ecliptic
//! longitude. Good to about a degree, which is all sign placement needs.

use crate::domain::model::{
    normalize_degrees, ChartQuery, PlanetaryPosition, PlanetarySnapshot, Planet, PositionSource,
    ZodiacSystem,
};
use crate::domain::ports::EphemerisSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

const J2000: f64 = 2_451_545.0;
const OBLIQUITY_DEG: f64 = 23.4397;
const LAHIRI_AT_J2000_DEG: f64 = 23.85;
const LAHIRI_ARCSEC_PER_YEAR: f64 = 50.29;

/// a, e, I, L, long. perihelion, long. node; each as (value at J2000, rate per century).
struct OrbitalElements {
    semi_major_axis: (f64, f64),
    eccentricity: (f64, f64),
    inclination: (f64, f64),
    mean_longitude: (f64, f64),
    perihelion: (f64, f64),
    node: (f64, f64),
}

const EARTH: OrbitalElements = OrbitalElements {
    semi_major_axis: (1.000_002_61, 0.000_005_62),
    eccentricity: (0.016_711_23, -0.000_043_92),
    inclination: (-0.000_015_31, -0.012_946_68),
    mean_longitude: (100.464_571_66, 35_999.372_449_81),
    perihelion: (102.937_681_93, 0.323_273_64),
    node: (0.0, 0.0),
};

fn elements(planet: Planet) -> Option<OrbitalElements> {
    let e = match planet {
        Planet::Mercury => OrbitalElements {
            semi_major_axis: (0.387_099_27, 0.000_000_37),
            eccentricity: (0.205_635_93, 0.000_019_06),
            inclination: (7.004_979_02, -0.005_947_49),
            mean_longitude: (252.250_323_50, 149_472.674_111_75),
            perihelion: (77.457_796_28, 0.160_476_89),
            node: (48.330_765_93, -0.125_340_81),
        },
        Planet::Venus => OrbitalElements {
            semi_major_axis: (0.723_335_66, 0.000_003_90),
            eccentricity: (0.006_776_72, -0.000_041_07),
            inclination: (3.394_676_05, -0.000_788_90),
            mean_longitude: (181.979_099_50, 58_517.815_387_29),
            perihelion: (131.602_467_18, 0.002_683_29),
            node: (76.679_842_55, -0.277_694_18),
        },
        Planet::Mars => OrbitalElements {
            semi_major_axis: (1.523_710_34, 0.000_018_47),
            eccentricity: (0.093_394_10, 0.000_078_82),
            inclination: (1.849_691_42, -0.008_131_31),
            mean_longitude: (-4.553_432_05, 19_140.302_684_99),
            perihelion: (-23.943_629_59, 0.444_410_88),
            node: (49.559_538_91, -0.292_573_43),
        },
        Planet::Jupiter => OrbitalElements {
            semi_major_axis: (5.202_887_00, -0.000_116_07),
            eccentricity: (0.048_386_24, -0.000_132_53),
            inclination: (1.304_396_95, -0.001_837_14),
            mean_longitude: (34.396_440_51, 3_034.746_127_75),
            perihelion: (14.728_479_83, 0.212_526_68),
            node: (100.473_909_09, 0.204_691_06),
        },
        Planet::Saturn => OrbitalElements {
            semi_major_axis: (9.536_675_94, -0.001_250_60),
            eccentricity: (0.053_861_79, -0.000_509_91),
            inclination: (2.485_991_87, 0.001_936_09),
            mean_longitude: (49.954_244_23, 1_222.493_622_01),
            perihelion: (92.598_878_31, -0.418_972_16),
            node: (113.662_424_48, -0.288_677_94),
        },
        Planet::Uranus => OrbitalElements {
            semi_major_axis: (19.189_164_64, -0.001_961_76),
            eccentricity: (0.047_257_44, -0.000_043_97),
            inclination: (0.772_637_83, -0.002_429_39),
            mean_longitude: (313.238_104_51, 428.482_027_85),
            perihelion: (170.954_276_30, 0.408_052_81),
            node: (74.016_925_03, 0.042_405_89),
        },
        Planet::Neptune => OrbitalElements {
            semi_major_axis: (30.069_922_76, 0.000_262_91),
            eccentricity: (0.008_590_48, 0.000_051_05),
            inclination: (1.770_043_47, 0.000_353_72),
            mean_longitude: (-55.120_029_69, 218.459_453_25),
            perihelion: (44.964_762_27, -0.322_414_64),
            node: (131.784_225_74, -0.005_086_64),
        },
        Planet::Pluto => OrbitalElements {
            semi_major_axis: (39.482_116_75, -0.000_315_96),
            eccentricity: (0.248_827_30, 0.000_051_70),
            inclination: (17.140_012_06, 0.000_048_18),
            mean_longitude: (238.929_038_33, 145.207_805_15),
            perihelion: (224.068_916_29, -0.040_629_42),
            node: (110.303_936_84, -0.011_834_82),
        },
        _ => return None,
    };
    Some(e)
}

pub fn julian_day(moment: DateTime<Utc>) -> f64 {
    moment.timestamp_millis() as f64 / 86_400_000.0 + 2_440_587.5
}

fn at(pair: (f64, f64), centuries: f64) -> f64 {
    pair.0 + pair.1 * centuries
}

/// Heliocentric ecliptic x/y in AU.
fn heliocentric(orbit: &OrbitalElements, centuries: f64) -> (f64, f64) {
    let a = at(orbit.semi_major_axis, centuries);
    let e = at(orbit.eccentricity, centuries);
    let inclination = at(orbit.inclination, centuries).to_radians();
    let mean_longitude = at(orbit.mean_longitude, centuries);
    let perihelion = at(orbit.perihelion, centuries);
    let node_deg = at(orbit.node, centuries);

    let argument = (perihelion - node_deg).to_radians();
    let node = node_deg.to_radians();
    let mean_anomaly = ((mean_longitude - perihelion + 180.0).rem_euclid(360.0) - 180.0).to_radians();

    let mut eccentric = mean_anomaly;
    for _ in 0..30 {
        let step = (eccentric - e * eccentric.sin() - mean_anomaly) / (1.0 - e * eccentric.cos());
        eccentric -= step;
        if step.abs() < 1e-12 {
            break;
        }
    }

    let x_orbit = a * (eccentric.cos() - e);
    let y_orbit = a * (1.0 - e * e).sqrt() * eccentric.sin();
    let (sin_w, cos_w) = argument.sin_cos();
    let (sin_n, cos_n) = node.sin_cos();
    let cos_i = inclination.cos();

    let x = (cos_w * cos_n - sin_w * sin_n * cos_i) * x_orbit
        + (-sin_w * cos_n - cos_w * sin_n * cos_i) * y_orbit;
    let y = (cos_w * sin_n + sin_w * cos_n * cos_i) * x_orbit
        + (-sin_w * sin_n + cos_w * cos_n * cos_i) * y_orbit;
    (x, y)
}

fn planet_longitude(orbit: &OrbitalElements, jd: f64) -> f64 {
    let centuries = (jd - J2000) / 36_525.0;
    let (x, y) = heliocentric(orbit, centuries);
    let (ex, ey) = heliocentric(&EARTH, centuries);
    normalize_degrees((y - ey).atan2(x - ex).to_degrees())
}

pub fn sun_longitude(jd: f64) -> f64 {
    let d = jd - J2000;
    let mean = 280.460 + 0.985_647_4 * d;
    let anomaly = (357.528 + 0.985_600_3 * d).to_radians();
    normalize_degrees(mean + 1.915 * anomaly.sin() + 0.020 * (2.0 * anomaly).sin())
}

pub fn moon_longitude(jd: f64) -> f64 {
    let d = jd - J2000;
    let mean = 218.316 + 13.176_396 * d;
    let anomaly = (134.963 + 13.064_993 * d).to_radians();
    normalize_degrees(mean + 6.289 * anomaly.sin())
}

/// Mean longitude of the Moon's ascending node.
pub fn north_node_longitude(jd: f64) -> f64 {
    normalize_degrees(125.044_52 - 0.052_953_808_3 * (jd - J2000))
}

pub fn ascendant_longitude(jd: f64, latitude: f64, longitude: f64) -> f64 {
    let sidereal = normalize_degrees(280.460_618_37 + 360.985_647_366_29 * (jd - J2000) + longitude)
        .to_radians();
    let obliquity = OBLIQUITY_DEG.to_radians();
    let latitude = latitude.clamp(-89.9, 89.9).to_radians();
    let y = sidereal.cos();
    let x = -(sidereal.sin() * obliquity.cos() + latitude.tan() * obliquity.sin());
    normalize_degrees(y.atan2(x).to_degrees())
}

pub fn lahiri_ayanamsa(jd: f64) -> f64 {
    let years = (jd - J2000) / 365.25;
    LAHIRI_AT_J2000_DEG + years * LAHIRI_ARCSEC_PER_YEAR / 3600.0
}

fn is_moving_backwards(orbit: &OrbitalElements, jd: f64) -> bool {
    let delta = planet_longitude(orbit, jd + 1.0) - planet_longitude(orbit, jd);
    let delta = (delta + 180.0).rem_euclid(360.0) - 180.0;
    delta < 0.0
}

/// Places every body for `query` without touching the network.
pub fn compute_chart(query: &ChartQuery) -> PlanetarySnapshot {
    let jd = julian_day(query.moment);
    let shift = match query.zodiac_system {
        ZodiacSystem::Tropical => 0.0,
        ZodiacSystem::Sidereal => lahiri_ayanamsa(jd),
    };

    let mut raw: Vec<(Planet, f64, bool)> = vec![
        (Planet::Sun, sun_longitude(jd), false),
        (Planet::Moon, moon_longitude(jd), false),
    ];
    for planet in Planet::ALL {
        if let Some(orbit) = elements(planet) {
            raw.push((planet, planet_longitude(&orbit, jd), is_moving_backwards(&orbit, jd)));
        }
    }
    let node = north_node_longitude(jd);
    raw.push((Planet::NorthNode, node, true));
    raw.push((Planet::SouthNode, node + 180.0, true));
    raw.push((
        Planet::Ascendant,
        ascendant_longitude(jd, query.location.latitude, query.location.longitude),
        false,
    ));

    let positions: BTreeMap<Planet, PlanetaryPosition> = raw
        .into_iter()
        .map(|(planet, longitude, retrograde)| {
            (planet, PlanetaryPosition::from_longitude(longitude - shift, retrograde))
        })
        .collect();

    PlanetarySnapshot {
        moment: query.moment,
        zodiac_system: query.zodiac_system,
        source: PositionSource::Local,
        positions,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalEphemeris;

#[async_trait]
impl EphemerisSource for LocalEphemeris {
    fn name(&self) -> &str {
        "local"
    }

    async fn positions(&self, query: &ChartQuery) -> Result<PlanetarySnapshot> {
        tracing::debug!(moment = %query.moment, "Computing positions locally");
        Ok(compute_chart(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GeoLocation, ZodiacSign};
    use chrono::TimeZone;

    fn march_28_2025() -> ChartQuery {
        let moment = Utc.with_ymd_and_hms(2025, 3, 28, 12, 0, 0).unwrap();
        ChartQuery::new(moment, GeoLocation::default())
    }

    #[test]
    fn test_sun_near_known_position() {
        let chart = compute_chart(&march_28_2025());
        let sun = chart.position(Planet::Sun).unwrap();
        assert_eq!(sun.sign, ZodiacSign::Aries);
        assert!((sun.exact_longitude - 8.0).abs() < 1.0);
        assert!(!sun.is_retrograde);
    }

    #[test]
    fn test_outer_planets_in_expected_signs() {
        let chart = compute_chart(&march_28_2025());
        assert_eq!(chart.sign_of(Planet::Mars), Some(ZodiacSign::Cancer));
        assert_eq!(chart.sign_of(Planet::Jupiter), Some(ZodiacSign::Gemini));
        assert_eq!(chart.sign_of(Planet::Uranus), Some(ZodiacSign::Taurus));
        assert_eq!(chart.sign_of(Planet::Pluto), Some(ZodiacSign::Aquarius));
        assert_eq!(chart.source, PositionSource::Local);
    }

    #[test]
    fn test_venus_retrograde_in_spring_2025() {
        let chart = compute_chart(&march_28_2025());
        assert!(chart.position(Planet::Venus).unwrap().is_retrograde);
        assert!(!chart.position(Planet::Jupiter).unwrap().is_retrograde);
    }

    #[test]
    fn test_nodes_are_opposite_and_retrograde() {
        let chart = compute_chart(&march_28_2025());
        let north = chart.position(Planet::NorthNode).unwrap();
        let south = chart.position(Planet::SouthNode).unwrap();
        let gap = normalize_degrees(south.exact_longitude - north.exact_longitude);
        assert!((gap - 180.0).abs() < 1e-9);
        assert!(north.is_retrograde && south.is_retrograde);
        assert_eq!(chart.positions.len(), Planet::ALL.len());
    }

    #[test]
    fn test_sidereal_shifts_by_ayanamsa() {
        let tropical = compute_chart(&march_28_2025());
        let sidereal = compute_chart(&march_28_2025().with_zodiac_system(ZodiacSystem::Sidereal));
        let shift = normalize_degrees(
            tropical.longitude_of(Planet::Sun).unwrap() - sidereal.longitude_of(Planet::Sun).unwrap(),
        );
        assert!((shift - 24.2).abs() < 0.2, "ayanamsa {}", shift);
        assert_eq!(sidereal.sign_of(Planet::Sun), Some(ZodiacSign::Pisces));
    }

    #[test]
    fn test_ascendant_at_equator_with_aries_culminating() {
        // sidereal time zero puts 0 Aries on the meridian and 0 Cancer rising
        let jd = J2000 - 280.460_618_37 / 360.985_647_366_29;
        let ascendant = ascendant_longitude(jd, 0.0, 0.0);
        assert!((ascendant - 90.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_local_source_port() {
        let source = LocalEphemeris;
        assert_eq!(source.name(), "local");
        let chart = source.positions(&march_28_2025()).await.unwrap();
        assert!(chart.position(Planet::Ascendant).is_some());
    }
}
