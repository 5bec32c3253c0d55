use crate::adapters::circuit_breaker::{BreakerSettings, CircuitBreaker};
use crate::domain::model::{
    ChartQuery, Planet, PlanetaryPosition, PlanetarySnapshot, PositionSource, ZodiacSystem,
};
use crate::domain::ports::EphemerisSource;
use crate::utils::error::{KitchenError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Timelike, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Positions for 2025-03-28, served when every endpoint is down.
const FALLBACK_CHART: [(Planet, f64, bool); 12] = [
    (Planet::Sun, 8.5, false),
    (Planet::Moon, 1.57, false),
    (Planet::Mercury, 0.85, true),
    (Planet::Venus, 359.08, true),
    (Planet::Mars, 112.63, false),
    (Planet::Jupiter, 75.52, false),
    (Planet::Saturn, 354.12, false),
    (Planet::Uranus, 54.62, false),
    (Planet::Neptune, 359.93, false),
    (Planet::Pluto, 333.5, false),
    (Planet::NorthNode, 356.88, true),
    (Planet::SouthNode, 176.88, true),
];

pub fn fallback_snapshot(moment: DateTime<Utc>) -> PlanetarySnapshot {
    PlanetarySnapshot {
        moment,
        zodiac_system: ZodiacSystem::Tropical,
        source: PositionSource::Fallback,
        positions: FALLBACK_CHART
            .iter()
            .map(|(planet, lon, retro)| (*planet, PlanetaryPosition::from_longitude(*lon, *retro)))
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisSettings {
    pub primary_url: String,
    pub fallback_url: Option<String>,
    pub timeout: Duration,
    pub cache_ttl: Duration,
    pub breaker: BreakerSettings,
    pub use_fallback: bool,
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        Self {
            primary_url: "https://alchm.kitchen/api/astrologize".to_string(),
            fallback_url: None,
            timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(3600),
            breaker: BreakerSettings::default(),
            use_fallback: true,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AstrologizeRequest {
    year: i32,
    month: u32,
    date: u32,
    hour: u32,
    minute: u32,
    latitude: f64,
    longitude: f64,
    zodiac_system: ZodiacSystem,
}

impl From<&ChartQuery> for AstrologizeRequest {
    fn from(query: &ChartQuery) -> Self {
        let m = query.moment;
        Self {
            year: m.year(),
            month: m.month(),
            date: m.day(),
            hour: m.hour(),
            minute: m.minute(),
            latitude: query.location.latitude,
            longitude: query.location.longitude,
            zodiac_system: query.zodiac_system,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AstrologizeResponse {
    #[serde(rename = "_celestialBodies", default)]
    celestial_bodies: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CelestialBody {
    #[serde(rename = "Sign")]
    sign: Option<SignKey>,
    #[serde(rename = "ChartPosition")]
    chart_position: ChartPosition,
    #[serde(rename = "isRetrograde", default)]
    is_retrograde: bool,
}

#[derive(Debug, Deserialize)]
struct SignKey {
    key: String,
}

#[derive(Debug, Deserialize)]
struct ChartPosition {
    #[serde(rename = "Ecliptic")]
    ecliptic: Ecliptic,
}

#[derive(Debug, Deserialize)]
struct Ecliptic {
    #[serde(rename = "DecimalDegrees")]
    decimal_degrees: f64,
}

fn parse_bodies(response: AstrologizeResponse) -> BTreeMap<Planet, PlanetaryPosition> {
    let mut positions = BTreeMap::new();
    for (key, value) in response.celestial_bodies {
        let Ok(planet) = key.parse::<Planet>() else {
            tracing::debug!(body = %key, "Skipping unknown celestial body");
            continue;
        };
        let body: CelestialBody = match serde_json::from_value(value) {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(body = %key, error = %e, "Skipping malformed celestial body");
                continue;
            }
        };
        let position =
            PlanetaryPosition::from_longitude(body.chart_position.ecliptic.decimal_degrees, body.is_retrograde);
        if let Some(sign) = &body.sign {
            if !sign.key.eq_ignore_ascii_case(position.sign.as_str()) {
                tracing::debug!(
                    body = %key,
                    reported = %sign.key,
                    computed = %position.sign,
                    "Reported sign disagrees with longitude"
                );
            }
        }
        positions.insert(planet, position);
    }
    positions
}

fn cache_key(query: &ChartQuery) -> String {
    format!(
        "{}|{:.4}|{:.4}|{}",
        query.moment.format("%Y-%m-%dT%H:%M"),
        query.location.latitude,
        query.location.longitude,
        query.zodiac_system.as_str()
    )
}

/// Client for the astrologize chart API, with cache, breaker and fallback chart.
pub struct AstrologizeClient {
    client: Client,
    settings: EphemerisSettings,
    breaker: CircuitBreaker,
    cache: RwLock<HashMap<String, (Instant, PlanetarySnapshot)>>,
}

impl AstrologizeClient {
    pub fn new(settings: EphemerisSettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            breaker: CircuitBreaker::new("astrologize", settings.breaker),
            settings,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    fn cached(&self, key: &str) -> Option<PlanetarySnapshot> {
        let cache = self.cache.read().ok()?;
        let (stored_at, snapshot) = cache.get(key)?;
        (stored_at.elapsed() < self.settings.cache_ttl).then(|| PlanetarySnapshot {
            source: PositionSource::Cache,
            ..snapshot.clone()
        })
    }

    fn store(&self, key: String, snapshot: &PlanetarySnapshot) {
        if let Ok(mut cache) = self.cache.write() {
            cache.retain(|_, (stored_at, _)| stored_at.elapsed() < self.settings.cache_ttl);
            cache.insert(key, (Instant::now(), snapshot.clone()));
        }
    }

    async fn fetch(&self, url: &str, query: &ChartQuery) -> Result<PlanetarySnapshot> {
        tracing::debug!(url, "Requesting chart");
        let response = self
            .client
            .post(url)
            .json(&AstrologizeRequest::from(query))
            .send()
            .await?;
        tracing::debug!(status = %response.status(), "Chart response");

        if !response.status().is_success() {
            return Err(KitchenError::EphemerisError {
                message: format!("{} returned {}", url, response.status()),
            });
        }

        let body: AstrologizeResponse = response.json().await?;
        let positions = parse_bodies(body);
        if positions.is_empty() {
            return Err(KitchenError::EphemerisError {
                message: format!("{} returned no celestial bodies", url),
            });
        }

        Ok(PlanetarySnapshot {
            moment: query.moment,
            zodiac_system: query.zodiac_system,
            source: PositionSource::Remote,
            positions,
        })
    }

    async fn fetch_any(&self, query: &ChartQuery) -> Result<PlanetarySnapshot> {
        let urls = std::iter::once(self.settings.primary_url.as_str())
            .chain(self.settings.fallback_url.as_deref());
        let mut last_error = None;
        for url in urls {
            match self.fetch(url, query).await {
                Ok(snapshot) => return Ok(snapshot),
                Err(e) => {
                    tracing::warn!(url, error = %e, "Ephemeris endpoint failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| KitchenError::EphemerisError {
            message: "no endpoints configured".to_string(),
        }))
    }
}

#[async_trait]
impl EphemerisSource for AstrologizeClient {
    fn name(&self) -> &str {
        "astrologize"
    }

    async fn positions(&self, query: &ChartQuery) -> Result<PlanetarySnapshot> {
        let key = cache_key(query);
        if let Some(snapshot) = self.cached(&key) {
            tracing::debug!(key = %key, "Chart cache hit");
            return Ok(snapshot);
        }

        let error = if self.breaker.is_allowed() {
            match self.fetch_any(query).await {
                Ok(snapshot) => {
                    self.breaker.record_success();
                    self.store(key, &snapshot);
                    return Ok(snapshot);
                }
                Err(e) => {
                    self.breaker.record_failure();
                    e
                }
            }
        } else {
            tracing::warn!(service = %self.breaker.service(), "Circuit open, skipping remote call");
            KitchenError::CircuitOpen {
                service: self.breaker.service().to_string(),
            }
        };

        if self.settings.use_fallback {
            tracing::warn!(error = %error, "Serving fallback chart");
            Ok(fallback_snapshot(query.moment))
        } else {
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GeoLocation, ZodiacSign};
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_fallback_snapshot_signs() {
        let moment = Utc.with_ymd_and_hms(2025, 3, 28, 12, 0, 0).unwrap();
        let snapshot = fallback_snapshot(moment);
        assert_eq!(snapshot.source, PositionSource::Fallback);
        assert_eq!(snapshot.positions.len(), 12);
        assert_eq!(snapshot.sign_of(Planet::Venus), Some(ZodiacSign::Pisces));
        assert_eq!(snapshot.sign_of(Planet::Mars), Some(ZodiacSign::Cancer));
        assert_eq!(snapshot.sign_of(Planet::SouthNode), Some(ZodiacSign::Virgo));
        assert!(snapshot.position(Planet::Mercury).unwrap().is_retrograde);
    }

    #[test]
    fn test_request_body_uses_one_based_month() {
        let moment = Utc.with_ymd_and_hms(2025, 1, 9, 7, 45, 0).unwrap();
        let query = ChartQuery::new(moment, GeoLocation::default())
            .with_zodiac_system(ZodiacSystem::Sidereal);
        let body = serde_json::to_value(AstrologizeRequest::from(&query)).unwrap();
        assert_eq!(body["month"], 1);
        assert_eq!(body["date"], 9);
        assert_eq!(body["minute"], 45);
        assert_eq!(body["zodiacSystem"], "sidereal");
    }

    #[test]
    fn test_parse_bodies_trusts_longitude_and_skips_unknown() {
        let response: AstrologizeResponse = serde_json::from_value(json!({
            "_celestialBodies": {
                "sun": {"Sign": {"key": "aries"}, "ChartPosition": {"Ecliptic": {"DecimalDegrees": 8.5}}, "isRetrograde": false},
                "northNode": {"Sign": {"key": "aries"}, "ChartPosition": {"Ecliptic": {"DecimalDegrees": 356.88}}, "isRetrograde": true},
                "chiron": {"Sign": {"key": "aries"}, "ChartPosition": {"Ecliptic": {"DecimalDegrees": 20.0}}},
                "moon": {"Sign": {"key": "aries"}}
            }
        }))
        .unwrap();
        let positions = parse_bodies(response);
        assert_eq!(positions.len(), 2);
        let node = positions[&Planet::NorthNode];
        assert_eq!(node.sign, ZodiacSign::Pisces);
        assert!(node.is_retrograde);
    }

    #[test]
    fn test_cache_key_rounds_to_minute() {
        let a = ChartQuery::new(Utc.with_ymd_and_hms(2025, 3, 28, 12, 0, 5).unwrap(), GeoLocation::default());
        let b = ChartQuery::new(Utc.with_ymd_and_hms(2025, 3, 28, 12, 0, 50).unwrap(), GeoLocation::default());
        assert_eq!(cache_key(&a), cache_key(&b));
        let sidereal = a.with_zodiac_system(ZodiacSystem::Sidereal);
        assert_ne!(cache_key(&a), cache_key(&sidereal));
    }
}
