use alchm_kitchen::adapters::circuit_breaker::{BreakerSettings, CircuitState};
use alchm_kitchen::core::EphemerisSource;
use alchm_kitchen::domain::model::{
    ChartQuery, GeoLocation, Planet, PositionSource, ZodiacSign,
};
use alchm_kitchen::{AstrologizeClient, EphemerisSettings, KitchenError};
use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use std::time::Duration;

fn chart_body() -> serde_json::Value {
    serde_json::json!({
        "_celestialBodies": {
            "sun": {"Sign": {"key": "aries"}, "ChartPosition": {"Ecliptic": {"DecimalDegrees": 8.5}}, "isRetrograde": false},
            "moon": {"Sign": {"key": "aries"}, "ChartPosition": {"Ecliptic": {"DecimalDegrees": 1.57}}, "isRetrograde": false},
            "mars": {"Sign": {"key": "cancer"}, "ChartPosition": {"Ecliptic": {"DecimalDegrees": 112.63}}, "isRetrograde": false},
            "venus": {"Sign": {"key": "pisces"}, "ChartPosition": {"Ecliptic": {"DecimalDegrees": 359.08}}, "isRetrograde": true}
        }
    })
}

fn query() -> ChartQuery {
    ChartQuery::new(
        Utc.with_ymd_and_hms(2025, 3, 28, 18, 30, 0).unwrap(),
        GeoLocation::default(),
    )
}

fn settings(primary: String, fallback: Option<String>, use_fallback: bool) -> EphemerisSettings {
    EphemerisSettings {
        primary_url: primary,
        fallback_url: fallback,
        timeout: Duration::from_secs(2),
        cache_ttl: Duration::from_secs(3600),
        breaker: BreakerSettings {
            failure_threshold: 2,
            recovery_timeout: Duration::from_secs(60),
        },
        use_fallback,
    }
}

#[tokio::test]
async fn test_remote_chart_then_cache_hit() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/astrologize")
            .json_body_partial(r#"{"year": 2025, "month": 3, "date": 28, "hour": 18, "minute": 30, "zodiacSystem": "tropical"}"#);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(chart_body());
    });

    let client = AstrologizeClient::new(settings(server.url("/api/astrologize"), None, false)).unwrap();

    let first = client.positions(&query()).await.unwrap();
    assert_eq!(first.source, PositionSource::Remote);
    assert_eq!(first.positions.len(), 4);
    assert_eq!(first.sign_of(Planet::Mars), Some(ZodiacSign::Cancer));
    assert!(first.position(Planet::Venus).unwrap().is_retrograde);

    let second = client.positions(&query()).await.unwrap();
    assert_eq!(second.source, PositionSource::Cache);
    assert_eq!(second.positions, first.positions);

    api_mock.assert_hits(1);
}

#[tokio::test]
async fn test_expired_cache_entry_refetches() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/api/astrologize");
        then.status(200).json_body(chart_body());
    });

    let mut short_ttl = settings(server.url("/api/astrologize"), None, false);
    short_ttl.cache_ttl = Duration::from_millis(50);
    let client = AstrologizeClient::new(short_ttl).unwrap();

    let first = client.positions(&query()).await.unwrap();
    assert_eq!(first.source, PositionSource::Remote);
    let cached = client.positions(&query()).await.unwrap();
    assert_eq!(cached.source, PositionSource::Cache);
    api_mock.assert_hits(1);

    tokio::time::sleep(Duration::from_millis(120)).await;

    let refreshed = client.positions(&query()).await.unwrap();
    assert_eq!(refreshed.source, PositionSource::Remote);
    api_mock.assert_hits(2);
}

#[tokio::test]
async fn test_secondary_endpoint_used_when_primary_fails() {
    let server = MockServer::start();
    let primary = server.mock(|when, then| {
        when.method(POST).path("/primary");
        then.status(503);
    });
    let secondary = server.mock(|when, then| {
        when.method(POST).path("/secondary");
        then.status(200).json_body(chart_body());
    });

    let client = AstrologizeClient::new(settings(
        server.url("/primary"),
        Some(server.url("/secondary")),
        false,
    ))
    .unwrap();

    let snapshot = client.positions(&query()).await.unwrap();
    assert_eq!(snapshot.source, PositionSource::Remote);
    primary.assert_hits(1);
    secondary.assert_hits(1);
    assert_eq!(client.breaker().failure_count(), 0);
}

#[tokio::test]
async fn test_fallback_chart_when_api_down() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/astrologize");
        then.status(500);
    });

    let client = AstrologizeClient::new(settings(server.url("/api/astrologize"), None, true)).unwrap();
    let snapshot = client.positions(&query()).await.unwrap();
    assert_eq!(snapshot.source, PositionSource::Fallback);
    assert_eq!(snapshot.positions.len(), 12);
    assert_eq!(snapshot.sign_of(Planet::Pluto), Some(ZodiacSign::Aquarius));
}

#[tokio::test]
async fn test_empty_body_map_is_a_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/astrologize");
        then.status(200).json_body(serde_json::json!({"_celestialBodies": {}}));
    });

    let client = AstrologizeClient::new(settings(server.url("/api/astrologize"), None, false)).unwrap();
    let err = client.positions(&query()).await.unwrap_err();
    assert!(matches!(err, KitchenError::EphemerisError { .. }));
}

#[tokio::test]
async fn test_circuit_opens_and_skips_remote() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/api/astrologize");
        then.status(500);
    });

    let client = AstrologizeClient::new(settings(server.url("/api/astrologize"), None, false)).unwrap();

    for _ in 0..2 {
        let err = client.positions(&query()).await.unwrap_err();
        assert!(matches!(err, KitchenError::EphemerisError { .. }));
    }
    assert_eq!(client.breaker().state(), CircuitState::Open);

    let err = client.positions(&query()).await.unwrap_err();
    assert!(matches!(err, KitchenError::CircuitOpen { .. }));
    api_mock.assert_hits(2);
}
