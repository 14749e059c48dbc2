//! End-to-end flow: Google Maps (wiremock) + SQLite + zone CSV

use std::io::Write;

use application::services::Outcome;
use chrono::{TimeZone, Utc};
use domain::{Coordinate, LocationSample, SubjectId};
use infrastructure::{AppComponents, AppConfig, DatabaseConfig};
use integration_maps::MapsConfig;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn geocode_reply(address: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "status": "OK",
        "results": [{ "formatted_address": address }]
    }))
}

async fn mount_geocode(server: &MockServer, latlng: &str, address: &str) {
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("latlng", latlng))
        .respond_with(geocode_reply(address))
        .mount(server)
        .await;
}

async fn mount_distance(server: &MockServer, reply: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .and(query_param("origins", "10,20"))
        .and(query_param("destinations", "10.5,20.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(server)
        .await;
}

fn zone_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "id,formatted_address\n1,Sunset Plaza\n2,Toll Gate 4").unwrap();
    file
}

fn config(server: &MockServer, zones: &tempfile::NamedTempFile) -> AppConfig {
    let mut config = AppConfig {
        database: DatabaseConfig::in_memory(),
        maps: MapsConfig::for_testing(server.uri()),
        ..AppConfig::default()
    };
    config.zones.data_file = zones.path().to_string_lossy().into_owned();
    config
}

fn sample(lat: f64, lon: f64, minute: u32) -> LocationSample {
    LocationSample::new(
        SubjectId::new("driver-1").unwrap(),
        Coordinate::new_unchecked(lat, lon),
        Utc.with_ymd_and_hms(2024, 5, 1, 8, minute, 0).unwrap(),
    )
}

#[tokio::test]
async fn entry_then_exit_bills_the_trip() {
    let server = MockServer::start().await;
    mount_geocode(&server, "10,20", "Sunset Plaza, Gate 2").await;
    mount_geocode(&server, "10.5,20.5", "Highway 9, Farmland").await;
    mount_distance(
        &server,
        serde_json::json!({
            "status": "OK",
            "rows": [{ "elements": [{
                "status": "OK",
                "distance": { "text": "12.3 km", "value": 12340 }
            }]}]
        }),
    )
    .await;

    let zones = zone_file();
    let components = AppComponents::build(&config(&server, &zones)).unwrap();
    assert_eq!(components.zones.len(), 2);
    let engine = &components.engine;

    let entered = engine.process_sample(&sample(10.0, 20.0, 0)).await.unwrap();
    let Outcome::Entered { trip } = entered else {
        panic!("expected entry, got {entered:?}");
    };
    assert_eq!(trip.entry().label, "Sunset Plaza, Gate 2");

    // Still inside: no change
    let again = engine.process_sample(&sample(10.0, 20.0, 1)).await.unwrap();
    assert!(matches!(again, Outcome::NoChange));

    let exited = engine.process_sample(&sample(10.5, 20.5, 30)).await.unwrap();
    let Outcome::Exited { trip: closed } = exited else {
        panic!("expected exit, got {exited:?}");
    };
    assert_eq!(closed.id(), trip.id());
    assert_eq!(closed.distance_km(), Some(12.34));
    assert_eq!(closed.amount_due(), Some(37.02));
    assert_eq!(closed.exit().map(|e| e.label.as_str()), Some("Highway 9, Farmland"));

    let stored = components.trip_store.get(&trip.id()).await.unwrap().unwrap();
    assert_eq!(stored, closed);
    assert_eq!(components.trip_store.count_open().await.unwrap(), 0);
}

#[tokio::test]
async fn route_failure_still_closes_the_trip() {
    let server = MockServer::start().await;
    mount_geocode(&server, "10,20", "Toll Gate 4").await;
    mount_geocode(&server, "10.5,20.5", "Open Road").await;
    mount_distance(
        &server,
        serde_json::json!({
            "status": "OK",
            "rows": [{ "elements": [{ "status": "ZERO_RESULTS" }]}]
        }),
    )
    .await;

    let zones = zone_file();
    let components = AppComponents::build(&config(&server, &zones)).unwrap();
    let engine = &components.engine;

    engine.process_sample(&sample(10.0, 20.0, 0)).await.unwrap();
    let exited = engine.process_sample(&sample(10.5, 20.5, 30)).await.unwrap();
    let Outcome::Exited { trip } = exited else {
        panic!("expected exit, got {exited:?}");
    };
    assert_eq!(trip.distance_km(), Some(0.0));
    assert_eq!(trip.amount_due(), Some(0.0));
    assert!(!trip.is_open());
}

#[tokio::test]
async fn geocoder_outage_never_enters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let zones = zone_file();
    let components = AppComponents::build(&config(&server, &zones)).unwrap();

    let outcome = components
        .engine
        .process_sample(&sample(10.0, 20.0, 0))
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::NoChange));
    assert_eq!(components.trip_store.count_open().await.unwrap(), 0);
}
