//! Test utilities for service handler testing.
//!
//! Builds scratch SQLite stores the way the ingestion job would, and
//! application states in each readiness phase.

use std::path::{Path, PathBuf};

use airatlas_lib::{AirportDataset, AirportRecord};
use rusqlite::Connection;
use tempfile::TempDir;

use crate::state::AppState;

/// Airports used across handler tests: the two Paris airports from the
/// dataset the service was written against, plus two others.
pub fn sample_airports() -> Vec<AirportRecord> {
    vec![
        AirportRecord {
            code: "CDG".to_string(),
            city_code: "PAR".to_string(),
            country_name: "France".to_string(),
            latitude: 49.0097,
            longitude: 2.5479,
        },
        AirportRecord {
            code: "ORY".to_string(),
            city_code: "PAR".to_string(),
            country_name: "France".to_string(),
            latitude: 48.7233,
            longitude: 2.3794,
        },
        AirportRecord {
            code: "LHR".to_string(),
            city_code: "LON".to_string(),
            country_name: "United Kingdom".to_string(),
            latitude: 51.4700,
            longitude: -0.4543,
        },
        AirportRecord {
            code: "JFK".to_string(),
            city_code: "NYC".to_string(),
            country_name: "United States".to_string(),
            latitude: 40.6413,
            longitude: -73.7781,
        },
    ]
}

/// Create the `airports` table at `path` and insert the given records.
pub fn seed_store(path: &Path, airports: &[AirportRecord]) {
    let conn = Connection::open(path).expect("open writable store");
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS airports (
            AirportCode TEXT NOT NULL,
            CityCode TEXT NOT NULL,
            CountryName TEXT NOT NULL,
            Latitude REAL NOT NULL,
            Longitude REAL NOT NULL
        )",
    )
    .expect("create airports table");

    let mut stmt = conn
        .prepare(
            "INSERT INTO airports (AirportCode, CityCode, CountryName, Latitude, Longitude)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .expect("prepare insert");
    for airport in airports {
        stmt.execute(rusqlite::params![
            airport.code,
            airport.city_code,
            airport.country_name,
            airport.latitude,
            airport.longitude,
        ])
        .expect("insert airport");
    }
}

/// Create a temp directory holding a seeded store.
///
/// Returns the directory guard (keep it alive) and the store path.
pub fn temp_store(airports: &[AirportRecord]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("airports.db");
    seed_store(&path, airports);
    (dir, path)
}

/// State with a published sample dataset and a real seeded store behind it.
///
/// Returns the temp directory guard alongside the state; drop it and the
/// health connectivity probe starts reporting `false`.
pub fn ready_state() -> (TempDir, AppState) {
    let airports = sample_airports();
    let (guard, path) = temp_store(&airports);
    let state = AppState::new(path, None);
    state.publish_dataset(AirportDataset::new(airports));
    (guard, state)
}

/// State still in the `Initializing` phase, pointing at a missing store.
pub fn initializing_state() -> AppState {
    AppState::new("/nonexistent/airports.db", None)
}

/// State that has exhausted its retry budget.
pub fn failed_state() -> AppState {
    let state = AppState::new("/nonexistent/airports.db", None);
    state.mark_failed();
    state
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-{}", timestamp)
}
