//! Shared helpers for integration tests: building scratch airport stores.

use std::path::{Path, PathBuf};

use airatlas_lib::AirportRecord;
use rusqlite::Connection;
use tempfile::TempDir;

/// A handful of real-world airports used across tests.
pub fn sample_airports() -> Vec<AirportRecord> {
    vec![
        airport("CDG", "PAR", "France", 49.0097, 2.5479),
        airport("ORY", "PAR", "France", 48.7233, 2.3794),
        airport("LHR", "LON", "United Kingdom", 51.4700, -0.4543),
        airport("JFK", "NYC", "United States", 40.6413, -73.7781),
    ]
}

pub fn airport(
    code: &str,
    city_code: &str,
    country_name: &str,
    latitude: f64,
    longitude: f64,
) -> AirportRecord {
    AirportRecord {
        code: code.to_string(),
        city_code: city_code.to_string(),
        country_name: country_name.to_string(),
        latitude,
        longitude,
    }
}

/// Create the `airports` table at `path` and insert the given records,
/// using a writable connection the way the ingestion job would.
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

/// Create a store file with an empty `airports` table.
pub fn empty_store() -> (TempDir, PathBuf) {
    temp_store(&[])
}

/// Create a store file with no tables at all.
pub fn bare_store() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("airports.db");
    let conn = Connection::open(&path).expect("open writable store");
    // Force the database file into existence.
    conn.execute_batch("PRAGMA user_version = 1").expect("init store");
    (dir, path)
}
