//! Read-only access to the `airports` reference table.
//!
//! The table is owned and populated by an external ingestion job; this
//! module only ever opens the store read-only and loads snapshots. Column
//! names follow the ingestion job's schema (`AirportCode`, `CityCode`,
//! `CountryName`, `Latitude`, `Longitude`).

use std::path::Path;

use rusqlite::{Connection, OpenFlags, Row};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

/// A single airport reference record.
///
/// Immutable once loaded into a dataset snapshot. Uniqueness by `code` is
/// expected but enforced by the ingestion job, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportRecord {
    /// IATA-style airport code, e.g. "CDG".
    #[serde(rename = "AirportCode")]
    pub code: String,

    /// IATA-style city code, e.g. "PAR".
    #[serde(rename = "CityCode")]
    pub city_code: String,

    /// Country name, e.g. "France".
    #[serde(rename = "CountryName")]
    pub country_name: String,

    /// Latitude in degrees, within [-90, 90].
    #[serde(rename = "Latitude")]
    pub latitude: f64,

    /// Longitude in degrees, within [-180, 180].
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// An immutable, ordered snapshot of airport records.
///
/// A snapshot is wholly replaced on re-initialization; the query path never
/// mutates individual records in place, so concurrent readers always
/// observe a consistent view.
#[derive(Debug, Clone, Default)]
pub struct AirportDataset {
    records: Vec<AirportRecord>,
}

impl AirportDataset {
    /// Build a snapshot from an ordered sequence of records.
    pub fn new(records: Vec<AirportRecord>) -> Self {
        Self { records }
    }

    /// Number of records in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, AirportRecord> {
        self.records.iter()
    }

    /// Records in stored order.
    pub fn records(&self) -> &[AirportRecord] {
        &self.records
    }
}

/// Open a read-only connection to the airport store and verify it responds.
///
/// Fails if the database file does not exist (the store is consumed
/// read-only; this library never creates it) or does not answer a ping.
pub fn open_store(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| Error::StoreConnection {
        path: path.to_path_buf(),
        source,
    })?;

    conn.query_row("SELECT 1", [], |_| Ok(()))
        .map_err(|source| Error::StoreConnection {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), "store connection established");
    Ok(conn)
}

/// Count rows in the `airports` table.
///
/// Errors if the table does not exist yet, which is expected while the
/// external ingestion job is still racing us.
pub fn count_airports(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM airports", [], |row| row.get(0))?;
    Ok(count)
}

/// Load a full dataset snapshot from the `airports` table.
///
/// Returns `Error::DataUnavailable` when the table holds no rows; an empty
/// snapshot is never handed to callers.
pub fn load_airports(conn: &Connection) -> Result<AirportDataset> {
    let mut stmt = conn.prepare(
        "SELECT AirportCode, CityCode, CountryName, Latitude, Longitude FROM airports",
    )?;
    let rows = stmt.query_map([], record_from_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }

    if records.is_empty() {
        return Err(Error::DataUnavailable {
            reason: "airports table has no rows".to_string(),
        });
    }

    debug!(count = records.len(), "loaded airport records");
    Ok(AirportDataset::new(records))
}

/// Best-effort connectivity probe for health reporting.
///
/// Never errors; any failure degrades to `false`.
pub fn check_connectivity(path: impl AsRef<Path>) -> bool {
    open_store(path).is_ok()
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<AirportRecord> {
    Ok(AirportRecord {
        code: row.get("AirportCode")?,
        city_code: row.get("CityCode")?,
        country_name: row.get("CountryName")?,
        latitude: row.get("Latitude")?,
        longitude: row.get("Longitude")?,
    })
}
