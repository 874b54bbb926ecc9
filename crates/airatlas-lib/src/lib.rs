//! Core library for the airport atlas services.
//!
//! Provides the building blocks the HTTP boundary composes:
//!
//! - [`geo`]: great-circle distance on a spherical Earth
//! - [`store`]: read-only access to the `airports` reference table and the
//!   in-memory [`AirportDataset`] snapshot loaded from it
//! - [`resolver`]: linear-scan nearest-airport resolution
//! - [`supervisor`]: the startup state machine that retries store
//!   connection and waits for the table to be populated
//!
//! The library never talks HTTP; response shaping and validation live in
//! the service crates.

pub mod error;
pub mod geo;
pub mod resolver;
pub mod store;
pub mod supervisor;

pub use error::{Error, Result};
pub use geo::haversine_km;
pub use resolver::{resolve_nearest, round_km, Nearest};
pub use store::{AirportDataset, AirportRecord};
pub use supervisor::{InitState, RetryPolicy, Supervisor};
