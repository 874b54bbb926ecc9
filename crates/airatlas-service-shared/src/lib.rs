//! Shared infrastructure for the airport atlas HTTP services.
//!
//! This crate provides the glue every service binary needs:
//!
//! - [`AppState`]: readiness flag plus the published dataset snapshot
//! - [`health`]: `/health` and `/status` handlers
//! - [`ProblemDetails`]: RFC 9457 Problem Details for error responses
//! - [`ServiceResponse`]: wrapper for successful responses
//! - [`request`]: request types with coordinate validation
//! - [`logging`]: structured logging setup
//! - [`metrics`]: Prometheus metrics infrastructure
//!
//! Business logic (distance, resolution, initialization) lives in
//! `airatlas-lib`; handlers here only parse, validate, delegate and shape.
//!
//! # Testing Support
//!
//! The [`test_utils`] module builds scratch SQLite stores and pre-published
//! application states. Enable the `test-utils` feature to use it from
//! dependent crates.

mod health;
pub mod logging;
pub mod metrics;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::{health_handler, status_handler, HealthReport, StatusReport};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_import_triggered, record_nearest_distance,
    record_nearest_failed, record_nearest_resolved, MetricsConfig, MetricsError,
};
pub use problem::{
    ProblemDetails, PROBLEM_IMPORT_FAILED, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_SERVICE_UNAVAILABLE,
};
pub use request::{Coordinates, NearestAirportRequest, Validate};
pub use response::ServiceResponse;
pub use state::{AppState, Readiness};
