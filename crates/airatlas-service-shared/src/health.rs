//! Health and status handlers.
//!
//! `/health` always answers 200 with best-effort internals; a store probe
//! failure degrades the `database` flag instead of propagating. `/status`
//! answers 503 while initialization is in flight so clients know to retry.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, Readiness};

/// Payload for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Readiness value: "initializing", "ready" or "failed".
    pub status: String,

    /// Whether the backing store answered a connectivity probe.
    pub database: bool,

    /// Number of airports in the published snapshot.
    pub airports_count: usize,
}

/// Payload for `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    /// Readiness value: "initializing", "ready" or "failed".
    pub status: String,

    /// Dataset size, reported once ready.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airports_count: Option<usize>,

    /// Explanation while not ready.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusReport {
    fn ready(airports_count: usize) -> Self {
        Self {
            status: Readiness::Ready.as_str().to_string(),
            airports_count: Some(airports_count),
            message: None,
        }
    }

    fn not_ready(readiness: Readiness, message: &str) -> Self {
        Self {
            status: readiness.as_str().to_string(),
            airports_count: None,
            message: Some(message.to_string()),
        }
    }
}

/// Handle `GET /health`. Never fails; internal probe errors are swallowed
/// into a degraded report.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store_path = state.store_path().to_path_buf();
    let database = tokio::task::spawn_blocking(move || {
        airatlas_lib::store::check_connectivity(&store_path)
    })
    .await
    .unwrap_or(false);

    let report = HealthReport {
        status: state.readiness().as_str().to_string(),
        database,
        airports_count: state.airports_count(),
    };
    (StatusCode::OK, Json(report))
}

/// Handle `GET /status`. 200 with the dataset size once ready; 503 with a
/// retry hint otherwise.
pub async fn status_handler(State(state): State<AppState>) -> Response {
    match state.readiness() {
        Readiness::Ready => {
            let report = StatusReport::ready(state.airports_count());
            (StatusCode::OK, Json(report)).into_response()
        }
        Readiness::Initializing => {
            let report = StatusReport::not_ready(
                Readiness::Initializing,
                "service is still initializing, retry shortly",
            );
            (StatusCode::SERVICE_UNAVAILABLE, Json(report)).into_response()
        }
        Readiness::Failed => {
            let report = StatusReport::not_ready(
                Readiness::Failed,
                "initialization failed, operator restart required",
            );
            (StatusCode::SERVICE_UNAVAILABLE, Json(report)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_report_includes_count() {
        let report = StatusReport::ready(7000);
        assert_eq!(report.status, "ready");
        assert_eq!(report.airports_count, Some(7000));
        assert!(report.message.is_none());
    }

    #[test]
    fn not_ready_report_includes_message() {
        let report = StatusReport::not_ready(Readiness::Initializing, "still loading");
        assert_eq!(report.status, "initializing");
        assert!(report.airports_count.is_none());
        assert_eq!(report.message.as_deref(), Some("still loading"));
    }

    #[test]
    fn status_report_omits_absent_fields() {
        let json = serde_json::to_string(&StatusReport::ready(3)).unwrap();
        assert!(json.contains("\"airports_count\":3"));
        assert!(!json.contains("message"));

        let json = serde_json::to_string(&StatusReport::not_ready(
            Readiness::Failed,
            "restart required",
        ))
        .unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(!json.contains("airports_count"));
    }

    #[test]
    fn health_report_round_trips() {
        let report = HealthReport {
            status: "ready".to_string(),
            database: true,
            airports_count: 12,
        };
        let json = serde_json::to_string(&report).unwrap();
        let parsed: HealthReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, "ready");
        assert!(parsed.database);
        assert_eq!(parsed.airports_count, 12);
    }
}
