//! Nearest-airport HTTP microservice.
//!
//! Resolves the airport closest to a coordinate pair against an in-memory
//! snapshot of the `airports` reference table. The snapshot is loaded once
//! at startup by a retrying supervisor; until it is published, query
//! traffic receives 503 instead of blocking.
//!
//! # Endpoints
//!
//! - `POST /closest_airport` - Resolve the nearest airport to a coordinate
//! - `POST /run_data_import` - Trigger the external ingestion job
//! - `GET /health` - Readiness, store connectivity and dataset size
//! - `GET /status` - Readiness with retry signaling while initializing
//! - `GET /metrics` - Prometheus metrics endpoint
//!
//! # Configuration
//!
//! - `AIRATLAS_DATA_PATH` - Path to the airports SQLite file (default: /data/airports.db)
//! - `AIRATLAS_IMPORT_COMMAND` - External ingestion command for /run_data_import (optional)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use std::env;
use std::net::SocketAddr;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use airatlas_lib::{resolve_nearest, round_km, AirportRecord, RetryPolicy, Supervisor};
use airatlas_service_shared::{
    health_handler, init_logging, init_metrics, metrics_handler, record_import_triggered,
    record_nearest_distance, record_nearest_failed, record_nearest_resolved, status_handler,
    AppState, LoggingConfig, MetricsConfig, NearestAirportRequest, ProblemDetails,
    ServiceResponse, Validate,
};

/// Service name used in logs and metrics labels.
const SERVICE_NAME: &str = "nearest";

/// Resolved airport returned to the caller, using the store's column names.
#[derive(Debug, Serialize)]
struct ClosestAirportResponse {
    #[serde(flatten)]
    airport: AirportRecord,

    /// Great-circle distance from the query point, rounded to 2 decimals.
    #[serde(rename = "DistanceKm")]
    distance_km: f64,
}

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success(ServiceResponse<ClosestAirportResponse>),
    Error(ProblemDetails),
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

/// Outcome of a data-import trigger, mirrored to the caller.
#[derive(Debug, Serialize)]
struct ImportOutcome {
    status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    stderr: Option<String>,
}

impl ImportOutcome {
    fn success(output: String) -> Self {
        Self {
            status: "success".to_string(),
            output: Some(output),
            message: None,
            stderr: None,
        }
    }

    fn error(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self {
            status: "error".to_string(),
            output: None,
            message: Some(message.into()),
            stderr,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (reads LOG_FORMAT from environment)
    let logging_config = LoggingConfig::from_env().with_service(SERVICE_NAME);
    init_logging(&logging_config);

    // Initialize metrics
    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        // Log but don't fail - metrics are optional
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    // Load configuration from environment
    let data_path =
        env::var("AIRATLAS_DATA_PATH").unwrap_or_else(|_| "/data/airports.db".to_string());
    let import_command = env::var("AIRATLAS_IMPORT_COMMAND").ok();
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(data_path = %data_path, port = port, "starting nearest-airport service");

    let state = AppState::new(&data_path, import_command);

    // The supervisor retries in the background; requests arriving before it
    // publishes a snapshot observe 503 rather than blocking.
    let supervisor_state = state.clone();
    tokio::spawn(async move {
        let mut supervisor = Supervisor::new(&data_path, RetryPolicy::default());
        match supervisor.run().await {
            Ok(dataset) => {
                info!(airports = dataset.len(), "initialization complete");
                supervisor_state.publish_dataset(dataset);
            }
            Err(e) => {
                error!(error = %e, "initialization failed, restart required");
                supervisor_state.mark_failed();
            }
        }
    });

    let app = build_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the service router with all endpoints and layers.
fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/closest_airport", post(closest_airport_handler))
        .route("/run_data_import", post(run_data_import_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handle POST /closest_airport requests.
async fn closest_airport_handler(
    State(state): State<AppState>,
    Json(request): Json<NearestAirportRequest>,
) -> Response {
    let request_id = generate_request_id();

    let coords = match request.validate(&request_id) {
        Ok(coords) => coords,
        Err(problem) => {
            record_nearest_failed("validation_error", SERVICE_NAME);
            return Response::Error(*problem);
        }
    };

    // Fails closed until the supervisor has published a snapshot.
    let dataset = match state.dataset() {
        Ok(dataset) => dataset,
        Err(readiness) => {
            record_nearest_failed("not_ready", SERVICE_NAME);
            return Response::Error(ProblemDetails::service_unavailable(
                format!(
                    "service is not ready to resolve airports (status: {})",
                    readiness.as_str()
                ),
                &request_id,
            ));
        }
    };

    let nearest = match resolve_nearest(&dataset, coords.latitude, coords.longitude) {
        Ok(nearest) => nearest,
        Err(e) => {
            // Unreachable once ready (published snapshots are non-empty),
            // but surfaced as a retryable condition rather than a crash.
            record_nearest_failed("empty_dataset", SERVICE_NAME);
            return Response::Error(ProblemDetails::service_unavailable(
                e.to_string(),
                &request_id,
            ));
        }
    };

    record_nearest_resolved(SERVICE_NAME);
    record_nearest_distance(nearest.distance_km);

    info!(
        request_id = %request_id,
        airport = %nearest.airport.code,
        distance_km = nearest.distance_km,
        "nearest airport resolved"
    );

    let response = ClosestAirportResponse {
        airport: nearest.airport.clone(),
        distance_km: round_km(nearest.distance_km),
    };

    Response::Success(ServiceResponse::new(response))
}

/// Handle POST /run_data_import requests.
///
/// Runs the configured external ingestion command and mirrors its captured
/// output back to the caller.
async fn run_data_import_handler(State(state): State<AppState>) -> axum::response::Response {
    let request_id = generate_request_id();

    let Some(command_line) = state.import_command() else {
        return ProblemDetails::service_unavailable(
            "no import command configured (set AIRATLAS_IMPORT_COMMAND)",
            &request_id,
        )
        .into_response();
    };

    let mut parts = command_line.split_whitespace();
    let Some(program) = parts.next() else {
        return ProblemDetails::service_unavailable(
            "configured import command is empty",
            &request_id,
        )
        .into_response();
    };

    info!(request_id = %request_id, command = %command_line, "triggering data import");

    let output = match tokio::process::Command::new(program)
        .args(parts)
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            record_import_triggered("error");
            error!(request_id = %request_id, error = %e, "failed to launch import command");
            let outcome =
                ImportOutcome::error(format!("failed to launch import command: {e}"), None);
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(outcome)).into_response();
        }
    };

    if output.status.success() {
        record_import_triggered("success");
        info!(request_id = %request_id, "data import completed");
        let outcome = ImportOutcome::success(String::from_utf8_lossy(&output.stdout).into_owned());
        (StatusCode::OK, Json(outcome)).into_response()
    } else {
        record_import_triggered("error");
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        error!(request_id = %request_id, code = ?output.status.code(), "import command failed");
        let outcome = ImportOutcome::error("import command failed", Some(stderr));
        (StatusCode::INTERNAL_SERVER_ERROR, Json(outcome)).into_response()
    }
}

/// Generate a unique request ID for tracing.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    format!("req-{:x}", timestamp)
}
