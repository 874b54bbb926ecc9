//! Request types and coordinate validation for HTTP endpoints.
//!
//! Coordinate fields arrive as raw JSON values so the boundary can tell
//! "missing field" apart from "not numeric" apart from "out of range",
//! each with its own machine-readable reason. Numeric strings are coerced
//! (the original consumers send both).

use serde::Deserialize;
use serde_json::Value;

use crate::ProblemDetails;

/// Valid latitude range in degrees.
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// Valid longitude range in degrees.
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Validation trait for request types.
///
/// Implementations check every field and produce the validated form, or a
/// `ProblemDetails` describing the first failure. The `request_id`
/// populates the `instance` field of any returned problem. The error is
/// boxed to avoid large `Result::Err` variants.
pub trait Validate {
    type Valid;

    fn validate(&self, request_id: &str) -> Result<Self::Valid, Box<ProblemDetails>>;
}

/// A validated coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Request body for the nearest-airport endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearestAirportRequest {
    #[serde(default)]
    pub latitude: Option<Value>,

    #[serde(default)]
    pub longitude: Option<Value>,
}

impl Validate for NearestAirportRequest {
    type Valid = Coordinates;

    fn validate(&self, request_id: &str) -> Result<Coordinates, Box<ProblemDetails>> {
        let latitude = numeric_field(&self.latitude, "latitude", request_id)?;
        let longitude = numeric_field(&self.longitude, "longitude", request_id)?;

        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(Box::new(ProblemDetails::bad_request(
                "out of range: latitude must be within [-90, 90]",
                request_id,
            )));
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(Box::new(ProblemDetails::bad_request(
                "out of range: longitude must be within [-180, 180]",
                request_id,
            )));
        }

        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}

fn numeric_field(
    value: &Option<Value>,
    name: &str,
    request_id: &str,
) -> Result<f64, Box<ProblemDetails>> {
    let value = value.as_ref().ok_or_else(|| {
        Box::new(ProblemDetails::bad_request(
            format!("missing field: {name}"),
            request_id,
        ))
    })?;

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(Box::new(ProblemDetails::bad_request(
            format!("not numeric: {name}"),
            request_id,
        ))),
    }
}
