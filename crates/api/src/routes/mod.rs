//! API routes

pub mod achievements;
pub mod badges;
pub mod donors;
pub mod health;
pub mod leaderboard;
pub mod points;
pub mod rules;
pub mod streak;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Evaluation instant from an optional `now` field, defaulting to the current time
pub(crate) fn evaluation_time(body: &Value) -> ApiResult<DateTime<Utc>> {
    match body.get("now") {
        None | Some(Value::Null) => Ok(Utc::now()),
        Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| ApiError::InvalidArgument(format!("now: {}", e))),
        Some(_) => Err(ApiError::InvalidArgument(
            "now must be an RFC 3339 string".to_string(),
        )),
    }
}

/// The `donations` field of a request body
pub(crate) fn donations_field(body: &Value) -> &Value {
    body.get("donations").unwrap_or(&Value::Null)
}
