//! API error handling
//!
//! Consistent JSON error responses across all endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Structured JSON error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error type that converts to JSON responses
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request data
    InvalidArgument(String),
    /// Resource not found
    NotFound(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, response) = match self {
            ApiError::InvalidArgument(msg) => {
                warn!("Rejected request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: msg,
                        code: Some("invalid_argument".to_string()),
                    },
                )
            }
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: msg,
                    code: Some("not_found".to_string()),
                },
            ),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal server error".to_string(),
                        code: Some("internal_error".to_string()),
                    },
                )
            }
        };

        (status, Json(response)).into_response()
    }
}

impl From<common::Error> for ApiError {
    fn from(err: common::Error) -> Self {
        match err {
            common::Error::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            common::Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
