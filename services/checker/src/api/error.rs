//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so the rare call-level
//! failures keep a uniform shape.
//!
//! # Key invariants and assumptions
//! - Error responses must include a stable `code` and human-readable
//!   `message`.
//! - Verification failures are never API errors; they become deny decisions.
use crate::api::types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    // Client input failed validation or was malformed.
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            code: "validation_error".to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}
