//! # Error Handling Middleware
//!
//! Maps [`DomainError`] to HTTP status codes and a `{"error": "..."}` JSON
//! body, and wraps successful mutation results as
//! `{"success": true, "data": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::error;
use tutorly_core::errors::DomainError;

/// Application error wrapper that provides HTTP status code mapping.
///
/// ```
/// use tutorly_api::middleware::error_handling::AppError;
/// use tutorly_core::errors::DomainError;
///
/// fn find(id: u32) -> Result<(), AppError> {
///     Err(DomainError::NotFound(format!("Booking {} not found", id)).into())
/// }
/// # fn main() { assert!(find(7).is_err()); }
/// ```
#[derive(Debug)]
pub struct AppError(pub DomainError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Authentication(_) => StatusCode::UNAUTHORIZED,
            DomainError::Unauthorized(_) => StatusCode::FORBIDDEN,
            DomainError::InvalidState(_) => StatusCode::CONFLICT,
            DomainError::TutorUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
            DomainError::Transaction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Storage details stay in the log.
        let message = if status.is_server_error() {
            error!(error = ?self.0, "request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError(err)
    }
}

/// Wraps storage and hashing failures as `DomainError::Transaction`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(DomainError::Transaction(err))
    }
}

/// Envelope for successful mutations.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    pub data: T,
}

pub fn success<T: Serialize>(data: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        data,
    })
}
