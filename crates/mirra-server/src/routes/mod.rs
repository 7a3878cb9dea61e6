//! Mirra API Routes
//!
//! - /mirra/personas - dataset persona management
//! - /mirra/analyze - product analysis pipeline

pub mod analyze;
pub mod persona;
pub mod swagger;

use axum::http::StatusCode;
use mirra::DomainError;

/// Map a domain error onto an HTTP response
pub(crate) fn error_response(error: DomainError) -> (StatusCode, String) {
    let status = match &error {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string())
}
