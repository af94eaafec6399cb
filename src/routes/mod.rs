// src/routes/mod.rs

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::error::AllocationError;

pub mod health;
pub mod lifecycle;
pub mod officers;
pub mod pass;
pub mod selection;
pub mod targets;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

// Common error mapper
pub fn error_response(e: AllocationError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &e {
        AllocationError::PassInFlight => StatusCode::CONFLICT,
        AllocationError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        e if e.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_GATEWAY,
    };
    let message = match &e {
        // Backend text goes out exactly as received.
        AllocationError::TransactionRejected(m)
        | AllocationError::TransactionTransportFailure(m)
        | AllocationError::DirectoryUnavailable(m)
        | AllocationError::FeedUnavailable(m) => m.clone(),
        other => other.to_string(),
    };
    (
        status,
        Json(ErrorBody {
            error: e.kind(),
            message,
        }),
    )
}
