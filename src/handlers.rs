pub mod charts;
pub mod health;
pub mod sessions;
pub mod summary;
pub mod tables;

use crate::schemas::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use axum_valid::{ValidRejection, ValidationRejection};
use compute::ComputeError;
use dataset::DatasetError;
use std::fmt::Display;
use tracing::{error, warn};

pub type HandlerError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, code: &str, error: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }),
    )
}

/// Map a rejected `Valid<..>` extractor to the JSON error body
///
/// Failed validation rules become `INVALID_SELECTION`; a body or query that
/// cannot be parsed keeps the inner extractor's status.
pub fn rejection_response<E>(rejection: ValidRejection<E>) -> HandlerError
where
    E: IntoResponse + Display,
{
    match rejection {
        ValidationRejection::Valid(errors) => {
            warn!("Rejected selection: {}", errors);
            error_response(StatusCode::BAD_REQUEST, "INVALID_SELECTION", errors.to_string())
        }
        ValidationRejection::Inner(inner) => {
            let message = inner.to_string();
            let status = inner.into_response().status();
            warn!("Malformed request: {}", message);
            error_response(status, "INVALID_REQUEST", message)
        }
    }
}

/// Map a compute failure to its HTTP status and error code
pub fn compute_error_response(err: ComputeError) -> HandlerError {
    match &err {
        ComputeError::Dataset(DatasetError::NotFound(_)) | ComputeError::UnknownChart(_) => {
            warn!("Lookup failed: {}", err);
            error_response(StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
        }
        ComputeError::ColumnNotFound { .. } | ComputeError::UnknownCategoryColumn { .. } => {
            warn!("Lookup failed: {}", err);
            error_response(StatusCode::NOT_FOUND, "COLUMN_NOT_FOUND", err.to_string())
        }
        ComputeError::InvalidSelection(_) => {
            warn!("Rejected selection: {}", err);
            error_response(StatusCode::BAD_REQUEST, "INVALID_SELECTION", err.to_string())
        }
        ComputeError::Dataset(_) | ComputeError::Calculation(_) | ComputeError::DataFrame(_) => {
            error!("Internal error: {}", err);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Failed to compute response",
            )
        }
    }
}
