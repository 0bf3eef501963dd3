//! # Valve API Errors
//!
//! Every handler failure funnels through [`ApiError`], which picks the status
//! code and renders the `{"message": ...}` body.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::responses::ErrorResponse;
use crate::model::ValidationError;
use crate::storage::StorageError;

/// Result type for valve handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Valve API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Form or query string could not be extracted
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// A field broke a payload rule
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Name already taken by another valve
    #[error("A valve with the same name is already in the catalog")]
    DuplicateName,

    /// Create failed for a reason other than a duplicate name
    #[error("Could not save the new valve")]
    SaveFailed,

    #[error("Valve not found")]
    ValveNotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Storage failure; the cause is logged, never sent
    #[error("Internal storage error")]
    Storage(#[source] StorageError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Rejected { status, .. } => *status,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::DuplicateName => StatusCode::CONFLICT,
            ApiError::SaveFailed => StatusCode::BAD_REQUEST,
            ApiError::ValveNotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        if err.is_unique_violation() {
            ApiError::DuplicateName
        } else {
            ApiError::Storage(err)
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Validation(e) => ErrorResponse::for_field(e.field(), e.to_string()),
            other => ErrorResponse::new(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage(cause) = &self {
            tracing::error!(error = %cause, code = %cause.code(), "storage failure");
        }

        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
