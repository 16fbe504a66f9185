// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::ServiceError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    // 500 Internal Server Error
    #[error("internal server error: {0}")]
    InternalServerError(String),

    // 400 Bad Request
    #[error("bad request: {0}")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("unauthorized: {0}")]
    AuthError(String),

    // 403 Forbidden
    #[error("forbidden: {0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("not found: {0}")]
    NotFound(String),

    // 409 Conflict (duplicate form name or submission)
    #[error("conflict: {0}")]
    Conflict(String),

    // 502 Bad Gateway: an upstream collaborator failed, retry later
    #[error("upstream failure: {0}")]
    Upstream(String),
}

/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream service unavailable, please retry".to_string(),
                )
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => AppError::BadRequest(msg),
            ServiceError::DuplicateName(_) | ServiceError::DuplicateSubmission => {
                AppError::Conflict(err.to_string())
            }
            ServiceError::NotFound(_) => AppError::NotFound(err.to_string()),
            ServiceError::AccessDenied => AppError::Forbidden(err.to_string()),
            ServiceError::AuthenticationRequired => AppError::AuthError(err.to_string()),
            ServiceError::Upstream(msg) => AppError::Upstream(msg),
            ServiceError::Storage(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
