// src/services/error.rs

use thiserror::Error;

use crate::store::StoreError;

/// Failures of the grading and submission services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed input the caller has to fix.
    #[error("{0}")]
    Validation(String),

    #[error("Form name '{0}' already exists")]
    DuplicateName(String),

    #[error("You have already submitted this form")]
    DuplicateSubmission,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Access denied")]
    AccessDenied,

    #[error("Authentication required")]
    AuthenticationRequired,

    /// An external collaborator failed. Retryable.
    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
