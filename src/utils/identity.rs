// src/utils/identity.rs

use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use thiserror::Error;

use crate::{error::AppError, models::principal::Principal, state::AppState};

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The token is malformed, expired or forged.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// The provider could not be reached.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Verifies bearer tokens and resolves them to a principal.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Principal, IdentityError>;
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn authenticate(state: &AppState, token: &str) -> Result<Principal, AppError> {
    let timeout = Duration::from_secs(state.config.auth_timeout_secs);
    match tokio::time::timeout(timeout, state.identity.verify(token)).await {
        Ok(Ok(principal)) => Ok(principal),
        Ok(Err(IdentityError::Invalid(reason))) => {
            tracing::debug!("Rejected token: {}", reason);
            Err(AppError::AuthError(
                "Invalid authentication credentials".to_string(),
            ))
        }
        Ok(Err(IdentityError::Unavailable(reason))) => Err(AppError::Upstream(reason)),
        Err(_) => Err(AppError::Upstream(format!(
            "identity provider did not answer within {}s",
            state.config.auth_timeout_secs
        ))),
    }
}

/// Extractor: the request must carry a valid `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::AuthError("Authentication required".to_string()))?;
        authenticate(state, token).await.map(CurrentUser)
    }
}

/// Extractor: anonymous callers are allowed, but a token that is present must
/// be valid.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Principal>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Some(token) => authenticate(state, token).await.map(|p| MaybeUser(Some(p))),
            None => Ok(MaybeUser(None)),
        }
    }
}
