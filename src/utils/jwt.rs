// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::identity::{IdentityError, IdentityProvider};
use crate::{error::AppError, models::principal::Principal};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the identity provider's user id.
    pub sub: String,
    /// Email, used as the ownership key.
    pub email: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a new JWT for a principal.
pub fn sign_jwt(
    principal: &Principal,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    // Calculate expiration: current time + expiration_seconds
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: principal.principal_id.clone(),
        email: principal.email.clone(),
        name: principal.display_name.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, IdentityError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| IdentityError::Invalid(e.to_string()))?;

    Ok(token_data.claims)
}

/// Identity provider backed by HS256 tokens signed with a shared secret.
pub struct JwtIdentityProvider {
    secret: String,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Principal, IdentityError> {
        let claims = verify_jwt(token, &self.secret)?;
        if claims.email.trim().is_empty() {
            return Err(IdentityError::Invalid("token carries no email".to_string()));
        }
        Ok(Principal {
            principal_id: claims.sub,
            email: claims.email,
            display_name: claims.name,
        })
    }
}
