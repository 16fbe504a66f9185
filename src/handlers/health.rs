// src/handlers/health.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{error::AppError, store::Store};

pub async fn health(State(store): State<Arc<dyn Store>>) -> Result<impl IntoResponse, AppError> {
    store.ping().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        AppError::InternalServerError(e.to_string())
    })?;
    Ok(Json(json!({ "status": "ok" })))
}
