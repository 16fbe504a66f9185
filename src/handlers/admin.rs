// src/handlers/admin.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::AppError, services::stats, store::Store, utils::identity::CurrentUser};

/// Statistics over the forms the caller created.
pub async fn admin_stats(
    State(store): State<Arc<dyn Store>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = stats::admin_stats(store.as_ref(), &user).await?;
    Ok(Json(stats))
}
