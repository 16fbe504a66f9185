// src/handlers/submissions.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::submission::{MySubmissionView, SubmitRequest},
    services::{export, policy, stats, submissions},
    store::Store,
    utils::identity::CurrentUser,
};

/// Submits answers to a form.
///
/// * The respondent identity comes from the token, never the body.
/// * Marks are computed server side from the stored definition.
/// * A second submission by the same respondent is a 409.
pub async fn submit(
    State(store): State<Arc<dyn Store>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let receipt = submissions::submit(
        store.as_ref(),
        &user,
        submissions::SubmitInput {
            form_name: req.form_name,
            display_name: req.user_name,
            answers: req.answers,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Leaderboard of a form. Creator only.
pub async fn list_submissions(
    State(store): State<Arc<dyn Store>>,
    CurrentUser(user): CurrentUser,
    Path(form_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rows = submissions::list_for_form(store.as_ref(), &form_name, &user).await?;
    Ok(Json(rows))
}

/// CSV download of a form's submissions. Creator only.
pub async fn export_submissions(
    State(store): State<Arc<dyn Store>>,
    CurrentUser(user): CurrentUser,
    Path(form_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let csv = export::export_submissions(store.as_ref(), &form_name, &user).await?;
    let disposition = format!("attachment; filename=\"{form_name}_submissions.csv\"");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// The caller's own submissions plus summary statistics.
pub async fn my_submissions(
    State(store): State<Arc<dyn Store>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = submissions::list_for_respondent(store.as_ref(), &user).await?;
    let summary = stats::respondent_stats(&rows);
    let views: Vec<MySubmissionView> = rows.into_iter().map(policy::my_submission_view).collect();

    Ok(Json(json!({
        "submissions": views,
        "stats": summary,
    })))
}
