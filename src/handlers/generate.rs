// src/handlers/generate.rs

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use super::upload::read_upload;
use crate::{
    error::AppError,
    services::generation::{GenerateOptions, generate_form},
    state::AppState,
    utils::identity::CurrentUser,
};

const DEFAULT_QUESTION_COUNT: usize = 5;

/// Generates a form from an uploaded text document.
pub async fn generate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let upload = read_upload(multipart).await?;

    let form = generate_form(
        state.store.as_ref(),
        state.generator.as_deref(),
        &upload.file,
        GenerateOptions {
            form_name: upload.form_name,
            num_questions: upload.num_questions.unwrap_or(DEFAULT_QUESTION_COUNT),
            protected: upload.protected,
            show_answers: upload.show_answers,
        },
        &user,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Form generated",
            "form_id": form.name,
            "question_count": form.questions.len(),
        })),
    ))
}
