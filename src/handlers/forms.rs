// src/handlers/forms.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use super::upload::read_upload;
use crate::{
    error::AppError,
    models::form::{CreateFormRequest, QuestionFile},
    services::{
        forms::{self, NewForm},
        policy,
    },
    store::Store,
    utils::identity::{CurrentUser, MaybeUser},
};

/// Creates a form from a JSON body.
///
/// * Validates the DTO (name shape, question count).
/// * Validates every question (answer in options, >= 2 options, text, marks).
/// * Inserts conditionally; an existing name is a 409.
pub async fn create_form(
    State(store): State<Arc<dyn Store>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateFormRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let form = forms::create_form(
        store.as_ref(),
        NewForm {
            name: payload.form_name,
            questions: payload.questions,
            protected: payload.protected,
            show_answers: payload.show_answers,
        },
        &user,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Form created",
            "form_id": form.name,
        })),
    ))
}

/// Creates a form from an uploaded JSON file (`{"questions": [...]}`).
pub async fn upload_form(
    State(store): State<Arc<dyn Store>>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let upload = read_upload(multipart).await?;

    let file: QuestionFile = serde_json::from_slice(&upload.file)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON format: {e}")))?;

    let form = forms::create_form(
        store.as_ref(),
        NewForm {
            name: upload.form_name,
            questions: file.questions,
            protected: upload.protected,
            show_answers: upload.show_answers,
        },
        &user,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Form saved successfully",
            "form_id": form.name,
        })),
    ))
}

/// Returns a form, filtered by the visibility policy.
pub async fn get_form(
    State(store): State<Arc<dyn Store>>,
    MaybeUser(viewer): MaybeUser,
    Path(form_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let form = forms::get_form(store.as_ref(), &form_name).await?;
    let view = policy::view_form(form, viewer.as_ref())?;
    Ok(Json(view))
}

/// Lists the names of all forms.
pub async fn list_forms(
    State(store): State<Arc<dyn Store>>,
) -> Result<impl IntoResponse, AppError> {
    let names = forms::list_form_names(store.as_ref()).await?;
    Ok(Json(json!({ "forms": names })))
}

/// Deletes a form and its submissions. Creator only.
pub async fn delete_form(
    State(store): State<Arc<dyn Store>>,
    CurrentUser(user): CurrentUser,
    Path(form_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    forms::delete_form(store.as_ref(), &form_name, &user).await?;
    Ok(Json(json!({ "message": "Form deleted successfully" })))
}

/// Lists the forms created by the caller.
pub async fn my_forms(
    State(store): State<Arc<dyn Store>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let forms = forms::list_forms_for_creator(store.as_ref(), &user).await?;
    Ok(Json(json!({ "forms": forms })))
}
