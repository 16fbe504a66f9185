// src/services/forms.rs

use std::{collections::HashSet, sync::LazyLock};

use chrono::Utc;
use regex::Regex;

use super::error::{ServiceError, ServiceResult};
use crate::{
    models::{
        form::{FormDefinition, FormSummary, Question},
        principal::Principal,
    },
    store::{DeleteOutcome, Store, StoreError},
};

static FORM_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("valid form name regex"));

/// Form names appear in URLs and export file names, so only
/// `[A-Za-z0-9_-]` is allowed.
pub fn validate_form_name(name: &str) -> Result<(), validator::ValidationError> {
    if !FORM_NAME_RE.is_match(name) {
        return Err(validator::ValidationError::new("invalid_form_name").with_message(
            "Form name may only contain letters, digits, '-' and '_' (max 64 chars)".into(),
        ));
    }
    Ok(())
}

/// Checks every question of a candidate form.
///
/// Manually authored, uploaded and generated questions all go through here.
pub fn validate_questions(questions: &[Question]) -> ServiceResult<()> {
    if questions.is_empty() {
        return Err(ServiceError::Validation(
            "A form needs at least one question".to_string(),
        ));
    }

    for (idx, q) in questions.iter().enumerate() {
        if q.text.trim().is_empty() {
            return Err(ServiceError::Validation(format!(
                "Question {idx}: text must not be empty"
            )));
        }
        if q.options.len() < 2 {
            return Err(ServiceError::Validation(format!(
                "Question {idx}: at least 2 options are required"
            )));
        }
        if !q.options.contains(&q.correct_answer) {
            return Err(ServiceError::Validation(format!(
                "Question {idx}: correct answer '{}' not in options",
                q.correct_answer
            )));
        }
        if !q.marks.is_finite() || q.marks < 0.0 {
            return Err(ServiceError::Validation(format!(
                "Question {idx}: marks must be a non-negative number"
            )));
        }
        let distinct: HashSet<&String> = q.options.iter().collect();
        if distinct.len() != q.options.len() {
            tracing::warn!("Question {} has repeated options", idx);
        }
    }
    Ok(())
}

/// Everything needed to create a form apart from its creator.
#[derive(Debug, Clone)]
pub struct NewForm {
    pub name: String,
    pub questions: Vec<Question>,
    pub protected: bool,
    pub show_answers: bool,
}

/// Validates and persists a new form.
///
/// The uniqueness check is the store's conditional insert; there is no
/// separate existence lookup to race against.
pub async fn create_form(
    store: &dyn Store,
    new_form: NewForm,
    creator: &Principal,
) -> ServiceResult<FormDefinition> {
    validate_form_name(&new_form.name)
        .map_err(|_| ServiceError::Validation(format!("Invalid form name '{}'", new_form.name)))?;
    validate_questions(&new_form.questions)?;

    let form = FormDefinition {
        name: new_form.name,
        questions: new_form.questions,
        protected: new_form.protected,
        show_answers: new_form.show_answers,
        creator_email: creator.email.clone(),
        created_at: Utc::now(),
    };

    store.insert_form(&form).await.map_err(|e| match e {
        StoreError::Duplicate => ServiceError::DuplicateName(form.name.clone()),
        other => ServiceError::from(other),
    })?;

    tracing::info!(
        "Form '{}' created by {} with {} questions",
        form.name,
        form.creator_email,
        form.questions.len()
    );
    Ok(form)
}

pub async fn get_form(store: &dyn Store, name: &str) -> ServiceResult<FormDefinition> {
    store
        .get_form(name)
        .await?
        .ok_or(ServiceError::NotFound("Form"))
}

pub async fn list_form_names(store: &dyn Store) -> ServiceResult<Vec<String>> {
    Ok(store.list_form_names().await?)
}

/// Forms created by `creator`, oldest first.
pub async fn list_forms_for_creator(
    store: &dyn Store,
    creator: &Principal,
) -> ServiceResult<Vec<FormSummary>> {
    let forms = store.list_forms_by_creator(&creator.email).await?;
    Ok(forms.iter().map(FormSummary::from).collect())
}

/// Deletes a form together with all of its submissions.
pub async fn delete_form(store: &dyn Store, name: &str, requester: &Principal) -> ServiceResult<()> {
    match store.delete_form_cascade(name, &requester.email).await? {
        DeleteOutcome::Deleted => {}
        DeleteOutcome::NotFound => return Err(ServiceError::NotFound("Form")),
        DeleteOutcome::NotOwner => return Err(ServiceError::AccessDenied),
    }

    tracing::info!("Form '{}' deleted by {}", name, requester.email);
    Ok(())
}
