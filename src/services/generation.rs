// src/services/generation.rs

use super::{
    error::{ServiceError, ServiceResult},
    forms::{NewForm, create_form, validate_form_name},
};
use crate::{
    generator::{QuizGenerator, extract_text},
    models::{form::FormDefinition, principal::Principal},
    store::Store,
};

/// Form settings supplied alongside an uploaded document.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub form_name: String,
    pub num_questions: usize,
    pub protected: bool,
    pub show_answers: bool,
}

/// Builds a form from a document: extract text, ask the generator, then run
/// the regular creation path on the candidates.
pub async fn generate_form(
    store: &dyn Store,
    generator: Option<&dyn QuizGenerator>,
    document: &[u8],
    options: GenerateOptions,
    creator: &Principal,
) -> ServiceResult<FormDefinition> {
    let generator = generator
        .ok_or_else(|| ServiceError::Upstream("quiz generation is not configured".to_string()))?;

    if !(1..=50).contains(&options.num_questions) {
        return Err(ServiceError::Validation(
            "num_questions must be between 1 and 50".to_string(),
        ));
    }

    let text = extract_text(document).map_err(ServiceError::Validation)?;

    // Reject the name before the upstream call.
    validate_form_name(&options.form_name).map_err(|_| {
        ServiceError::Validation(format!("Invalid form name '{}'", options.form_name))
    })?;
    if store.get_form(&options.form_name).await?.is_some() {
        return Err(ServiceError::DuplicateName(options.form_name));
    }

    let mut questions = generator
        .generate(&text, options.num_questions)
        .await
        .map_err(|e| {
            tracing::error!("Quiz generation failed: {}", e);
            ServiceError::Upstream(e.to_string())
        })?;
    questions.truncate(options.num_questions);

    create_form(
        store,
        NewForm {
            name: options.form_name,
            questions,
            protected: options.protected,
            show_answers: options.show_answers,
        },
        creator,
    )
    .await
}
