// src/generator/mod.rs

//! Quiz generation from free text through an external text-generation API.
//!
//! Generated questions get no special trust: they are validated exactly like
//! hand-written ones before a form is created.

pub mod openai;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::models::form::Question;

pub use openai::OpenAiQuizGenerator;

/// Upper bound on the document text sent to the generator.
pub const MAX_SOURCE_CHARS: usize = 12_000;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generator request timed out after {0}s")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(String),

    #[error("generator API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not parse generated questions: {0}")]
    Parse(String),
}

#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Asks the model for `count` multiple-choice questions about `text`.
    async fn generate(&self, text: &str, count: usize) -> Result<Vec<Question>, GeneratorError>;
}

/// Extracts usable text from an uploaded document.
///
/// Only UTF-8 text documents are understood. Whitespace runs are collapsed and
/// the result is cut to `MAX_SOURCE_CHARS`.
pub fn extract_text(bytes: &[u8]) -> Result<String, String> {
    let raw = std::str::from_utf8(bytes)
        .map_err(|_| "Document must be UTF-8 text".to_string())?
        .trim_start_matches('\u{feff}');

    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err("Document contains no text".to_string());
    }
    Ok(normalized.chars().take(MAX_SOURCE_CHARS).collect())
}

pub(crate) fn build_prompt(text: &str, count: usize) -> String {
    format!(
        "Create {count} multiple-choice questions about the text below. \
         Respond ONLY with a JSON array. Each element must be an object with the keys \
         \"question\" (string), \"options\" (array of 4 distinct strings), \
         \"correct_answer\" (string, exactly equal to one of the options) and \
         \"marks\" (number, use 1).\n\nText:\n{text}"
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GeneratedPayload {
    List(Vec<Question>),
    Wrapped { questions: Vec<Question> },
}

/// Parses model output into questions. Accepts a bare JSON array or
/// `{"questions": [...]}`, optionally inside a markdown code fence.
pub fn parse_questions(content: &str) -> Result<Vec<Question>, GeneratorError> {
    let body = strip_code_fence(content);
    let payload: GeneratedPayload =
        serde_json::from_str(body).map_err(|e| GeneratorError::Parse(e.to_string()))?;
    let questions = match payload {
        GeneratedPayload::List(questions) => questions,
        GeneratedPayload::Wrapped { questions } => questions,
    };
    if questions.is_empty() {
        return Err(GeneratorError::Parse("no questions in response".to_string()));
    }
    Ok(questions)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag line, if any.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
