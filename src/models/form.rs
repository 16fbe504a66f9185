// src/models/form.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::forms::validate_form_name;

/// A single graded multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// The prompt shown to respondents. Serialized as `question`, like
    /// `PublicQuestion`.
    #[serde(rename = "question", alias = "text")]
    pub text: String,

    /// Ordered answer choices. Must contain `correct_answer`.
    pub options: Vec<String>,

    pub correct_answer: String,

    /// Marks awarded for an exact match. Non-negative.
    #[serde(default)]
    pub marks: f64,
}

/// A persisted form. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(rename = "form_name")]
    pub name: String,

    /// Answers are keyed by position in this list, so order is significant.
    pub questions: Vec<Question>,

    /// Protected forms can only be read by authenticated callers.
    pub protected: bool,

    /// When false, `correct_answer` is stripped for everyone except the creator.
    pub show_answers: bool,

    pub creator_email: String,

    pub created_at: DateTime<Utc>,
}

impl FormDefinition {
    /// Sum of marks over every question.
    pub fn total_marks(&self) -> f64 {
        self.questions.iter().map(|q| q.marks).sum()
    }
}

/// Question as returned to a caller after the visibility policy ran.
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub marks: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

/// Policy-filtered form returned by `GET /form/{name}`.
#[derive(Debug, Serialize)]
pub struct FormView {
    pub form_name: String,
    pub questions: Vec<PublicQuestion>,
    pub protected: bool,
    pub show_answers: bool,
    pub creator_email: String,
    pub created_at: DateTime<Utc>,
}

/// Row of `GET /my-forms`.
#[derive(Debug, Serialize)]
pub struct FormSummary {
    pub form_name: String,
    pub created_at: DateTime<Utc>,
    pub protected: bool,
    pub show_answers: bool,
    pub question_count: usize,
    pub total_marks: f64,
}

impl From<&FormDefinition> for FormSummary {
    fn from(form: &FormDefinition) -> Self {
        Self {
            form_name: form.name.clone(),
            created_at: form.created_at,
            protected: form.protected,
            show_answers: form.show_answers,
            question_count: form.questions.len(),
            total_marks: form.total_marks(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// DTO for creating a form by hand.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFormRequest {
    #[validate(length(min = 1, max = 64), custom(function = validate_form_name))]
    pub form_name: String,

    #[validate(length(min = 1, max = 200, message = "A form needs between 1 and 200 questions"))]
    pub questions: Vec<Question>,

    #[serde(default)]
    pub protected: bool,

    #[serde(default = "default_true")]
    pub show_answers: bool,
}

/// Shape of an uploaded JSON question file.
#[derive(Debug, Deserialize)]
pub struct QuestionFile {
    #[serde(default)]
    pub questions: Vec<Question>,
}
