// src/models/submission.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Respondent answers keyed by question index ("0", "1", ...).
///
/// Values are kept as raw JSON so a malformed entry costs the respondent that
/// question rather than rejecting the whole submission.
pub type Answers = BTreeMap<String, serde_json::Value>;

/// One graded submission. At most one exists per (form, respondent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(skip_serializing, default)]
    pub id: i64,
    pub form_name: String,
    #[serde(rename = "user_email")]
    pub respondent_email: String,
    #[serde(rename = "user_name")]
    pub respondent_name: String,
    pub answers: Answers,
    pub total_marks: f64,
    pub submitted_at: DateTime<Utc>,
}

/// Submission about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub form_name: String,
    pub respondent_email: String,
    pub respondent_name: String,
    pub answers: Answers,
    pub total_marks: f64,
    pub submitted_at: DateTime<Utc>,
}

/// DTO for `POST /submit`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    #[validate(length(min = 1, max = 64))]
    pub form_name: String,

    /// Display name shown on the leaderboard. Falls back to the token's name.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub user_name: String,

    #[serde(default)]
    pub answers: Answers,
}

/// Response body of a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmissionReceipt {
    pub message: &'static str,
    pub submission_id: i64,
    /// Omitted when the form hides answers from the respondent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_marks: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_possible_marks: Option<f64>,
}

/// A respondent's own submission, annotated with the marks available on the
/// form as it is defined right now.
#[derive(Debug, Clone, PartialEq)]
pub struct RespondentSubmission {
    pub form_name: String,
    pub submitted_at: DateTime<Utc>,
    pub total_marks: f64,
    pub total_possible_marks: f64,
    pub show_answers: bool,
}

/// Row of `GET /my-submissions`.
#[derive(Debug, Serialize)]
pub struct MySubmissionView {
    pub form_name: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_marks: Option<f64>,
    pub total_possible_marks: f64,
    pub show_answers: bool,
}
