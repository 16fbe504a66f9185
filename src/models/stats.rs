// src/models/stats.rs

use serde::Serialize;

/// Statistics over the forms a creator owns.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct AdminStats {
    pub total_forms: i64,
    pub protected_forms: i64,
    pub total_submissions: i64,
}

/// Statistics over a respondent's submissions.
///
/// Percentages only consider forms that reveal answers.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentStats {
    pub total_submissions: i64,
    pub average_score: f64,
    pub best_score: f64,
}
