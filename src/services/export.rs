// src/services/export.rs

use super::{error::ServiceResult, policy};
use crate::{
    models::{principal::Principal, submission::Submission},
    store::Store,
};

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn answer_cell(submission: &Submission, idx: usize) -> String {
    match submission.answers.get(&idx.to_string()) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Renders submissions as CSV, one row per submission in the given order.
pub fn render_csv(question_count: usize, submissions: &[Submission]) -> String {
    let mut csv = String::from("user_name,user_email,total_marks,submitted_at");
    for idx in 0..question_count {
        csv.push_str(&format!(",q{idx}"));
    }
    csv.push('\n');

    for s in submissions {
        csv.push_str(&format!(
            "{},{},{},{}",
            escape_csv(&s.respondent_name),
            escape_csv(&s.respondent_email),
            s.total_marks,
            s.submitted_at.to_rfc3339()
        ));
        for idx in 0..question_count {
            csv.push(',');
            csv.push_str(&escape_csv(&answer_cell(s, idx)));
        }
        csv.push('\n');
    }
    csv
}

/// CSV export of a form's leaderboard. Creator only.
pub async fn export_submissions(
    store: &dyn Store,
    form_name: &str,
    viewer: &Principal,
) -> ServiceResult<String> {
    let form = store.get_form(form_name).await?;
    policy::ensure_creator(form.as_ref(), viewer)?;
    let question_count = form.map(|f| f.questions.len()).unwrap_or_default();

    let submissions = store.list_submissions_for_form(form_name).await?;
    tracing::info!(
        "Exporting {} submissions of '{}' for {}",
        submissions.len(),
        form_name,
        viewer.email
    );
    Ok(render_csv(question_count, &submissions))
}
