// src/services/stats.rs

use super::{error::ServiceResult, grading::percentage, submissions::list_for_respondent};
use crate::{
    models::{
        principal::Principal,
        stats::{AdminStats, RespondentStats},
        submission::RespondentSubmission,
    },
    store::Store,
};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Totals over every form `creator` owns.
pub async fn admin_stats(store: &dyn Store, creator: &Principal) -> ServiceResult<AdminStats> {
    let forms = store.list_forms_by_creator(&creator.email).await?;
    let names: Vec<String> = forms.iter().map(|f| f.name.clone()).collect();
    let total_submissions = store.count_submissions_for_forms(&names).await?;

    Ok(AdminStats {
        total_forms: forms.len() as i64,
        protected_forms: forms.iter().filter(|f| f.protected).count() as i64,
        total_submissions,
    })
}

/// Computes respondent statistics.
///
/// `total_submissions` counts everything. The percentages only use forms that
/// reveal answers and are worth more than zero marks.
pub fn respondent_stats(rows: &[RespondentSubmission]) -> RespondentStats {
    let scores: Vec<f64> = rows
        .iter()
        .filter(|r| r.show_answers)
        .filter_map(|r| percentage(r.total_marks, r.total_possible_marks))
        .collect();

    if scores.is_empty() {
        return RespondentStats {
            total_submissions: rows.len() as i64,
            ..Default::default()
        };
    }

    let average = scores.iter().sum::<f64>() / scores.len() as f64;
    let best = scores.iter().copied().fold(f64::MIN, f64::max);

    RespondentStats {
        total_submissions: rows.len() as i64,
        average_score: round2(average),
        best_score: round2(best),
    }
}

pub async fn stats_for_respondent(
    store: &dyn Store,
    respondent: &Principal,
) -> ServiceResult<RespondentStats> {
    let rows = list_for_respondent(store, respondent).await?;
    Ok(respondent_stats(&rows))
}
