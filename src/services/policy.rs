// src/services/policy.rs

//! Who may see what.
//!
//! * Protected forms need an authenticated caller to be read at all.
//! * `show_answers = false` strips correct answers (and scores) for everyone
//!   except the creator.
//! * Submissions and exports are creator-only. Denials never reveal whether
//!   the form exists.

use super::error::{ServiceError, ServiceResult};
use crate::models::{
    form::{FormDefinition, FormView, PublicQuestion},
    principal::Principal,
    submission::{MySubmissionView, RespondentSubmission},
};

pub fn is_creator(form: &FormDefinition, viewer: Option<&Principal>) -> bool {
    viewer.is_some_and(|p| p.is(&form.creator_email))
}

/// Whether `viewer` may see correct answers and marks for `form`.
pub fn answers_visible(form: &FormDefinition, viewer: Option<&Principal>) -> bool {
    form.show_answers || is_creator(form, viewer)
}

/// Produces the representation of `form` that `viewer` is allowed to read.
pub fn view_form(form: FormDefinition, viewer: Option<&Principal>) -> ServiceResult<FormView> {
    if form.protected && viewer.is_none() {
        return Err(ServiceError::AuthenticationRequired);
    }

    let reveal = answers_visible(&form, viewer);
    let questions = form
        .questions
        .into_iter()
        .map(|q| PublicQuestion {
            question: q.text,
            options: q.options,
            marks: q.marks,
            correct_answer: reveal.then_some(q.correct_answer),
        })
        .collect();

    Ok(FormView {
        form_name: form.name,
        questions,
        protected: form.protected,
        show_answers: form.show_answers,
        creator_email: form.creator_email,
        created_at: form.created_at,
    })
}

/// Gate for creator-only views. A missing form is reported exactly like
/// someone else's form.
pub fn ensure_creator(form: Option<&FormDefinition>, viewer: &Principal) -> ServiceResult<()> {
    match form {
        Some(form) if viewer.is(&form.creator_email) => Ok(()),
        _ => Err(ServiceError::AccessDenied),
    }
}

/// Hides marks on the respondent's own listing for answer-hidden forms.
pub fn my_submission_view(row: RespondentSubmission) -> MySubmissionView {
    MySubmissionView {
        total_marks: row.show_answers.then_some(row.total_marks),
        form_name: row.form_name,
        submitted_at: row.submitted_at,
        total_possible_marks: row.total_possible_marks,
        show_answers: row.show_answers,
    }
}
