// src/services/submissions.rs

use chrono::Utc;

use super::{
    error::{ServiceError, ServiceResult},
    forms::get_form,
    grading, policy,
};
use crate::{
    models::{
        principal::Principal,
        submission::{Answers, NewSubmission, RespondentSubmission, Submission, SubmissionReceipt},
    },
    store::{Store, StoreError},
};

/// Answers sent by a respondent.
#[derive(Debug, Clone)]
pub struct SubmitInput {
    pub form_name: String,
    pub display_name: String,
    pub answers: Answers,
}

/// Grades and stores a respondent's answers.
///
/// The existence check up front only saves a grading pass; the store's
/// unique (form, respondent) key is what guarantees a single record.
pub async fn submit(
    store: &dyn Store,
    respondent: &Principal,
    input: SubmitInput,
) -> ServiceResult<SubmissionReceipt> {
    let form = get_form(store, &input.form_name).await?;

    if store
        .find_submission(&form.name, &respondent.email)
        .await?
        .is_some()
    {
        return Err(ServiceError::DuplicateSubmission);
    }

    let grade = grading::grade(&form, &input.answers);

    let display_name = match input.display_name.trim() {
        "" => respondent
            .display_name
            .clone()
            .unwrap_or_else(|| respondent.email.clone()),
        name => name.to_string(),
    };

    let stored = store
        .insert_submission(NewSubmission {
            form_name: form.name.clone(),
            respondent_email: respondent.email.clone(),
            respondent_name: display_name,
            answers: input.answers,
            total_marks: grade.total_marks,
            submitted_at: Utc::now(),
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => ServiceError::DuplicateSubmission,
            StoreError::MissingParent => ServiceError::NotFound("Form"),
            other => ServiceError::from(other),
        })?;

    tracing::info!(
        "Submission {} for '{}' by {}: {}/{} ({} of {} correct)",
        stored.id,
        form.name,
        respondent.email,
        grade.total_marks,
        grade.total_possible_marks,
        grade.correct_count,
        form.questions.len()
    );

    let reveal = policy::answers_visible(&form, Some(respondent));
    Ok(SubmissionReceipt {
        message: "Submission saved",
        submission_id: stored.id,
        total_marks: reveal.then_some(grade.total_marks),
        total_possible_marks: reveal.then_some(grade.total_possible_marks),
    })
}

/// Leaderboard of a form, visible to its creator only.
pub async fn list_for_form(
    store: &dyn Store,
    form_name: &str,
    viewer: &Principal,
) -> ServiceResult<Vec<Submission>> {
    let form = store.get_form(form_name).await?;
    policy::ensure_creator(form.as_ref(), viewer)?;
    Ok(store.list_submissions_for_form(form_name).await?)
}

/// A respondent's submissions with the possible marks of each form as it is
/// defined at read time. Submissions whose form vanished are skipped.
pub async fn list_for_respondent(
    store: &dyn Store,
    respondent: &Principal,
) -> ServiceResult<Vec<RespondentSubmission>> {
    let submissions = store
        .list_submissions_for_respondent(&respondent.email)
        .await?;

    let mut rows = Vec::with_capacity(submissions.len());
    for submission in submissions {
        let Some(form) = store.get_form(&submission.form_name).await? else {
            continue;
        };
        rows.push(RespondentSubmission {
            form_name: submission.form_name,
            submitted_at: submission.submitted_at,
            total_marks: submission.total_marks,
            total_possible_marks: form.total_marks(),
            show_answers: form.show_answers,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        models::form::Question,
        services::forms::{NewForm, create_form, delete_form},
        store::MemoryStore,
    };

    fn principal(email: &str) -> Principal {
        Principal {
            principal_id: email.to_string(),
            email: email.to_string(),
            display_name: Some(format!("name of {email}")),
        }
    }

    fn question(options: &[&str], correct: &str, marks: f64) -> Question {
        Question {
            text: "Which one?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct.to_string(),
            marks,
        }
    }

    async fn seed_quiz1(store: &dyn Store, show_answers: bool) {
        create_form(
            store,
            NewForm {
                name: "quiz1".to_string(),
                questions: vec![question(&["A", "B"], "A", 1.0), question(&["C", "D"], "D", 2.0)],
                protected: false,
                show_answers,
            },
            &principal("owner@example.com"),
        )
        .await
        .unwrap();
    }

    fn input(answers: serde_json::Value) -> SubmitInput {
        SubmitInput {
            form_name: "quiz1".to_string(),
            display_name: String::new(),
            answers: serde_json::from_value(answers).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_submit_scores_server_side() {
        let store = MemoryStore::new();
        seed_quiz1(&store, true).await;

        let receipt = submit(&store, &principal("r@example.com"), input(json!({"0": "A", "1": "C"})))
            .await
            .unwrap();
        assert_eq!(receipt.total_marks, Some(1.0));
        assert_eq!(receipt.total_possible_marks, Some(3.0));

        let stored = store
            .find_submission("quiz1", "r@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_marks, 1.0);
        assert_eq!(stored.respondent_name, "name of r@example.com");
    }

    #[tokio::test]
    async fn test_second_submission_is_rejected() {
        let store = MemoryStore::new();
        seed_quiz1(&store, true).await;
        let respondent = principal("r@example.com");

        submit(&store, &respondent, input(json!({"0": "A", "1": "C"})))
            .await
            .unwrap();
        let err = submit(&store, &respondent, input(json!({"0": "A", "1": "C"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateSubmission));
        assert_eq!(store.list_submissions_for_form("quiz1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_store_exactly_one() {
        let store = Arc::new(MemoryStore::new());
        seed_quiz1(store.as_ref(), true).await;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                submit(
                    store.as_ref(),
                    &principal("r@example.com"),
                    input(json!({"0": "A", "1": "D"})),
                )
                .await
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(e) => assert!(matches!(e, ServiceError::DuplicateSubmission)),
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(store.list_submissions_for_form("quiz1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_unknown_form() {
        let store = MemoryStore::new();
        let err = submit(&store, &principal("r@example.com"), input(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_hidden_form_receipt_omits_score() {
        let store = MemoryStore::new();
        seed_quiz1(&store, false).await;
        let receipt = submit(&store, &principal("r@example.com"), input(json!({"0": "A"})))
            .await
            .unwrap();
        assert_eq!(receipt.total_marks, None);
        // Still graded and stored.
        let stored = store
            .find_submission("quiz1", "r@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_marks, 1.0);
    }

    #[tokio::test]
    async fn test_leaderboard_is_creator_only_and_sorted() {
        let store = MemoryStore::new();
        seed_quiz1(&store, true).await;
        for (email, answers) in [
            ("low@x", json!({"0": "B"})),
            ("high@x", json!({"0": "A", "1": "D"})),
            ("mid@x", json!({"1": "D"})),
        ] {
            submit(&store, &principal(email), input(answers)).await.unwrap();
        }

        let owner = principal("owner@example.com");
        let board = list_for_form(&store, "quiz1", &owner).await.unwrap();
        let marks: Vec<f64> = board.iter().map(|s| s.total_marks).collect();
        assert_eq!(marks, vec![3.0, 2.0, 0.0]);
        for pair in board.windows(2) {
            assert!(pair[0].total_marks >= pair[1].total_marks);
        }

        assert!(matches!(
            list_for_form(&store, "quiz1", &principal("low@x")).await,
            Err(ServiceError::AccessDenied)
        ));
        assert!(matches!(
            list_for_form(&store, "nope", &owner).await,
            Err(ServiceError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn test_delete_leaves_no_submissions() {
        let store = MemoryStore::new();
        seed_quiz1(&store, true).await;
        let respondent = principal("r@example.com");
        submit(&store, &respondent, input(json!({"0": "A"}))).await.unwrap();

        delete_form(&store, "quiz1", &principal("owner@example.com"))
            .await
            .unwrap();
        assert!(store.list_submissions_for_form("quiz1").await.unwrap().is_empty());
        assert!(list_for_respondent(&store, &respondent).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_for_respondent_annotates_possible_marks() {
        let store = MemoryStore::new();
        seed_quiz1(&store, true).await;
        let respondent = principal("r@example.com");
        submit(&store, &respondent, input(json!({"0": "A"}))).await.unwrap();

        let rows = list_for_respondent(&store, &respondent).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_marks, 1.0);
        assert_eq!(rows[0].total_possible_marks, 3.0);
        assert!(rows[0].show_answers);
    }
}
