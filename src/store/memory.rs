// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DeleteOutcome, Store, StoreError};
use crate::models::{
    form::FormDefinition,
    submission::{NewSubmission, Submission},
};

#[derive(Default)]
struct Inner {
    forms: HashMap<String, FormDefinition>,
    /// Arrival order. Ids are assigned from `next_id`.
    submissions: Vec<Submission>,
    next_id: i64,
}

/// In-process store. Every operation runs under a single lock, which gives
/// the same atomicity guarantees as the Postgres constraints.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_form(&self, form: &FormDefinition) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.forms.contains_key(&form.name) {
            return Err(StoreError::Duplicate);
        }
        inner.forms.insert(form.name.clone(), form.clone());
        Ok(())
    }

    async fn get_form(&self, name: &str) -> Result<Option<FormDefinition>, StoreError> {
        Ok(self.inner.read().await.forms.get(name).cloned())
    }

    async fn list_form_names(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.read().await;
        let mut forms: Vec<&FormDefinition> = inner.forms.values().collect();
        forms.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(forms.into_iter().map(|f| f.name.clone()).collect())
    }

    async fn list_forms_by_creator(
        &self,
        email: &str,
    ) -> Result<Vec<FormDefinition>, StoreError> {
        let inner = self.inner.read().await;
        let mut forms: Vec<FormDefinition> = inner
            .forms
            .values()
            .filter(|f| f.creator_email == email)
            .cloned()
            .collect();
        forms.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(forms)
    }

    async fn delete_form_cascade(
        &self,
        name: &str,
        creator_email: &str,
    ) -> Result<DeleteOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.forms.get(name) {
            None => return Ok(DeleteOutcome::NotFound),
            Some(form) if form.creator_email != creator_email => {
                return Ok(DeleteOutcome::NotOwner);
            }
            Some(_) => {}
        }
        inner.forms.remove(name);
        inner.submissions.retain(|s| s.form_name != name);
        Ok(DeleteOutcome::Deleted)
    }

    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Submission, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.forms.contains_key(&submission.form_name) {
            return Err(StoreError::MissingParent);
        }
        let exists = inner.submissions.iter().any(|s| {
            s.form_name == submission.form_name
                && s.respondent_email == submission.respondent_email
        });
        if exists {
            return Err(StoreError::Duplicate);
        }

        inner.next_id += 1;
        let stored = Submission {
            id: inner.next_id,
            form_name: submission.form_name,
            respondent_email: submission.respondent_email,
            respondent_name: submission.respondent_name,
            answers: submission.answers,
            total_marks: submission.total_marks,
            submitted_at: submission.submitted_at,
        };
        inner.submissions.push(stored.clone());
        Ok(stored)
    }

    async fn find_submission(
        &self,
        form_name: &str,
        respondent_email: &str,
    ) -> Result<Option<Submission>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .submissions
            .iter()
            .find(|s| s.form_name == form_name && s.respondent_email == respondent_email)
            .cloned())
    }

    async fn list_submissions_for_form(
        &self,
        form_name: &str,
    ) -> Result<Vec<Submission>, StoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Submission> = inner
            .submissions
            .iter()
            .filter(|s| s.form_name == form_name)
            .cloned()
            .collect();
        // Stable sort keeps arrival order among equal marks.
        rows.sort_by(|a, b| b.total_marks.total_cmp(&a.total_marks));
        Ok(rows)
    }

    async fn list_submissions_for_respondent(
        &self,
        respondent_email: &str,
    ) -> Result<Vec<Submission>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .submissions
            .iter()
            .filter(|s| s.respondent_email == respondent_email)
            .cloned()
            .collect())
    }

    async fn count_submissions_for_forms(&self, form_names: &[String]) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        let count = inner
            .submissions
            .iter()
            .filter(|s| form_names.contains(&s.form_name))
            .count();
        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::models::form::Question;

    fn form(name: &str) -> FormDefinition {
        FormDefinition {
            name: name.to_string(),
            questions: vec![Question {
                text: "Pick A".to_string(),
                options: vec!["A".to_string(), "B".to_string()],
                correct_answer: "A".to_string(),
                marks: 1.0,
            }],
            protected: false,
            show_answers: true,
            creator_email: "owner@example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    fn new_submission(form_name: &str, email: &str, marks: f64) -> NewSubmission {
        NewSubmission {
            form_name: form_name.to_string(),
            respondent_email: email.to_string(),
            respondent_name: email.to_string(),
            answers: Default::default(),
            total_marks: marks,
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_form_is_conditional() {
        let store = MemoryStore::new();
        store.insert_form(&form("quiz1")).await.unwrap();
        let err = store.insert_form(&form("quiz1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
    }

    #[tokio::test]
    async fn submission_requires_existing_form() {
        let store = MemoryStore::new();
        let err = store
            .insert_submission(new_submission("ghost", "a@example.com", 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingParent));
    }

    #[tokio::test]
    async fn concurrent_duplicate_submissions_store_one() {
        let store = Arc::new(MemoryStore::new());
        store.insert_form(&form("quiz1")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert_submission(new_submission("quiz1", "a@example.com", 1.0))
                    .await
            }));
        }

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.list_submissions_for_form("quiz1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn leaderboard_ties_keep_arrival_order() {
        let store = MemoryStore::new();
        store.insert_form(&form("quiz1")).await.unwrap();
        for (email, marks) in [("a@x", 1.0), ("b@x", 3.0), ("c@x", 1.0), ("d@x", 3.0)] {
            store
                .insert_submission(new_submission("quiz1", email, marks))
                .await
                .unwrap();
        }

        let order: Vec<String> = store
            .list_submissions_for_form("quiz1")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.respondent_email)
            .collect();
        assert_eq!(order, vec!["b@x", "d@x", "a@x", "c@x"]);
    }

    #[tokio::test]
    async fn cascade_delete_removes_submissions() {
        let store = MemoryStore::new();
        store.insert_form(&form("quiz1")).await.unwrap();
        store.insert_form(&form("quiz2")).await.unwrap();
        store
            .insert_submission(new_submission("quiz1", "a@x", 1.0))
            .await
            .unwrap();
        store
            .insert_submission(new_submission("quiz2", "a@x", 1.0))
            .await
            .unwrap();

        assert_eq!(
            store.delete_form_cascade("quiz1", "intruder@example.com").await.unwrap(),
            DeleteOutcome::NotOwner
        );
        assert_eq!(store.list_submissions_for_form("quiz1").await.unwrap().len(), 1);
        assert_eq!(
            store.delete_form_cascade("quiz1", "owner@example.com").await.unwrap(),
            DeleteOutcome::Deleted
        );
        assert_eq!(
            store.delete_form_cascade("quiz1", "owner@example.com").await.unwrap(),
            DeleteOutcome::NotFound
        );
        assert!(store.list_submissions_for_form("quiz1").await.unwrap().is_empty());
        assert_eq!(
            store
                .count_submissions_for_forms(&["quiz1".to_string(), "quiz2".to_string()])
                .await
                .unwrap(),
            1
        );
    }
}
