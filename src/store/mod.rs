// src/store/mod.rs

//! Persistence for forms and submissions.
//!
//! Both backends enforce uniqueness inside the storage layer: form names are a
//! conditional insert and submissions carry a unique (form, respondent) key.
//! A check done by the caller beforehand is only a fast path.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    form::FormDefinition,
    submission::{NewSubmission, Submission},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key already exists.
    #[error("record already exists")]
    Duplicate,

    /// The referenced form does not exist (anymore).
    #[error("referenced form does not exist")]
    MissingParent,

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate;
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingParent;
            }
        }
        StoreError::Backend(err.to_string())
    }
}

/// Result of an owner-conditional delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// The form exists but belongs to someone else. Nothing was deleted.
    NotOwner,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Inserts a form, failing with `Duplicate` if the name is taken.
    async fn insert_form(&self, form: &FormDefinition) -> Result<(), StoreError>;

    async fn get_form(&self, name: &str) -> Result<Option<FormDefinition>, StoreError>;

    /// All form names in creation order.
    async fn list_form_names(&self) -> Result<Vec<String>, StoreError>;

    async fn list_forms_by_creator(&self, email: &str)
    -> Result<Vec<FormDefinition>, StoreError>;

    /// Deletes a form and all of its submissions as one atomic step, but only
    /// if `creator_email` still owns it at the moment of deletion.
    async fn delete_form_cascade(
        &self,
        name: &str,
        creator_email: &str,
    ) -> Result<DeleteOutcome, StoreError>;

    /// Inserts a graded submission.
    ///
    /// Fails with `Duplicate` when the respondent already submitted and with
    /// `MissingParent` when the form is gone.
    async fn insert_submission(&self, submission: NewSubmission)
    -> Result<Submission, StoreError>;

    async fn find_submission(
        &self,
        form_name: &str,
        respondent_email: &str,
    ) -> Result<Option<Submission>, StoreError>;

    /// Submissions of one form, highest marks first, ties in arrival order.
    async fn list_submissions_for_form(&self, form_name: &str)
    -> Result<Vec<Submission>, StoreError>;

    /// Submissions of one respondent, oldest first.
    async fn list_submissions_for_respondent(
        &self,
        respondent_email: &str,
    ) -> Result<Vec<Submission>, StoreError>;

    async fn count_submissions_for_forms(&self, form_names: &[String]) -> Result<i64, StoreError>;
}
