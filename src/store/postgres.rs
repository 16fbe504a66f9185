// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, prelude::FromRow, types::Json};

use super::{DeleteOutcome, Store, StoreError};
use crate::models::{
    form::{FormDefinition, Question},
    submission::{Answers, NewSubmission, Submission},
};

/// Maps the 'forms' table.
#[derive(FromRow)]
struct FormRow {
    name: String,
    questions: Json<Vec<Question>>,
    protected: bool,
    show_answers: bool,
    creator_email: String,
    created_at: DateTime<Utc>,
}

impl From<FormRow> for FormDefinition {
    fn from(row: FormRow) -> Self {
        Self {
            name: row.name,
            questions: row.questions.0,
            protected: row.protected,
            show_answers: row.show_answers,
            creator_email: row.creator_email,
            created_at: row.created_at,
        }
    }
}

/// Maps the 'submissions' table.
#[derive(FromRow)]
struct SubmissionRow {
    id: i64,
    form_name: String,
    respondent_email: String,
    respondent_name: String,
    answers: Json<Answers>,
    total_marks: f64,
    submitted_at: DateTime<Utc>,
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Self {
            id: row.id,
            form_name: row.form_name,
            respondent_email: row.respondent_email,
            respondent_name: row.respondent_name,
            answers: row.answers.0,
            total_marks: row.total_marks,
            submitted_at: row.submitted_at,
        }
    }
}

const FORM_COLUMNS: &str = "name, questions, protected, show_answers, creator_email, created_at";
const SUBMISSION_COLUMNS: &str =
    "id, form_name, respondent_email, respondent_name, answers, total_marks, submitted_at";

/// Postgres-backed store. Uniqueness and cascade rules live in the schema
/// (see `migrations/`).
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_form(&self, form: &FormDefinition) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO forms (name, questions, protected, show_answers, creator_email, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&form.name)
        .bind(Json(&form.questions))
        .bind(form.protected)
        .bind(form.show_answers)
        .bind(&form.creator_email)
        .bind(form.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let err = StoreError::from(e);
            if !matches!(err, StoreError::Duplicate) {
                tracing::error!("Failed to insert form {}: {}", form.name, err);
            }
            err
        })?;
        Ok(())
    }

    async fn get_form(&self, name: &str) -> Result<Option<FormDefinition>, StoreError> {
        let row = sqlx::query_as::<_, FormRow>(&format!(
            "SELECT {FORM_COLUMNS} FROM forms WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(FormDefinition::from))
    }

    async fn list_form_names(&self) -> Result<Vec<String>, StoreError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM forms ORDER BY created_at ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    async fn list_forms_by_creator(
        &self,
        email: &str,
    ) -> Result<Vec<FormDefinition>, StoreError> {
        let rows = sqlx::query_as::<_, FormRow>(&format!(
            "SELECT {FORM_COLUMNS} FROM forms WHERE creator_email = $1 ORDER BY created_at ASC, name ASC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(FormDefinition::from).collect())
    }

    async fn delete_form_cascade(
        &self,
        name: &str,
        creator_email: &str,
    ) -> Result<DeleteOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock: the owner cannot change until this transaction ends.
        let owner = sqlx::query_scalar::<_, String>(
            "SELECT creator_email FROM forms WHERE name = $1 FOR UPDATE",
        )
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?;

        match owner {
            None => {
                tx.rollback().await?;
                return Ok(DeleteOutcome::NotFound);
            }
            Some(owner) if owner != creator_email => {
                tx.rollback().await?;
                return Ok(DeleteOutcome::NotOwner);
            }
            Some(_) => {}
        }

        sqlx::query("DELETE FROM submissions WHERE form_name = $1")
            .bind(name)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM forms WHERE name = $1 AND creator_email = $2")
            .bind(name)
            .bind(creator_email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }

    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Submission, StoreError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            INSERT INTO submissions
            (form_name, respondent_email, respondent_name, answers, total_marks, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(&submission.form_name)
        .bind(&submission.respondent_email)
        .bind(&submission.respondent_name)
        .bind(Json(&submission.answers))
        .bind(submission.total_marks)
        .bind(submission.submitted_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn find_submission(
        &self,
        form_name: &str,
        respondent_email: &str,
    ) -> Result<Option<Submission>, StoreError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE form_name = $1 AND respondent_email = $2"
        ))
        .bind(form_name)
        .bind(respondent_email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Submission::from))
    }

    async fn list_submissions_for_form(
        &self,
        form_name: &str,
    ) -> Result<Vec<Submission>, StoreError> {
        // `id` is a sequence, so it breaks ties in arrival order.
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE form_name = $1 ORDER BY total_marks DESC, id ASC"
        ))
        .bind(form_name)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Submission::from).collect())
    }

    async fn list_submissions_for_respondent(
        &self,
        respondent_email: &str,
    ) -> Result<Vec<Submission>, StoreError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE respondent_email = $1 ORDER BY submitted_at ASC, id ASC"
        ))
        .bind(respondent_email)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Submission::from).collect())
    }

    async fn count_submissions_for_forms(&self, form_names: &[String]) -> Result<i64, StoreError> {
        if form_names.is_empty() {
            return Ok(0);
        }
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM submissions WHERE form_name = ANY($1)",
        )
        .bind(form_names)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
