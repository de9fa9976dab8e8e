//! Job Repository — thin persistence contract over the `jobs` table.
//!
//! No business logic and no input-shape validation here; that is the
//! pipeline's job. Held in `AppState` as `Arc<dyn JobRepository>` so the
//! pipeline can be exercised against an in-memory implementation in tests.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobRow, NewJob};

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: NewJob) -> Result<JobRow, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<JobRow>, AppError>;

    /// Newest-first page of all jobs.
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<JobRow>, AppError>;

    /// Newest-first jobs for one submitter.
    async fn list_by_submitter(&self, submitter_email: &str) -> Result<Vec<JobRow>, AppError>;

    /// Returns whether a matching row existed and was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Update primitive kept at the repository level. No workflow calls it;
    /// job rows are immutable after creation apart from deletion.
    async fn update_improved_text(&self, id: Uuid, improved_text: &str)
        -> Result<bool, AppError>;
}

/// PostgreSQL-backed repository.
#[derive(Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn create(&self, job: NewJob) -> Result<JobRow, AppError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (id, submitter_email, original_text, improved_text, source_label,
                 analysis, file_name, stored_name, content_type, file_size, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job.submitter_email)
        .bind(&job.original_text)
        .bind(&job.improved_text)
        .bind(&job.source_label)
        .bind(&job.analysis)
        .bind(&job.file_name)
        .bind(&job.stored_name)
        .bind(&job.content_type)
        .bind(job.file_size)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<JobRow>, AppError> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<JobRow>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs ORDER BY created_at DESC OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_submitter(&self, submitter_email: &str) -> Result<Vec<JobRow>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE submitter_email = $1 ORDER BY created_at DESC",
        )
        .bind(submitter_email)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_improved_text(
        &self,
        id: Uuid,
        improved_text: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE jobs SET improved_text = $1 WHERE id = $2")
            .bind(improved_text)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
