use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::job::{Job, JobInsert, UpdateJobRequest},
    errors::AppError,
    repositories::sqlx_repo::SqlxJobRepo,
};

/// Owner-scoped access to job records.
///
/// Every lookup by id also takes the owner id; a job that exists but belongs
/// to someone else is reported exactly like a missing one (`None` / `false`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// All jobs owned by `owner`, oldest first.
    async fn find_jobs_by_owner(&self, owner: &Uuid) -> Result<Vec<Job>, AppError>;
    async fn find_job(&self, id: &Uuid, owner: &Uuid) -> Result<Option<Job>, AppError>;
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError>;
    /// Applies the present fields and returns the updated record.
    async fn update_job(&self, id: &Uuid, owner: &Uuid, changes: &UpdateJobRequest) -> Result<Option<Job>, AppError>;
    /// Returns whether a record was removed.
    async fn delete_job(&self, id: &Uuid, owner: &Uuid) -> Result<bool, AppError>;
}

#[async_trait]
impl<T> JobRepository for Arc<T>
where
    T: JobRepository + ?Sized,
{
    async fn find_jobs_by_owner(&self, owner: &Uuid) -> Result<Vec<Job>, AppError> {
        (**self).find_jobs_by_owner(owner).await
    }

    async fn find_job(&self, id: &Uuid, owner: &Uuid) -> Result<Option<Job>, AppError> {
        (**self).find_job(id, owner).await
    }

    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError> {
        (**self).create_job(job).await
    }

    async fn update_job(&self, id: &Uuid, owner: &Uuid, changes: &UpdateJobRequest) -> Result<Option<Job>, AppError> {
        (**self).update_job(id, owner, changes).await
    }

    async fn delete_job(&self, id: &Uuid, owner: &Uuid) -> Result<bool, AppError> {
        (**self).delete_job(id, owner).await
    }
}

impl SqlxJobRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxJobRepo { pool }
    }
}

#[async_trait]
impl JobRepository for SqlxJobRepo {
    async fn find_jobs_by_owner(&self, owner: &Uuid) -> Result<Vec<Job>, AppError> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, company, position, status, created_by, created_at, updated_at
            FROM jobs
            WHERE created_by = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    async fn find_job(&self, id: &Uuid, owner: &Uuid) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, company, position, status, created_by, created_at, updated_at
            FROM jobs
            WHERE id = $1 AND created_by = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError> {
        let created = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (company, position, status, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company, position, status, created_by, created_at, updated_at
            "#,
        )
        .bind(&job.company)
        .bind(&job.position)
        .bind(job.status)
        .bind(job.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_job(&self, id: &Uuid, owner: &Uuid, changes: &UpdateJobRequest) -> Result<Option<Job>, AppError> {
        // COALESCE keeps the stored value for fields absent from the request
        let updated = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET
                company = COALESCE($1, company),
                position = COALESCE($2, position),
                status = COALESCE($3, status),
                updated_at = NOW()
            WHERE id = $4 AND created_by = $5
            RETURNING id, company, position, status, created_by, created_at, updated_at
            "#,
        )
        .bind(changes.company.as_deref())
        .bind(changes.position.as_deref())
        .bind(changes.status)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_job(&self, id: &Uuid, owner: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
