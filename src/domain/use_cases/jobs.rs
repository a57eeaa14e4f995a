use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::job::{Job, JobDeletedResponse, JobListResponse, NewJobRequest, UpdateJobRequest},
    errors::AppError,
    repositories::job::JobRepository,
    utils::valid_uuid::valid_uuid,
};

/// Job operations for an authenticated caller. Every call is scoped to
/// `owner`; a job belonging to another user behaves as if it did not exist.
pub struct JobHandler<R>
where
    R: JobRepository,
{
    pub job_repo: R,
}

impl<R> JobHandler<R>
where
    R: JobRepository,
{
    pub fn new(job_repo: R) -> Self {
        JobHandler { job_repo }
    }

    /// Lists the caller's jobs, oldest first
    pub async fn get_all_jobs(&self, owner: &Uuid) -> Result<JobListResponse, AppError> {
        let jobs = self.job_repo.find_jobs_by_owner(owner).await?;
        Ok(JobListResponse::from(jobs))
    }

    pub async fn get_job(&self, owner: &Uuid, job_id: &str) -> Result<Job, AppError> {
        let id = valid_uuid(job_id)?;

        self.job_repo
            .find_job(&id, owner)
            .await?
            .ok_or_else(|| job_not_found(job_id))
    }

    /// Creates a job owned by `owner`, whatever the body says
    pub async fn create_job(&self, owner: &Uuid, request: NewJobRequest) -> Result<Job, AppError> {
        let insert = request.prepare_for_insert(*owner)?;

        let job = self.job_repo.create_job(&insert).await?;
        tracing::info!(job_id = %job.id, "Job created");

        Ok(job)
    }

    pub async fn update_job(
        &self,
        owner: &Uuid,
        job_id: &str,
        changes: &UpdateJobRequest,
    ) -> Result<Job, AppError> {
        // Checked before anything else, including the id format
        if changes.clears_required_field() {
            return Err(AppError::BadRequest("Company or position cannot be empty".to_string()));
        }

        let id = valid_uuid(job_id)?;
        changes.validate()?;

        self.job_repo
            .update_job(&id, owner, changes)
            .await?
            .ok_or_else(|| job_not_found(job_id))
    }

    pub async fn delete_job(&self, owner: &Uuid, job_id: &str) -> Result<JobDeletedResponse, AppError> {
        let id = valid_uuid(job_id)?;

        if !self.job_repo.delete_job(&id, owner).await? {
            return Err(job_not_found(job_id));
        }

        tracing::info!(job_id = %id, "Job deleted");
        Ok(JobDeletedResponse {
            msg: format!("Job with id {} was deleted", job_id),
        })
    }
}

fn job_not_found(job_id: &str) -> AppError {
    AppError::NotFound(format!("No job with id {}", job_id))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;

    use super::*;
    use crate::{
        entities::job::{JobInsert, JobStatus},
        errors::normalize,
        repositories::job::MockJobRepository,
    };

    fn job_for(owner: Uuid, company: &str) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            company: company.to_string(),
            position: "Engineer".to_string(),
            status: JobStatus::Pending,
            created_by: owner,
            created_at: now,
            updated_at: now,
        }
    }

    fn from_insert(insert: &JobInsert) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            company: insert.company.clone(),
            position: insert.position.clone(),
            status: insert.status,
            created_by: insert.created_by,
            created_at: now,
            updated_at: now,
        }
    }

    #[actix_rt::test]
    async fn list_reports_hit_count() {
        let owner = Uuid::new_v4();
        let mut first = job_for(owner, "Acme");
        first.created_at = Utc::now() - Duration::minutes(5);
        let jobs = vec![first, job_for(owner, "Globex")];

        let mut repo = MockJobRepository::new();
        repo.expect_find_jobs_by_owner()
            .with(eq(owner))
            .times(1)
            .returning(move |_| Ok(jobs.clone()));

        let response = JobHandler::new(repo).get_all_jobs(&owner).await.unwrap();

        assert_eq!(response.nb_hits, 2);
        assert_eq!(response.jobs[0].company, "Acme");
    }

    #[actix_rt::test]
    async fn get_of_foreign_job_is_not_found() {
        let owner = Uuid::new_v4();
        let job_id = Uuid::new_v4();

        let mut repo = MockJobRepository::new();
        repo.expect_find_job()
            .with(eq(job_id), eq(owner))
            .times(1)
            .returning(|_, _| Ok(None));

        let err = JobHandler::new(repo)
            .get_job(&owner, &job_id.to_string())
            .await
            .unwrap_err();

        let body = normalize(&err);
        assert_eq!(body.status_code, 404);
        assert!(body.msg.contains(&job_id.to_string()));
    }

    #[actix_rt::test]
    async fn malformed_id_never_reaches_the_repository() {
        let repo = MockJobRepository::new();

        let err = JobHandler::new(repo)
            .get_job(&Uuid::new_v4(), "12345")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidId(ref v) if v == "12345"));
        assert_eq!(normalize(&err).status_code, 404);
    }

    #[actix_rt::test]
    async fn create_forces_the_caller_as_owner() {
        let owner = Uuid::new_v4();

        let mut repo = MockJobRepository::new();
        repo.expect_create_job()
            .withf(move |insert: &JobInsert| insert.created_by == owner)
            .times(1)
            .returning(|insert| Ok(from_insert(insert)));

        let request = NewJobRequest {
            company: Some("Acme".into()),
            position: Some("Engineer".into()),
            status: None,
        };

        let job = JobHandler::new(repo).create_job(&owner, request).await.unwrap();

        assert_eq!(job.created_by, owner);
        assert_eq!(job.status, JobStatus::Pending);
    }

    #[actix_rt::test]
    async fn create_with_missing_fields_fails_validation() {
        let repo = MockJobRepository::new();

        let err = JobHandler::new(repo)
            .create_job(&Uuid::new_v4(), NewJobRequest::default())
            .await
            .unwrap_err();

        let body = normalize(&err);
        assert_eq!(body.status_code, 400);
        assert_eq!(body.msg, "Please provide a company name, Please provide a position");
    }

    #[actix_rt::test]
    async fn update_rejects_empty_fields_before_persistence() {
        // No expectations: any repository call would panic
        let handler = JobHandler::new(MockJobRepository::new());
        let owner = Uuid::new_v4();

        for changes in [
            UpdateJobRequest { company: Some(String::new()), ..Default::default() },
            UpdateJobRequest { position: Some(String::new()), ..Default::default() },
        ] {
            let err = handler
                .update_job(&owner, "does-not-exist", &changes)
                .await
                .unwrap_err();

            assert!(matches!(err, AppError::BadRequest(_)));
            assert_eq!(normalize(&err).status_code, 400);
        }
    }

    #[actix_rt::test]
    async fn update_of_foreign_job_is_not_found() {
        let owner = Uuid::new_v4();
        let job_id = Uuid::new_v4();

        let mut repo = MockJobRepository::new();
        repo.expect_update_job()
            .with(eq(job_id), eq(owner), mockall::predicate::always())
            .times(1)
            .returning(|_, _, _| Ok(None));

        let changes = UpdateJobRequest {
            status: Some(JobStatus::Interview),
            ..Default::default()
        };

        let err = JobHandler::new(repo)
            .update_job(&owner, &job_id.to_string(), &changes)
            .await
            .unwrap_err();

        assert_eq!(normalize(&err).status_code, 404);
    }

    #[actix_rt::test]
    async fn update_returns_the_stored_record() {
        let owner = Uuid::new_v4();
        let mut updated = job_for(owner, "Acme");
        updated.status = JobStatus::Interview;
        let job_id = updated.id;

        let mut repo = MockJobRepository::new();
        repo.expect_update_job()
            .times(1)
            .returning(move |_, _, _| Ok(Some(updated.clone())));

        let changes = UpdateJobRequest {
            status: Some(JobStatus::Interview),
            ..Default::default()
        };

        let job = JobHandler::new(repo)
            .update_job(&owner, &job_id.to_string(), &changes)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Interview);
    }

    #[actix_rt::test]
    async fn delete_reports_missing_jobs() {
        let owner = Uuid::new_v4();
        let job_id = Uuid::new_v4();

        let mut repo = MockJobRepository::new();
        repo.expect_delete_job()
            .with(eq(job_id), eq(owner))
            .times(1)
            .returning(|_, _| Ok(false));

        let err = JobHandler::new(repo)
            .delete_job(&owner, &job_id.to_string())
            .await
            .unwrap_err();

        assert_eq!(normalize(&err).msg, format!("No job with id {}", job_id));
    }

    #[actix_rt::test]
    async fn delete_confirms_removal() {
        let owner = Uuid::new_v4();
        let job_id = Uuid::new_v4();

        let mut repo = MockJobRepository::new();
        repo.expect_delete_job().times(1).returning(|_, _| Ok(true));

        let response = JobHandler::new(repo)
            .delete_job(&owner, &job_id.to_string())
            .await
            .unwrap();

        assert_eq!(response.msg, format!("Job with id {} was deleted", job_id));
    }

    #[actix_rt::test]
    async fn persistence_errors_propagate_unchanged() {
        let mut repo = MockJobRepository::new();
        repo.expect_find_jobs_by_owner()
            .returning(|_| Err(AppError::Internal("pool timed out".into())));

        let err = JobHandler::new(repo)
            .get_all_jobs(&Uuid::new_v4())
            .await
            .unwrap_err();

        assert_eq!(normalize(&err).status_code, 500);
    }
}
