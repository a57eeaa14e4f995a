use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

// ───── Constants ──────────────────────────────────────────────────────
pub const MAX_COMPANY_LENGTH: u64 = 50;
pub const MAX_POSITION_LENGTH: u64 = 100;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
pub enum JobStatus {
    Interview,
    Declined,
    #[default]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job that passed validation and is ready to be stored. The owner is
/// always the authenticated caller.
#[derive(Debug, Clone, Validate)]
pub struct JobInsert {
    #[validate(custom(function = "validate_company"))]
    pub company: String,

    #[validate(custom(function = "validate_position"))]
    pub position: String,

    pub status: JobStatus,
    pub created_by: Uuid,
}

// ───── Input & Validation Requests ──────────────────────────────────

/// Body of `POST /jobs`. Unknown keys (including any `createdBy`) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobRequest {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<JobStatus>,
}

impl NewJobRequest {
    pub fn prepare_for_insert(self, created_by: Uuid) -> Result<JobInsert, ValidationErrors> {
        let insert = JobInsert {
            company: self.company.unwrap_or_default(),
            position: self.position.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            created_by,
        };

        insert.validate()?;
        Ok(insert)
    }
}

/// Body of `PATCH /jobs/{id}`; absent fields are left untouched. Present
/// fields follow the same rules as on create.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[validate(custom(function = "validate_company"))]
    pub company: Option<String>,

    #[validate(custom(function = "validate_position"))]
    pub position: Option<String>,

    pub status: Option<JobStatus>,
}

impl UpdateJobRequest {
    /// True when the request tries to blank out a required field.
    pub fn clears_required_field(&self) -> bool {
        self.company.as_deref() == Some("") || self.position.as_deref() == Some("")
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub nb_hits: usize,
}

impl From<Vec<Job>> for JobListResponse {
    fn from(jobs: Vec<Job>) -> Self {
        JobListResponse {
            nb_hits: jobs.len(),
            jobs,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobResponse {
    pub job: Job,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobDeletedResponse {
    pub msg: String,
}

// ───── Validation Helpers ───────────────────────────────────────────

pub fn validate_company(company: &str) -> Result<(), ValidationError> {
    if company.trim().is_empty() {
        return Err(new_validation_error("company_required", "Please provide a company name"));
    }
    if company.chars().count() as u64 > MAX_COMPANY_LENGTH {
        return Err(new_validation_error("company_length", "Company name cannot be more than 50 characters"));
    }
    Ok(())
}

pub fn validate_position(position: &str) -> Result<(), ValidationError> {
    if position.trim().is_empty() {
        return Err(new_validation_error("position_required", "Please provide a position"));
    }
    if position.chars().count() as u64 > MAX_POSITION_LENGTH {
        return Err(new_validation_error("position_length", "Position cannot be more than 100 characters"));
    }
    Ok(())
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}
