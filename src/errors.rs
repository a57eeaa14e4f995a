use std::fmt;

use actix_web::{
    error::{JsonPayloadError, ResponseError},
    http::{header, header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::Display;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, try again later";
pub const TOO_MANY_REQUESTS_MESSAGE: &str = "Too many requests from this IP, please try again later";

/// SQLSTATE raised by PostgreSQL for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Every failure a request can end in. Status codes are decided in exactly one
/// place, [`normalize`].
#[derive(Debug)]
pub enum AppError {
    Validation(Vec<FieldError>),
    Conflict { field: String },
    InvalidId(String),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    TooManyRequests { retry_after: u64 },
    Internal(String),
}

/// The uniform `{statusCode, msg}` JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub msg: String,
}

/// Maps an [`AppError`] to the status code and message sent to the client.
///
/// Internal details never leave the process: `Internal` always collapses to
/// the generic message.
pub fn normalize(err: &AppError) -> ErrorBody {
    let (status, msg) = match err {
        AppError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        AppError::Conflict { field } => (
            StatusCode::BAD_REQUEST,
            format!("Duplicate value entered for {field} field, please choose another value"),
        ),
        AppError::InvalidId(value) => (StatusCode::NOT_FOUND, format!("No item found with {value}")),
        AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        AppError::TooManyRequests { .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            TOO_MANY_REQUESTS_MESSAGE.to_string(),
        ),
        AppError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            GENERIC_ERROR_MESSAGE.to_string(),
        ),
    };

    ErrorBody {
        status_code: status.as_u16(),
        msg,
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(errors) => {
                let messages = errors
                    .iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::Conflict { field } => write!(f, "Conflict on field: {}", field),
            AppError::InvalidId(value) => write!(f, "Invalid identifier: {}", value),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::TooManyRequests { retry_after } => {
                write!(f, "Too many requests, retry after {}s", retry_after)
            }
            AppError::Internal(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!(error = %detail, "Unhandled error while processing request");
        }

        let body = normalize(self);
        let mut response = HttpResponse::build(self.status_code());

        if let AppError::TooManyRequests { retry_after } = self {
            response.insert_header((header::RETRY_AFTER, retry_after.to_string()));
        }

        response.insert_header(ContentType::json()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(normalize(self).status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field)),
                })
            })
            .collect();

        // HashMap iteration order is arbitrary
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                let field = db_err
                    .constraint()
                    .map(constraint_field)
                    .unwrap_or_else(|| "value".to_string());
                AppError::Conflict { field }
            }
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<JsonPayloadError> for AppError {
    fn from(err: JsonPayloadError) -> Self {
        AppError::BadRequest(format!("Invalid JSON payload: {}", err))
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenCreation => AppError::Internal(err.to_string()),
            _ => AppError::Unauthorized(err.to_string()),
        }
    }
}

/// Column name encoded in a PostgreSQL unique constraint name,
/// e.g. `users_email_key` -> `email`.
pub fn constraint_field(constraint: &str) -> String {
    let trimmed = constraint.strip_suffix("_key").unwrap_or(constraint);
    match trimmed.split_once('_') {
        Some((_table, column)) if !column.is_empty() => column.to_string(),
        _ => trimmed.to_string(),
    }
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum AuthError {
    #[display("Authentication invalid")]
    MissingCredentials,

    #[display("Authentication invalid")]
    InvalidToken,

    #[display("Token expired")]
    TokenExpired,

    #[display("Invalid credentials")]
    WrongCredentials,

    #[display("Token creation error")]
    TokenCreation,
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
