use crate::errors::AppError;

pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route does not exist";

/// Fallback for every path no route matched.
pub async fn not_found() -> Result<actix_web::HttpResponse, AppError> {
    Err(AppError::NotFound(ROUTE_NOT_FOUND_MESSAGE.to_string()))
}
