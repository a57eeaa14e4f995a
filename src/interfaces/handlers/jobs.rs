use actix_web::{delete, get, patch, post, web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::job::{JobResponse, NewJobRequest, UpdateJobRequest},
    errors::AppError,
    use_cases::extractors::AuthUser,
    AppState,
};

#[get("")]
#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_all_jobs(
    user: AuthUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let response = state.job_handler.get_all_jobs(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{id}")]
#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_job(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let job = state.job_handler.get_job(&user.user_id, &path).await?;
    Ok(HttpResponse::Ok().json(JobResponse { job }))
}

#[post("")]
#[instrument(skip(state, body), fields(user_id = %user.user_id))]
pub async fn create_job(
    user: AuthUser,
    state: web::Data<AppState>,
    body: web::Json<NewJobRequest>,
) -> Result<HttpResponse, AppError> {
    let job = state.job_handler
        .create_job(&user.user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(job))
}

#[patch("/{id}")]
#[instrument(skip(state, body), fields(user_id = %user.user_id))]
pub async fn update_job(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateJobRequest>,
) -> Result<HttpResponse, AppError> {
    let job = state.job_handler
        .update_job(&user.user_id, &path, &body)
        .await?;
    Ok(HttpResponse::Ok().json(JobResponse { job }))
}

#[delete("/{id}")]
#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_job(
    user: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = state.job_handler.delete_job(&user.user_id, &path).await?;
    Ok(HttpResponse::Ok().json(response))
}
