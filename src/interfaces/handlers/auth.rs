use actix_web::{post, web, HttpResponse};
use tracing::instrument;

use crate::entities::user::{LoginUser, NewUser};
use crate::errors::AppError;
use crate::AppState;

#[post("/register")]
#[instrument(skip_all)]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>
) -> Result<HttpResponse, AppError> {
    let response = state.auth_handler.register(user.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/login")]
#[instrument(skip_all)]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>
) -> Result<HttpResponse, AppError> {
    let response = state.auth_handler.login(user.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
