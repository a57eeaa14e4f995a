use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod telemetry;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, limiter, utils};

use auth::jwt::JwtService;
use repositories::{
    job::JobRepository,
    sqlx_repo::{SqlxJobRepo, SqlxUserRepo},
    user::UserRepository,
};
use use_cases::{auth::AuthHandler, jobs::JobHandler};

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub job_handler: AppJobHandler,
}

pub type AppAuthHandler = AuthHandler<Arc<dyn UserRepository>, JwtService>;
pub type AppJobHandler = JobHandler<Arc<dyn JobRepository>>;

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        Self::with_repositories(
            config,
            Arc::new(SqlxUserRepo::new(pool.clone())),
            Arc::new(SqlxJobRepo::new(pool)),
        )
    }

    /// Builds the state over arbitrary repository implementations.
    pub fn with_repositories(
        config: &settings::AppConfig,
        user_repo: Arc<dyn UserRepository>,
        job_repo: Arc<dyn JobRepository>,
    ) -> Self {
        let jwt_service = JwtService::new(config);

        AppState {
            auth_handler: AuthHandler::new(user_repo, jwt_service),
            job_handler: JobHandler::new(job_repo),
        }
    }
}
