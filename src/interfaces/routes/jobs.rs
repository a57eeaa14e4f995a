use actix_web::web;

use crate::{handlers::jobs, middlewares::auth::AuthMiddleware};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/jobs")
            .wrap(AuthMiddleware)
            .service(jobs::get_all_jobs)
            .service(jobs::create_job)
            .service(jobs::get_job)
            .service(jobs::update_job)
            .service(jobs::delete_job)
    );
}
