use actix_web::web;

use crate::handlers::{home::home, not_found::not_found};

mod auth;
mod jobs;
mod json_error;
mod system;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.service(home);

    cfg.service(
        web::scope("/api/v1")
            .configure(system::config_routes)
            .configure(auth::config_routes)
            .configure(jobs::config_routes)
    );

    cfg.default_service(web::to(not_found));
}
