use actix_web::{error::JsonPayloadError, web};

use crate::errors::AppError;

/// Routes malformed or oversized JSON bodies through the error normalizer.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        tracing::debug!("Rejected JSON payload: {}", err);
        AppError::from(err).into()
    }));
}
