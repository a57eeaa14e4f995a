use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Jobs API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/v1/auth",
            "jobs": "/api/v1/jobs",
            "health": "/api/v1/health"
        }
    }))
}
