use std::time::Duration;

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use jobs_api::{
    constants::RATE_LIMIT_IDLE_TTL_SECS,
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    limiter::rate_limiter::RateLimiterStore,
    middlewares::{
        rate_limit::RateLimit,
        security::{cors, security_headers},
    },
    routes::configure_routes,
    settings::AppConfig,
    telemetry::init_tracing,
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new();
    init_tracing(config.as_ref().is_ok_and(|cfg| cfg.is_production()));

    let config = match config {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to create database connection pool")?;

    run_migrations(&pool)
        .await
        .context("Failed to apply database migrations")?;

    let app_state = web::Data::new(AppState::new(&config, pool.clone()));

    let limiter = RateLimiterStore::new(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    );
    let eviction_task = limiter.spawn_eviction(Duration::from_secs(RATE_LIMIT_IDLE_TTL_SECS));

    let server_addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let app_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(RateLimit::new(limiter.clone(), app_config.trust_proxy))
            .wrap(cors(&app_config))
            .wrap(security_headers())
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .disable_signals()
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run();

    let handle = server.handle();

    tokio::select! {
        res = server => res.context("HTTP server error")?,
        _ = shutdown_signal() => {
            handle.stop(true).await;
        }
    }

    eviction_task.abort();
    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}
