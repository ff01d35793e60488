//! # Posts API
//!
//! HTTP entry point for blog post CRUD. Routing and response formatting live
//! here; all storage decisions belong to the repository in `posts-infra`.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Posts API on {}:{} ({:?})",
        config.host,
        config.port,
        config.store
    );

    // One repository (and table client) shared by every worker
    let state = AppState::new(&config.store).await;

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::cors::cors_headers())
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
