use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use structura::config::Config;
use structura::modules::stats::controllers::stats_controller;
use structura::modules::stats::services::{StatsCache, StatsEngine, StatsService};
use structura::modules::structures::repositories::MySqlStructureRepository;
use structura::modules::transactions::repositories::MySqlTransactionRepository;
use structura::modules::users::repositories::MySqlUserRepository;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "structura=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting Structura Back Office");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    // Wire the reporting core: accessors -> engine -> cache -> facade.
    // The cache is created once here and shared process-wide.
    let transactions = Arc::new(MySqlTransactionRepository::new(db_pool.clone()));
    let structures = Arc::new(MySqlStructureRepository::new(db_pool.clone()));
    let users = Arc::new(MySqlUserRepository::new(db_pool.clone()));

    let engine = StatsEngine::new(transactions, structures, users);
    let cache = Arc::new(StatsCache::new());
    let stats_service = web::Data::new(StatsService::new(engine, cache));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let server = HttpServer::new(move || {
        App::new()
            .app_data(stats_service.clone())
            .configure(stats_controller::configure)
            .route("/health", web::get().to(health_check))
            .route("/", web::get().to(index))
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "structura"
    }))
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "Structura Back Office",
        "version": "0.1.0",
        "status": "running"
    }))
}
