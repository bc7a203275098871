//! Service entry point

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

use store_admin_api::api;
use store_admin_api::api::middleware::{SessionMiddleware, SessionVerifier};
use store_admin_api::config::Settings;
use store_admin_api::db::{BillboardRepository, DbPool, StoreRepository};
use store_admin_api::storage::S3BlobStore;
use store_admin_api::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("store_admin_api=info".parse().unwrap())
                .add_directive("actix_web=info".parse().unwrap()),
        )
        .json()
        .init();

    // Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    info!(
        "Starting store-admin-api v{} on {}",
        env!("CARGO_PKG_VERSION"),
        bind_addr
    );

    // Initialize the database pool
    let pool = DbPool::new(&settings.database.url, settings.database.max_connections)
        .context("Failed to create database pool")?;
    pool.test_connection()
        .await
        .context("Database connection test failed")?;

    // Initialize blob storage and session verification
    let blob = S3BlobStore::new(&settings.blob)
        .await
        .context("Failed to initialize blob storage")?;
    let verifier = SessionVerifier::new(&settings.auth);

    // Create shared application state
    let app_state = web::Data::new(AppState {
        settings: settings.clone(),
        stores: Arc::new(StoreRepository::new(pool.clone())),
        billboards: Arc::new(BillboardRepository::new(pool)),
        blob: Arc::new(blob),
    });

    let workers = settings
        .server
        .workers
        .unwrap_or_else(|| num_cpus::get() * 2);
    let max_upload = settings.uploads.max_bytes;

    // Configure and start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(web::PayloadConfig::new(max_upload))
            // Session identity extraction (handlers decide authorization)
            .wrap(SessionMiddleware::new(verifier.clone()))
            // Middleware (order matters - these wrap around SessionMiddleware)
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Service", "store-admin-api"))
                    .add(("X-Version", env!("CARGO_PKG_VERSION"))),
            )
            // Routes
            .configure(api::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
