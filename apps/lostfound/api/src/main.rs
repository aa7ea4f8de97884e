use axum_helpers::server::{create_production_app, health_router};
use axum_helpers::{InMemoryTokenStore, JwtAuth, RedisTokenStore, TokenStore};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_items::LocalImageStore;
use migration::Migrator;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let redis = match config.redis.clone() {
        Some(redis_config) => Some(
            database::redis::connect_from_config_with_retry(redis_config, None)
                .await
                .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))?,
        ),
        None => {
            tracing::warn!("REDIS_URL not set; revoked tokens are kept in memory only");
            None
        }
    };

    let token_store: Arc<dyn TokenStore> = match &redis {
        Some(manager) => Arc::new(RedisTokenStore::new(manager.clone())),
        None => Arc::new(InMemoryTokenStore::new()),
    };
    let jwt_auth = JwtAuth::new(&config.jwt, token_store);

    tokio::fs::create_dir_all(&config.images.dir)
        .await
        .map_err(|e| eyre::eyre!("Cannot create {}: {}", config.images.dir.display(), e))?;
    let images = LocalImageStore::from_config(&config.images);
    info!(
        dir = %images.root().display(),
        max_bytes = config.images.max_bytes,
        "Image storage ready"
    );

    let state = AppState {
        config,
        db,
        redis,
        jwt_auth,
        images: Arc::new(images),
    };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // Merge health endpoints into the app
    // - /health: liveness check with app name/version
    // - /ready: readiness check with actual db/redis health checks
    let mut app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    // Photos are served from here unless they live behind an external URL
    let public_base = state.config.images.public_base_url.trim_end_matches('/');
    if public_base.starts_with('/') && public_base.len() > 1 {
        app = app.nest_service(public_base, ServeDir::new(&state.config.images.dir));
    }

    info!("Starting lost & found API with production-ready shutdown (30s timeout)");

    // State moves into the cleanup future below
    let server_config = state.config.server.clone();
    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30), // 30s graceful shutdown timeout
        async move {
            info!("Shutting down: closing database connections");

            match state.db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }

            // Redis ConnectionManager closes automatically on drop
            drop(state.redis);
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Lost & found API shutdown complete");
    Ok(())
}
