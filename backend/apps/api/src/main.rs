//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;

use auth::{AuthMiddlewareState, Identity, JwtIdentityVerifier};
use platform::clock::SystemClock;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use strategy::domain::repository::{DailyRecordRepository, FavoritesRepository, StrategyCatalog};
use strategy::{MemoryStrategyStore, PgStrategyRepository, StrategyAppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oblique_api=info,auth=info,strategy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    let verifier = JwtIdentityVerifier::new(config.auth_config()?)?;
    if cfg!(debug_assertions) && config.jwt_secret.is_none() {
        match verifier.issue(&Identity::new("dev-user")) {
            Ok(token) => tracing::info!(token = %token, "Development token for dev-user"),
            Err(e) => tracing::warn!(error = %e, "Could not mint development token"),
        }
    }
    let auth_state = AuthMiddlewareState::new(verifier);

    match config.database_url.clone() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let repo = PgStrategyRepository::new(pool);

            // Seeding errors should not prevent server startup
            if config.seed_strategies {
                seed_catalog(&repo, &config).await;
            }

            serve(&config, repo, auth_state).await
        }
        None => {
            tracing::warn!(
                path = %config.strategies_file.display(),
                "DATABASE_URL not set, serving catalog from file; favorites and daily records are kept in memory"
            );
            let store = MemoryStrategyStore::from_json_file(&config.strategies_file).await?;
            serve(&config, store, auth_state).await
        }
    }
}

async fn seed_catalog(repo: &PgStrategyRepository, config: &ApiConfig) {
    let catalog = match MemoryStrategyStore::from_json_file(&config.strategies_file).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(error = %e, "Strategy seed file unusable, continuing anyway");
            return;
        }
    };

    match repo.seed_if_empty(&catalog.strategies()).await {
        Ok(Some(count)) => tracing::info!(count, "Strategy catalog seeded"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Strategy catalog seeding failed, continuing anyway"),
    }
}

async fn serve<R>(
    config: &ApiConfig,
    repo: R,
    auth_state: AuthMiddlewareState<JwtIdentityVerifier>,
) -> anyhow::Result<()>
where
    R: StrategyCatalog
        + FavoritesRepository
        + DailyRecordRepository
        + Clone
        + Send
        + Sync
        + 'static,
{
    let strategy_state = StrategyAppState::new(repo, Arc::new(SystemClock));
    let app = app::build_router(strategy_state, auth_state, &config.client_origins);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
