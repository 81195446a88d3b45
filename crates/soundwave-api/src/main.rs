//! SoundWave analytics API server entry point.

use std::sync::Arc;

use soundwave_api::config::ServerConfig;
use soundwave_api::error::AppError;
use soundwave_api::state::AppState;
use soundwave_core::clock::SystemClock;
use soundwave_core::ids::RandomIdGenerator;
use soundwave_event_store::{MIGRATOR, PgAnalyticsStore};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting SoundWave analytics API server");

    let config = ServerConfig::from_env()?;

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    if config.run_migrations {
        MIGRATOR.run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    // Build application state.
    let store = Arc::new(PgAnalyticsStore::new(pool).with_query_timeout(config.query_timeout()));
    let app_state = AppState::new(
        store,
        Arc::new(SystemClock),
        Arc::new(RandomIdGenerator),
        config.reporting_window(),
    );

    // TODO: Replace CorsLayer::permissive() with the dashboard origins once they are fixed.
    let app = soundwave_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
