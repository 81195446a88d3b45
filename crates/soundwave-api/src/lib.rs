//! SoundWave analytics — HTTP API.
//!
//! Exposes the event recorder and the metrics aggregator over JSON. The
//! binary in `main.rs` wires a PostgreSQL store into [`app`]; tests wire an
//! in-memory one.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use crate::state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/analytics", routes::analytics::router())
        .with_state(state)
}
