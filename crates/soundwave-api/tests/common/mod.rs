//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use soundwave_event_store::PgAnalyticsStore;
use soundwave_metrics::domain::window::ReportingWindow;
use soundwave_test_support::{FixedClock, InMemoryAnalyticsStore, SequenceIds};
use sqlx::PgPool;
use tower::ServiceExt;

use soundwave_api::state::AppState;

/// Fixed timestamp used across all integration tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// App state over a fresh in-memory store with deterministic clock and ids.
pub fn in_memory_state() -> AppState {
    AppState::new(
        Arc::new(InMemoryAnalyticsStore::new()),
        Arc::new(FixedClock(fixed_now())),
        Arc::new(SequenceIds::new()),
        ReportingWindow::default(),
    )
}

/// App state over a real `PgAnalyticsStore` with deterministic clock and ids.
pub fn pg_state(pool: PgPool) -> AppState {
    AppState::new(
        Arc::new(PgAnalyticsStore::new(pool)),
        Arc::new(FixedClock(fixed_now())),
        Arc::new(SequenceIds::new()),
        ReportingWindow::default(),
    )
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(state: &AppState) -> Router {
    soundwave_api::app(state.clone())
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
