//! Routes for the event recorder and the metrics aggregator.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use soundwave_core::command::Command;
use soundwave_core::error::AnalyticsError;
use soundwave_core::metrics::{
    DailyAmount, DailyCount, DailyMetrics, EngagementTypeCount, OverviewMetrics, PlatformCount,
    TopContent,
};
use soundwave_metrics::application::{command_handlers as metrics_commands, query_handlers};
use soundwave_recorder::application::command_handlers;
use soundwave_recorder::domain::commands::{RecordEngagement, RecordTransaction, RecordView};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body returned after a view or engagement is recorded.
#[derive(Debug, Serialize)]
pub struct RecordedResponse {
    /// Always `true`.
    pub success: bool,
    /// Id of the appended event.
    pub id: Uuid,
}

/// Response body returned after a transaction is recorded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecordedResponse {
    /// Always `true`.
    pub success: bool,
    /// Id of the appended event.
    pub id: Uuid,
    /// Client-supplied or generated transaction reference.
    pub transaction_id: String,
    /// Marketplace share of the amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub platform_fee: Decimal,
    /// Creator share of the amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub creator_revenue: Decimal,
}

/// Query string for GET /top-content.
#[derive(Debug, Default, Deserialize)]
pub struct TopContentParams {
    /// Maximum number of entries.
    pub limit: Option<String>,
}

/// Query string for POST /daily-metrics/refresh.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshParams {
    /// UTC day to refresh, `YYYY-MM-DD`. Defaults to today.
    pub date: Option<String>,
}

/// Unwraps a JSON body, turning a malformed one into a validation error.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AnalyticsError::Validation(rejection.body_text()).into())
}

/// Unwraps a query string, turning a malformed one into a validation error.
fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| AnalyticsError::Validation(rejection.body_text()).into())
}

fn parse_limit(raw: Option<&str>) -> Result<Option<u32>, AnalyticsError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|_| {
                AnalyticsError::Validation(format!("limit must be a non-negative integer, got {s}"))
            })
        })
        .transpose()
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, AnalyticsError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                AnalyticsError::Validation(format!("date must be YYYY-MM-DD, got {s}"))
            })
        })
        .transpose()
}

/// POST /content-view
#[instrument(skip(state, payload))]
async fn record_content_view(
    State(state): State<AppState>,
    payload: Result<Json<RecordView>, JsonRejection>,
) -> Result<Json<RecordedResponse>, ApiError> {
    let command = json_body(payload)?;
    info!(command_type = command.command_type(), "handling command");

    let event = command_handlers::handle_record_view(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.event_store,
    )
    .await?;

    Ok(Json(RecordedResponse {
        success: true,
        id: event.id,
    }))
}

/// POST /engagement
#[instrument(skip(state, payload))]
async fn record_engagement(
    State(state): State<AppState>,
    payload: Result<Json<RecordEngagement>, JsonRejection>,
) -> Result<Json<RecordedResponse>, ApiError> {
    let command = json_body(payload)?;
    info!(command_type = command.command_type(), "handling command");

    let event = command_handlers::handle_record_engagement(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.event_store,
    )
    .await?;

    Ok(Json(RecordedResponse {
        success: true,
        id: event.id,
    }))
}

/// POST /transaction
#[instrument(skip(state, payload))]
async fn record_transaction(
    State(state): State<AppState>,
    payload: Result<Json<RecordTransaction>, JsonRejection>,
) -> Result<Json<TransactionRecordedResponse>, ApiError> {
    let command = json_body(payload)?;
    info!(command_type = command.command_type(), "handling command");

    let event = command_handlers::handle_record_transaction(
        &command,
        state.clock.as_ref(),
        state.ids.as_ref(),
        &*state.event_store,
    )
    .await?;

    Ok(Json(TransactionRecordedResponse {
        success: true,
        id: event.id,
        transaction_id: event.transaction_id,
        platform_fee: event.platform_fee,
        creator_revenue: event.creator_revenue,
    }))
}

/// GET /overview
#[instrument(skip(state))]
async fn overview(State(state): State<AppState>) -> Result<Json<OverviewMetrics>, ApiError> {
    let metrics = query_handlers::get_overview_metrics(
        &state.window,
        state.clock.as_ref(),
        &*state.metrics_store,
    )
    .await?;
    Ok(Json(metrics))
}

/// GET /daily-views
#[instrument(skip(state))]
async fn daily_views(State(state): State<AppState>) -> Result<Json<Vec<DailyCount>>, ApiError> {
    let points = query_handlers::get_daily_views(
        &state.window,
        state.clock.as_ref(),
        &*state.metrics_store,
    )
    .await?;
    Ok(Json(points))
}

/// GET /daily-revenue
#[instrument(skip(state))]
async fn daily_revenue(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyAmount>>, ApiError> {
    let points = query_handlers::get_daily_revenue(
        &state.window,
        state.clock.as_ref(),
        &*state.metrics_store,
    )
    .await?;
    Ok(Json(points))
}

/// GET /top-content
#[instrument(skip(state, params))]
async fn top_content(
    State(state): State<AppState>,
    params: Result<Query<TopContentParams>, QueryRejection>,
) -> Result<Json<Vec<TopContent>>, ApiError> {
    let limit = parse_limit(query_params(params)?.limit.as_deref())?;
    debug!(?limit, "ranking top content");
    let ranked = query_handlers::get_top_content(limit, &*state.metrics_store).await?;
    Ok(Json(ranked))
}

/// GET /engagement-by-type
#[instrument(skip(state))]
async fn engagement_by_type(
    State(state): State<AppState>,
) -> Result<Json<Vec<EngagementTypeCount>>, ApiError> {
    let counts = query_handlers::get_engagement_by_type(&*state.metrics_store).await?;
    Ok(Json(counts))
}

/// GET /views-by-platform
#[instrument(skip(state))]
async fn views_by_platform(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlatformCount>>, ApiError> {
    let counts = query_handlers::get_views_by_platform(&*state.metrics_store).await?;
    Ok(Json(counts))
}

/// GET /daily-metrics
#[instrument(skip(state))]
async fn daily_metrics(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyMetrics>>, ApiError> {
    let rows = query_handlers::get_daily_metrics(
        &state.window,
        state.clock.as_ref(),
        &*state.metrics_store,
    )
    .await?;
    Ok(Json(rows))
}

/// POST /daily-metrics/refresh
#[instrument(skip(state, params))]
async fn refresh_daily_metrics(
    State(state): State<AppState>,
    params: Result<Query<RefreshParams>, QueryRejection>,
) -> Result<Json<DailyMetrics>, ApiError> {
    let date = parse_date(query_params(params)?.date.as_deref())?;
    info!(?date, "handling daily metrics refresh");

    let metrics = metrics_commands::handle_refresh_daily_metrics(
        date,
        state.clock.as_ref(),
        &*state.metrics_store,
    )
    .await?;
    Ok(Json(metrics))
}

/// Returns the router for the analytics endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/content-view", post(record_content_view))
        .route("/engagement", post(record_engagement))
        .route("/transaction", post(record_transaction))
        .route("/overview", get(overview))
        .route("/daily-views", get(daily_views))
        .route("/daily-revenue", get(daily_revenue))
        .route("/top-content", get(top_content))
        .route("/engagement-by-type", get(engagement_by_type))
        .route("/views-by-platform", get(views_by_platform))
        .route("/daily-metrics", get(daily_metrics))
        .route("/daily-metrics/refresh", post(refresh_daily_metrics))
}
