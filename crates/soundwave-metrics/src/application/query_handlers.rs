//! Query handlers for the Metrics Aggregator.
//!
//! Every handler is a single read against the store. Results are re-sorted
//! and bounded here so that the dashboard contract holds regardless of the
//! backend's ordering.

use soundwave_core::clock::Clock;
use soundwave_core::error::AnalyticsError;
use soundwave_core::metrics::{
    DailyAmount, DailyCount, DailyMetrics, EngagementTypeCount, OverviewMetrics, PlatformCount,
    TopContent,
};
use soundwave_core::store::MetricsStore;
use tracing::debug;

use crate::domain::window::ReportingWindow;

/// Number of entries returned by [`get_top_content`] when no limit is given.
pub const DEFAULT_TOP_CONTENT_LIMIT: u32 = 10;

/// Upper bound on the top-content limit.
pub const MAX_TOP_CONTENT_LIMIT: u32 = 100;

/// Returns the dashboard headline counters.
///
/// # Errors
///
/// Returns `AnalyticsError::Store` if the query fails.
pub async fn get_overview_metrics(
    window: &ReportingWindow,
    clock: &dyn Clock,
    store: &dyn MetricsStore,
) -> Result<OverviewMetrics, AnalyticsError> {
    let active_since = window.active_since(clock.now());
    let overview = store.overview(active_since).await?;
    debug!(
        total_views = overview.total_views,
        active_users = overview.active_users,
        "computed overview metrics"
    );
    Ok(overview)
}

/// Returns views per day over the series window, oldest first. Days without
/// views are omitted.
///
/// # Errors
///
/// Returns `AnalyticsError::Store` if the query fails.
pub async fn get_daily_views(
    window: &ReportingWindow,
    clock: &dyn Clock,
    store: &dyn MetricsStore,
) -> Result<Vec<DailyCount>, AnalyticsError> {
    let now = clock.now();
    let (first, last) = window.series_dates(now);
    let mut points: Vec<DailyCount> = store
        .daily_views(window.series_range(now))
        .await?
        .into_iter()
        .filter(|p| p.date >= first && p.date <= last)
        .collect();
    points.sort_by_key(|p| p.date);
    Ok(points)
}

/// Returns transaction amount per day over the series window, oldest first.
/// Days without transactions are omitted.
///
/// # Errors
///
/// Returns `AnalyticsError::Store` if the query fails.
pub async fn get_daily_revenue(
    window: &ReportingWindow,
    clock: &dyn Clock,
    store: &dyn MetricsStore,
) -> Result<Vec<DailyAmount>, AnalyticsError> {
    let now = clock.now();
    let (first, last) = window.series_dates(now);
    let mut points: Vec<DailyAmount> = store
        .daily_revenue(window.series_range(now))
        .await?
        .into_iter()
        .filter(|p| p.date >= first && p.date <= last)
        .collect();
    points.sort_by_key(|p| p.date);
    Ok(points)
}

/// Returns the most viewed content, highest first, ties by content id.
/// `limit` defaults to [`DEFAULT_TOP_CONTENT_LIMIT`] and is capped at
/// [`MAX_TOP_CONTENT_LIMIT`].
///
/// # Errors
///
/// Returns `AnalyticsError::Store` if the query fails.
pub async fn get_top_content(
    limit: Option<u32>,
    store: &dyn MetricsStore,
) -> Result<Vec<TopContent>, AnalyticsError> {
    let limit = limit
        .unwrap_or(DEFAULT_TOP_CONTENT_LIMIT)
        .min(MAX_TOP_CONTENT_LIMIT);
    if limit == 0 {
        return Ok(vec![]);
    }

    let mut ranked: Vec<TopContent> = store
        .top_content(i64::from(limit))
        .await?
        .into_iter()
        .map(TopContent::from)
        .collect();
    ranked.sort_by(|a, b| {
        b.views
            .cmp(&a.views)
            .then_with(|| a.content_id.cmp(&b.content_id))
    });
    ranked.truncate(limit as usize);
    Ok(ranked)
}

/// Returns engagement counts per type, most frequent first.
///
/// # Errors
///
/// Returns `AnalyticsError::Store` if the query fails.
pub async fn get_engagement_by_type(
    store: &dyn MetricsStore,
) -> Result<Vec<EngagementTypeCount>, AnalyticsError> {
    let mut counts = store.engagement_by_type().await?;
    counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.event_type.cmp(&b.event_type))
    });
    Ok(counts)
}

/// Returns view counts per platform, most frequent first.
///
/// # Errors
///
/// Returns `AnalyticsError::Store` if the query fails.
pub async fn get_views_by_platform(
    store: &dyn MetricsStore,
) -> Result<Vec<PlatformCount>, AnalyticsError> {
    let mut counts = store.views_by_platform().await?;
    counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.platform.cmp(&b.platform))
    });
    Ok(counts)
}

/// Returns the stored pre-aggregated rows for the series window.
///
/// # Errors
///
/// Returns `AnalyticsError::Store` if the query fails.
pub async fn get_daily_metrics(
    window: &ReportingWindow,
    clock: &dyn Clock,
    store: &dyn MetricsStore,
) -> Result<Vec<DailyMetrics>, AnalyticsError> {
    let (first, last) = window.series_dates(clock.now());
    store.load_daily_metrics(first, last).await
}
