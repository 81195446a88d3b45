//! Store abstractions for the analytics pipeline.
//!
//! The write side and the read side are separate traits so the recorder and
//! the aggregator can each be tested against exactly the capability they use.
//! Backends usually implement both.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::AnalyticsError;
use crate::event::{ContentViewEvent, EngagementEvent, TransactionEvent};
use crate::metrics::{
    ContentStats, DailyAmount, DailyCount, DailyMetrics, EngagementTypeCount, OverviewMetrics,
    PlatformCount, TimeRange,
};

/// Append-only event store. Each call writes exactly one row.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append a content view.
    async fn append_view(&self, event: &ContentViewEvent) -> Result<(), AnalyticsError>;

    /// Append an engagement.
    async fn append_engagement(&self, event: &EngagementEvent) -> Result<(), AnalyticsError>;

    /// Append a transaction.
    async fn append_transaction(&self, event: &TransactionEvent) -> Result<(), AnalyticsError>;
}

/// Read-only aggregate queries over the event store, plus the
/// `daily_metrics` denormalization.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Totals across all events; active users counted from `active_since`.
    async fn overview(
        &self,
        active_since: DateTime<Utc>,
    ) -> Result<OverviewMetrics, AnalyticsError>;

    /// Views per UTC day within `range`, ascending by date.
    async fn daily_views(&self, range: TimeRange) -> Result<Vec<DailyCount>, AnalyticsError>;

    /// Transaction amount per UTC day within `range`, ascending by date.
    async fn daily_revenue(&self, range: TimeRange) -> Result<Vec<DailyAmount>, AnalyticsError>;

    /// Per-content totals for the `limit` most viewed content ids, ordered by
    /// views descending then content id ascending.
    async fn top_content(&self, limit: i64) -> Result<Vec<ContentStats>, AnalyticsError>;

    /// Engagement counts grouped by type.
    async fn engagement_by_type(&self) -> Result<Vec<EngagementTypeCount>, AnalyticsError>;

    /// View counts grouped by platform.
    async fn views_by_platform(&self) -> Result<Vec<PlatformCount>, AnalyticsError>;

    /// Compute totals for a single UTC day from the raw events, stamped with
    /// `computed_at`.
    async fn daily_summary(
        &self,
        date: NaiveDate,
        computed_at: DateTime<Utc>,
    ) -> Result<DailyMetrics, AnalyticsError>;

    /// Insert or replace the pre-aggregated row for `metrics.date`.
    async fn save_daily_metrics(&self, metrics: &DailyMetrics) -> Result<(), AnalyticsError>;

    /// Stored pre-aggregated rows with `from <= date <= to`, ascending.
    async fn load_daily_metrics(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyMetrics>, AnalyticsError>;
}
