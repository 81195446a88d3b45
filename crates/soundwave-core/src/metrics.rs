//! Read-side views produced by the metrics aggregator.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closed time range `[from, to]` used to bound time-series queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Inclusive lower bound.
    pub from: DateTime<Utc>,
    /// Inclusive upper bound.
    pub to: DateTime<Utc>,
}

impl TimeRange {
    /// Returns `true` if `at` falls inside the range.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.from && at <= self.to
    }
}

/// Headline counters for the analytics dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewMetrics {
    /// Every content view ever recorded.
    pub total_views: i64,
    /// Sum of all transaction amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    /// Every engagement ever recorded.
    pub total_engagements: i64,
    /// Distinct signed-in viewers inside the active-user window.
    pub active_users: i64,
}

/// One day of a count series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    /// UTC calendar day.
    pub date: NaiveDate,
    /// Number of events on that day.
    pub value: i64,
}

/// One day of a money series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAmount {
    /// UTC calendar day.
    pub date: NaiveDate,
    /// Summed amount on that day.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

/// Per-content totals as read from the store. The title is absent when the
/// content catalog has no entry for the id.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentStats {
    /// The content identifier.
    pub content_id: String,
    /// Catalog title, if one exists.
    pub title: Option<String>,
    /// Number of recorded views.
    pub views: i64,
    /// Sum of transaction amounts referencing the content.
    pub revenue: Decimal,
    /// Number of engagements referencing the content.
    pub engagements: i64,
}

/// A ranked entry in the top-content list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopContent {
    /// The content identifier.
    pub content_id: String,
    /// Catalog title, or the content id when the catalog has none.
    pub title: String,
    /// Number of recorded views.
    pub views: i64,
    /// Sum of transaction amounts referencing the content.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// Number of engagements referencing the content.
    pub engagements: i64,
}

impl From<ContentStats> for TopContent {
    fn from(stats: ContentStats) -> Self {
        let title = stats
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| stats.content_id.clone());
        Self {
            content_id: stats.content_id,
            title,
            views: stats.views,
            revenue: stats.revenue,
            engagements: stats.engagements,
        }
    }
}

/// Number of engagements of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementTypeCount {
    /// The engagement tag.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Number of engagements with that tag.
    pub count: i64,
}

/// Number of views from one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCount {
    /// The platform tag.
    pub platform: String,
    /// Number of views from that platform.
    pub count: i64,
}

/// Pre-aggregated totals for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    /// UTC calendar day.
    pub date: NaiveDate,
    /// Views recorded that day.
    pub total_views: i64,
    /// Distinct signed-in viewers that day.
    pub unique_viewers: i64,
    /// Engagements recorded that day.
    pub total_engagements: i64,
    /// Transactions recorded that day.
    pub total_transactions: i64,
    /// Sum of transaction amounts that day.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    /// When the row was last recomputed.
    pub refreshed_at: DateTime<Utc>,
}
