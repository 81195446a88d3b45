//! `PostgreSQL` implementation of the `EventStore` and `MetricsStore` traits.
//!
//! All statements use bound parameters. Every query runs under the store's
//! per-query timeout; expiry is reported as `AnalyticsError::Store`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::warn;

use soundwave_core::error::AnalyticsError;
use soundwave_core::event::{ContentViewEvent, EngagementEvent, TransactionEvent};
use soundwave_core::metrics::{
    ContentStats, DailyAmount, DailyCount, DailyMetrics, EngagementTypeCount, OverviewMetrics,
    PlatformCount, TimeRange,
};
use soundwave_core::store::{EventStore, MetricsStore};

/// Default per-query timeout.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

const INSERT_VIEW: &str = r"
INSERT INTO content_views
    (id, content_id, user_id, session_id, view_duration, platform, country, referrer, viewed_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
";

const INSERT_ENGAGEMENT: &str = r"
INSERT INTO engagement_events
    (id, user_id, event_type, content_id, metadata, occurred_at)
VALUES ($1, $2, $3, $4, $5, $6)
";

const INSERT_TRANSACTION: &str = r"
INSERT INTO transactions
    (id, transaction_id, user_id, content_id, event_id, transaction_type, amount, currency,
     platform_fee, creator_revenue, payment_method, status, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
";

const SELECT_OVERVIEW: &str = r"
SELECT
    (SELECT COUNT(*) FROM content_views),
    (SELECT COALESCE(SUM(amount), 0) FROM transactions),
    (SELECT COUNT(*) FROM engagement_events),
    (SELECT COUNT(DISTINCT user_id) FROM content_views
      WHERE user_id IS NOT NULL AND viewed_at >= $1)
";

const SELECT_DAILY_VIEWS: &str = r"
SELECT (viewed_at AT TIME ZONE 'UTC')::date AS day, COUNT(*)
FROM content_views
WHERE viewed_at >= $1 AND viewed_at <= $2
GROUP BY day
ORDER BY day
";

const SELECT_DAILY_REVENUE: &str = r"
SELECT (created_at AT TIME ZONE 'UTC')::date AS day, SUM(amount)
FROM transactions
WHERE created_at >= $1 AND created_at <= $2
GROUP BY day
ORDER BY day
";

const SELECT_TOP_CONTENT: &str = r"
WITH views AS (
    SELECT content_id, COUNT(*) AS views
    FROM content_views
    GROUP BY content_id
    ORDER BY views DESC, content_id ASC
    LIMIT $1
), revenue AS (
    SELECT content_id, SUM(amount) AS revenue
    FROM transactions
    WHERE content_id IN (SELECT content_id FROM views)
    GROUP BY content_id
), engagements AS (
    SELECT content_id, COUNT(*) AS engagements
    FROM engagement_events
    WHERE content_id IN (SELECT content_id FROM views)
    GROUP BY content_id
)
SELECT
    v.content_id,
    c.title,
    v.views,
    COALESCE(r.revenue, 0),
    COALESCE(e.engagements, 0)
FROM views v
LEFT JOIN revenue r ON r.content_id = v.content_id
LEFT JOIN engagements e ON e.content_id = v.content_id
LEFT JOIN content c ON c.id = v.content_id
ORDER BY v.views DESC, v.content_id ASC
";

const SELECT_ENGAGEMENT_BY_TYPE: &str = r"
SELECT event_type, COUNT(*) AS count
FROM engagement_events
GROUP BY event_type
ORDER BY count DESC, event_type ASC
";

const SELECT_VIEWS_BY_PLATFORM: &str = r"
SELECT platform, COUNT(*) AS count
FROM content_views
GROUP BY platform
ORDER BY count DESC, platform ASC
";

const SELECT_DAILY_SUMMARY: &str = r"
SELECT
    (SELECT COUNT(*) FROM content_views
      WHERE viewed_at >= $1 AND viewed_at < $2),
    (SELECT COUNT(DISTINCT user_id) FROM content_views
      WHERE user_id IS NOT NULL AND viewed_at >= $1 AND viewed_at < $2),
    (SELECT COUNT(*) FROM engagement_events
      WHERE occurred_at >= $1 AND occurred_at < $2),
    (SELECT COUNT(*) FROM transactions
      WHERE created_at >= $1 AND created_at < $2),
    (SELECT COALESCE(SUM(amount), 0) FROM transactions
      WHERE created_at >= $1 AND created_at < $2)
";

const UPSERT_DAILY_METRICS: &str = r"
INSERT INTO daily_metrics
    (day, total_views, unique_viewers, total_engagements, total_transactions, total_revenue,
     refreshed_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)
ON CONFLICT (day) DO UPDATE SET
    total_views = EXCLUDED.total_views,
    unique_viewers = EXCLUDED.unique_viewers,
    total_engagements = EXCLUDED.total_engagements,
    total_transactions = EXCLUDED.total_transactions,
    total_revenue = EXCLUDED.total_revenue,
    refreshed_at = EXCLUDED.refreshed_at
";

const SELECT_DAILY_METRICS: &str = r"
SELECT day, total_views, unique_viewers, total_engagements, total_transactions, total_revenue,
       refreshed_at
FROM daily_metrics
WHERE day >= $1 AND day <= $2
ORDER BY day
";

type DailyMetricsRow = (NaiveDate, i64, i64, i64, i64, Decimal, DateTime<Utc>);

/// PostgreSQL-backed analytics store.
#[derive(Debug, Clone)]
pub struct PgAnalyticsStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgAnalyticsStore {
    /// Creates a new `PgAnalyticsStore` with the default query timeout.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Replaces the per-query timeout.
    #[must_use]
    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    /// Runs `query` under the configured timeout and maps failures to
    /// `AnalyticsError::Store`.
    async fn timed<T, F>(&self, operation: &'static str, query: F) -> Result<T, AnalyticsError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(operation, error = %e, "analytics query failed");
                Err(AnalyticsError::Store(format!("{operation} failed: {e}")))
            }
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = %self.query_timeout.as_millis(),
                    "analytics query timed out"
                );
                Err(AnalyticsError::Store(format!(
                    "{operation} timed out after {} ms",
                    self.query_timeout.as_millis()
                )))
            }
        }
    }
}

/// Start and end (exclusive) of a UTC calendar day.
fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + chrono::Duration::days(1))
}

#[async_trait]
impl EventStore for PgAnalyticsStore {
    async fn append_view(&self, event: &ContentViewEvent) -> Result<(), AnalyticsError> {
        self.timed(
            "append_view",
            sqlx::query(INSERT_VIEW)
                .bind(event.id)
                .bind(&event.content_id)
                .bind(&event.user_id)
                .bind(&event.session_id)
                .bind(event.view_duration)
                .bind(&event.platform)
                .bind(&event.country)
                .bind(&event.referrer)
                .bind(event.viewed_at)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn append_engagement(&self, event: &EngagementEvent) -> Result<(), AnalyticsError> {
        self.timed(
            "append_engagement",
            sqlx::query(INSERT_ENGAGEMENT)
                .bind(event.id)
                .bind(&event.user_id)
                .bind(&event.event_type)
                .bind(&event.content_id)
                .bind(event.metadata.as_ref().map(sqlx::types::Json))
                .bind(event.occurred_at)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn append_transaction(&self, event: &TransactionEvent) -> Result<(), AnalyticsError> {
        self.timed(
            "append_transaction",
            sqlx::query(INSERT_TRANSACTION)
                .bind(event.id)
                .bind(&event.transaction_id)
                .bind(&event.user_id)
                .bind(&event.content_id)
                .bind(&event.event_id)
                .bind(&event.transaction_type)
                .bind(event.amount)
                .bind(&event.currency)
                .bind(event.platform_fee)
                .bind(event.creator_revenue)
                .bind(&event.payment_method)
                .bind(&event.status)
                .bind(event.created_at)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl MetricsStore for PgAnalyticsStore {
    async fn overview(
        &self,
        active_since: DateTime<Utc>,
    ) -> Result<OverviewMetrics, AnalyticsError> {
        let (total_views, total_revenue, total_engagements, active_users) = self
            .timed(
                "overview",
                sqlx::query_as::<_, (i64, Decimal, i64, i64)>(SELECT_OVERVIEW)
                    .bind(active_since)
                    .fetch_one(&self.pool),
            )
            .await?;

        Ok(OverviewMetrics {
            total_views,
            total_revenue,
            total_engagements,
            active_users,
        })
    }

    async fn daily_views(&self, range: TimeRange) -> Result<Vec<DailyCount>, AnalyticsError> {
        let rows = self
            .timed(
                "daily_views",
                sqlx::query_as::<_, (NaiveDate, i64)>(SELECT_DAILY_VIEWS)
                    .bind(range.from)
                    .bind(range.to)
                    .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|(date, value)| DailyCount { date, value })
            .collect())
    }

    async fn daily_revenue(&self, range: TimeRange) -> Result<Vec<DailyAmount>, AnalyticsError> {
        let rows = self
            .timed(
                "daily_revenue",
                sqlx::query_as::<_, (NaiveDate, Decimal)>(SELECT_DAILY_REVENUE)
                    .bind(range.from)
                    .bind(range.to)
                    .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|(date, value)| DailyAmount { date, value })
            .collect())
    }

    async fn top_content(&self, limit: i64) -> Result<Vec<ContentStats>, AnalyticsError> {
        let rows = self
            .timed(
                "top_content",
                sqlx::query_as::<_, (String, Option<String>, i64, Decimal, i64)>(
                    SELECT_TOP_CONTENT,
                )
                .bind(limit)
                .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(content_id, title, views, revenue, engagements)| ContentStats {
                    content_id,
                    title,
                    views,
                    revenue,
                    engagements,
                },
            )
            .collect())
    }

    async fn engagement_by_type(&self) -> Result<Vec<EngagementTypeCount>, AnalyticsError> {
        let rows = self
            .timed(
                "engagement_by_type",
                sqlx::query_as::<_, (String, i64)>(SELECT_ENGAGEMENT_BY_TYPE)
                    .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|(event_type, count)| EngagementTypeCount { event_type, count })
            .collect())
    }

    async fn views_by_platform(&self) -> Result<Vec<PlatformCount>, AnalyticsError> {
        let rows = self
            .timed(
                "views_by_platform",
                sqlx::query_as::<_, (String, i64)>(SELECT_VIEWS_BY_PLATFORM)
                    .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|(platform, count)| PlatformCount { platform, count })
            .collect())
    }

    async fn daily_summary(
        &self,
        date: NaiveDate,
        computed_at: DateTime<Utc>,
    ) -> Result<DailyMetrics, AnalyticsError> {
        let (start, end) = day_bounds(date);
        let (total_views, unique_viewers, total_engagements, total_transactions, total_revenue) =
            self.timed(
                "daily_summary",
                sqlx::query_as::<_, (i64, i64, i64, i64, Decimal)>(SELECT_DAILY_SUMMARY)
                    .bind(start)
                    .bind(end)
                    .fetch_one(&self.pool),
            )
            .await?;

        Ok(DailyMetrics {
            date,
            total_views,
            unique_viewers,
            total_engagements,
            total_transactions,
            total_revenue,
            refreshed_at: computed_at,
        })
    }

    async fn save_daily_metrics(&self, metrics: &DailyMetrics) -> Result<(), AnalyticsError> {
        self.timed(
            "save_daily_metrics",
            sqlx::query(UPSERT_DAILY_METRICS)
                .bind(metrics.date)
                .bind(metrics.total_views)
                .bind(metrics.unique_viewers)
                .bind(metrics.total_engagements)
                .bind(metrics.total_transactions)
                .bind(metrics.total_revenue)
                .bind(metrics.refreshed_at)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn load_daily_metrics(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyMetrics>, AnalyticsError> {
        let rows = self
            .timed(
                "load_daily_metrics",
                sqlx::query_as::<_, DailyMetricsRow>(SELECT_DAILY_METRICS)
                    .bind(from)
                    .bind(to)
                    .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(
                    date,
                    total_views,
                    unique_viewers,
                    total_engagements,
                    total_transactions,
                    total_revenue,
                    refreshed_at,
                )| DailyMetrics {
                    date,
                    total_views,
                    unique_viewers,
                    total_engagements,
                    total_transactions,
                    total_revenue,
                    refreshed_at,
                },
            )
            .collect())
    }
}
