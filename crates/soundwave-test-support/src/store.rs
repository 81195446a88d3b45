//! Test stores — in-memory `EventStore`/`MetricsStore` implementations.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use soundwave_core::error::AnalyticsError;
use soundwave_core::event::{ContentViewEvent, EngagementEvent, TransactionEvent};
use soundwave_core::metrics::{
    ContentStats, DailyAmount, DailyCount, DailyMetrics, EngagementTypeCount, OverviewMetrics,
    PlatformCount, TimeRange,
};
use soundwave_core::store::{EventStore, MetricsStore};

#[derive(Debug, Default)]
struct Tables {
    views: Vec<ContentViewEvent>,
    engagements: Vec<EngagementEvent>,
    transactions: Vec<TransactionEvent>,
    titles: HashMap<String, String>,
    daily_metrics: BTreeMap<NaiveDate, DailyMetrics>,
}

/// An event store that keeps every appended row in memory and answers the
/// aggregate queries by scanning them. Mirrors the ordering rules of the
/// PostgreSQL backend.
#[derive(Debug, Default)]
pub struct InMemoryAnalyticsStore {
    tables: Mutex<Tables>,
}

impl InMemoryAnalyticsStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog title for `content_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_title(self, content_id: &str, title: &str) -> Self {
        self.tables
            .lock()
            .unwrap()
            .titles
            .insert(content_id.to_owned(), title.to_owned());
        self
    }

    /// Returns a snapshot of all appended views.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn views(&self) -> Vec<ContentViewEvent> {
        self.tables.lock().unwrap().views.clone()
    }

    /// Returns a snapshot of all appended engagements.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn engagements(&self) -> Vec<EngagementEvent> {
        self.tables.lock().unwrap().engagements.clone()
    }

    /// Returns a snapshot of all appended transactions.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn transactions(&self) -> Vec<TransactionEvent> {
        self.tables.lock().unwrap().transactions.clone()
    }
}

fn sorted_counts(counts: HashMap<String, i64>) -> Vec<(String, i64)> {
    let mut rows: Vec<(String, i64)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

#[async_trait]
impl EventStore for InMemoryAnalyticsStore {
    async fn append_view(&self, event: &ContentViewEvent) -> Result<(), AnalyticsError> {
        self.tables.lock().unwrap().views.push(event.clone());
        Ok(())
    }

    async fn append_engagement(&self, event: &EngagementEvent) -> Result<(), AnalyticsError> {
        self.tables.lock().unwrap().engagements.push(event.clone());
        Ok(())
    }

    async fn append_transaction(&self, event: &TransactionEvent) -> Result<(), AnalyticsError> {
        self.tables.lock().unwrap().transactions.push(event.clone());
        Ok(())
    }
}

#[async_trait]
impl MetricsStore for InMemoryAnalyticsStore {
    async fn overview(
        &self,
        active_since: DateTime<Utc>,
    ) -> Result<OverviewMetrics, AnalyticsError> {
        let tables = self.tables.lock().unwrap();
        let active: HashSet<&str> = tables
            .views
            .iter()
            .filter(|v| v.viewed_at >= active_since)
            .filter_map(|v| v.user_id.as_deref())
            .collect();

        Ok(OverviewMetrics {
            total_views: tables.views.len() as i64,
            total_revenue: tables.transactions.iter().map(|t| t.amount).sum(),
            total_engagements: tables.engagements.len() as i64,
            active_users: active.len() as i64,
        })
    }

    async fn daily_views(&self, range: TimeRange) -> Result<Vec<DailyCount>, AnalyticsError> {
        let tables = self.tables.lock().unwrap();
        let mut days: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for view in tables.views.iter().filter(|v| range.contains(v.viewed_at)) {
            *days.entry(view.viewed_at.date_naive()).or_default() += 1;
        }
        Ok(days
            .into_iter()
            .map(|(date, value)| DailyCount { date, value })
            .collect())
    }

    async fn daily_revenue(&self, range: TimeRange) -> Result<Vec<DailyAmount>, AnalyticsError> {
        let tables = self.tables.lock().unwrap();
        let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for tx in tables
            .transactions
            .iter()
            .filter(|t| range.contains(t.created_at))
        {
            *days.entry(tx.created_at.date_naive()).or_default() += tx.amount;
        }
        Ok(days
            .into_iter()
            .map(|(date, value)| DailyAmount { date, value })
            .collect())
    }

    async fn top_content(&self, limit: i64) -> Result<Vec<ContentStats>, AnalyticsError> {
        let tables = self.tables.lock().unwrap();

        let mut views: HashMap<String, i64> = HashMap::new();
        for view in &tables.views {
            *views.entry(view.content_id.clone()).or_default() += 1;
        }

        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(sorted_counts(views)
            .into_iter()
            .take(limit)
            .map(|(content_id, views)| {
                let revenue = tables
                    .transactions
                    .iter()
                    .filter(|t| t.content_id.as_deref() == Some(content_id.as_str()))
                    .map(|t| t.amount)
                    .sum();
                let engagements = tables
                    .engagements
                    .iter()
                    .filter(|e| e.content_id.as_deref() == Some(content_id.as_str()))
                    .count() as i64;
                ContentStats {
                    title: tables.titles.get(&content_id).cloned(),
                    content_id,
                    views,
                    revenue,
                    engagements,
                }
            })
            .collect())
    }

    async fn engagement_by_type(&self) -> Result<Vec<EngagementTypeCount>, AnalyticsError> {
        let tables = self.tables.lock().unwrap();
        let mut counts: HashMap<String, i64> = HashMap::new();
        for engagement in &tables.engagements {
            *counts.entry(engagement.event_type.clone()).or_default() += 1;
        }
        Ok(sorted_counts(counts)
            .into_iter()
            .map(|(event_type, count)| EngagementTypeCount { event_type, count })
            .collect())
    }

    async fn views_by_platform(&self) -> Result<Vec<PlatformCount>, AnalyticsError> {
        let tables = self.tables.lock().unwrap();
        let mut counts: HashMap<String, i64> = HashMap::new();
        for view in &tables.views {
            *counts.entry(view.platform.clone()).or_default() += 1;
        }
        Ok(sorted_counts(counts)
            .into_iter()
            .map(|(platform, count)| PlatformCount { platform, count })
            .collect())
    }

    async fn daily_summary(
        &self,
        date: NaiveDate,
        computed_at: DateTime<Utc>,
    ) -> Result<DailyMetrics, AnalyticsError> {
        let tables = self.tables.lock().unwrap();
        let views: Vec<&ContentViewEvent> = tables
            .views
            .iter()
            .filter(|v| v.viewed_at.date_naive() == date)
            .collect();
        let viewers: HashSet<&str> = views.iter().filter_map(|v| v.user_id.as_deref()).collect();
        let transactions: Vec<&TransactionEvent> = tables
            .transactions
            .iter()
            .filter(|t| t.created_at.date_naive() == date)
            .collect();

        Ok(DailyMetrics {
            date,
            total_views: views.len() as i64,
            unique_viewers: viewers.len() as i64,
            total_engagements: tables
                .engagements
                .iter()
                .filter(|e| e.occurred_at.date_naive() == date)
                .count() as i64,
            total_transactions: transactions.len() as i64,
            total_revenue: transactions.iter().map(|t| t.amount).sum(),
            refreshed_at: computed_at,
        })
    }

    async fn save_daily_metrics(&self, metrics: &DailyMetrics) -> Result<(), AnalyticsError> {
        self.tables
            .lock()
            .unwrap()
            .daily_metrics
            .insert(metrics.date, metrics.clone());
        Ok(())
    }

    async fn load_daily_metrics(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyMetrics>, AnalyticsError> {
        if from > to {
            return Ok(vec![]);
        }
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .daily_metrics
            .range(from..=to)
            .map(|(_, row)| row.clone())
            .collect())
    }
}

/// A store that fails every call with a store error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingAnalyticsStore;

fn refused() -> AnalyticsError {
    AnalyticsError::Store("connection refused".into())
}

#[async_trait]
impl EventStore for FailingAnalyticsStore {
    async fn append_view(&self, _event: &ContentViewEvent) -> Result<(), AnalyticsError> {
        Err(refused())
    }

    async fn append_engagement(&self, _event: &EngagementEvent) -> Result<(), AnalyticsError> {
        Err(refused())
    }

    async fn append_transaction(&self, _event: &TransactionEvent) -> Result<(), AnalyticsError> {
        Err(refused())
    }
}

#[async_trait]
impl MetricsStore for FailingAnalyticsStore {
    async fn overview(
        &self,
        _active_since: DateTime<Utc>,
    ) -> Result<OverviewMetrics, AnalyticsError> {
        Err(refused())
    }

    async fn daily_views(&self, _range: TimeRange) -> Result<Vec<DailyCount>, AnalyticsError> {
        Err(refused())
    }

    async fn daily_revenue(&self, _range: TimeRange) -> Result<Vec<DailyAmount>, AnalyticsError> {
        Err(refused())
    }

    async fn top_content(&self, _limit: i64) -> Result<Vec<ContentStats>, AnalyticsError> {
        Err(refused())
    }

    async fn engagement_by_type(&self) -> Result<Vec<EngagementTypeCount>, AnalyticsError> {
        Err(refused())
    }

    async fn views_by_platform(&self) -> Result<Vec<PlatformCount>, AnalyticsError> {
        Err(refused())
    }

    async fn daily_summary(
        &self,
        _date: NaiveDate,
        _computed_at: DateTime<Utc>,
    ) -> Result<DailyMetrics, AnalyticsError> {
        Err(refused())
    }

    async fn save_daily_metrics(&self, _metrics: &DailyMetrics) -> Result<(), AnalyticsError> {
        Err(refused())
    }

    async fn load_daily_metrics(
        &self,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<DailyMetrics>, AnalyticsError> {
        Err(refused())
    }
}
