//! Command handlers for the Metrics Aggregator.
//!
//! The only write on the read side: recomputing one row of the
//! `daily_metrics` denormalization from the raw events.

use chrono::NaiveDate;
use soundwave_core::clock::Clock;
use soundwave_core::error::AnalyticsError;
use soundwave_core::metrics::DailyMetrics;
use soundwave_core::store::MetricsStore;
use tracing::info;

/// Recomputes and stores the totals for `date` (today, per `clock`, when
/// `None`). Refreshing the same day again replaces the row.
///
/// # Errors
///
/// Returns `AnalyticsError::Validation` if `date` lies in the future and
/// `AnalyticsError::Store` if the summary query or the save fails.
pub async fn handle_refresh_daily_metrics(
    date: Option<NaiveDate>,
    clock: &dyn Clock,
    store: &dyn MetricsStore,
) -> Result<DailyMetrics, AnalyticsError> {
    let now = clock.now();
    let today = now.date_naive();
    let date = date.unwrap_or(today);
    if date > today {
        return Err(AnalyticsError::Validation(format!(
            "cannot refresh metrics for future date {date}"
        )));
    }

    let metrics = store.daily_summary(date, now).await?;
    store.save_daily_metrics(&metrics).await?;

    info!(
        %date,
        total_views = metrics.total_views,
        total_transactions = metrics.total_transactions,
        "refreshed daily metrics"
    );
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use soundwave_core::error::AnalyticsError;
    use soundwave_recorder::application::command_handlers::{
        handle_record_transaction, handle_record_view,
    };
    use soundwave_recorder::domain::commands::{RecordTransaction, RecordView};

    use super::handle_refresh_daily_metrics;
    use crate::application::query_handlers::get_daily_metrics;
    use crate::domain::window::ReportingWindow;
    use soundwave_test_support::{
        FailingAnalyticsStore, FixedClock, InMemoryAnalyticsStore, SequenceIds,
    };

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    async fn seed(store: &InMemoryAnalyticsStore, ids: &SequenceIds, at: DateTime<Utc>) {
        let clock = FixedClock(at);
        for user in ["u1", "u1", "u2"] {
            let view = RecordView {
                content_id: Some("song-1".to_owned()),
                user_id: Some(user.to_owned()),
                ..RecordView::default()
            };
            handle_record_view(&view, &clock, ids, store).await.unwrap();
        }
        let purchase = RecordTransaction {
            user_id: Some("u2".to_owned()),
            content_id: Some("song-1".to_owned()),
            transaction_type: Some("purchase".to_owned()),
            amount: Some(dec!(7.5)),
            ..RecordTransaction::default()
        };
        handle_record_transaction(&purchase, &clock, ids, store)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_refresh_defaults_to_today() {
        // Arrange
        let store = InMemoryAnalyticsStore::new();
        let ids = SequenceIds::new();
        seed(&store, &ids, fixed_now()).await;
        seed(&store, &ids, fixed_now() - Duration::days(1)).await;
        let clock = FixedClock(fixed_now());

        // Act
        let metrics = handle_refresh_daily_metrics(None, &clock, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(metrics.date, fixed_now().date_naive());
        assert_eq!(metrics.total_views, 3);
        assert_eq!(metrics.unique_viewers, 2);
        assert_eq!(metrics.total_transactions, 1);
        assert_eq!(metrics.total_revenue, dec!(7.5));
        assert_eq!(metrics.refreshed_at, fixed_now());
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent_and_readable() {
        // Arrange
        let store = InMemoryAnalyticsStore::new();
        let ids = SequenceIds::new();
        let yesterday = fixed_now() - Duration::days(1);
        seed(&store, &ids, yesterday).await;
        let clock = FixedClock(fixed_now());

        // Act
        let first = handle_refresh_daily_metrics(Some(yesterday.date_naive()), &clock, &store)
            .await
            .unwrap();
        let second = handle_refresh_daily_metrics(Some(yesterday.date_naive()), &clock, &store)
            .await
            .unwrap();
        let stored = get_daily_metrics(&ReportingWindow::default(), &clock, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(first, second);
        assert_eq!(stored, vec![first]);
    }

    #[tokio::test]
    async fn test_refresh_rejects_future_dates() {
        let store = InMemoryAnalyticsStore::new();
        let clock = FixedClock(fixed_now());
        let tomorrow = (fixed_now() + Duration::days(1)).date_naive();

        let result = handle_refresh_daily_metrics(Some(tomorrow), &clock, &store).await;

        assert!(matches!(result, Err(AnalyticsError::Validation(_))));
    }

    #[tokio::test]
    async fn test_refresh_surfaces_store_failure() {
        let clock = FixedClock(fixed_now());

        let result = handle_refresh_daily_metrics(None, &clock, &FailingAnalyticsStore).await;

        assert!(matches!(result, Err(AnalyticsError::Store(_))));
    }
}
