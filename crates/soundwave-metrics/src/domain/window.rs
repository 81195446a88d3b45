//! Trailing reporting windows.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use soundwave_core::metrics::TimeRange;

/// Default length of both windows, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// How far back the aggregator looks, measured from the clock's `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingWindow {
    /// Window for counting active users.
    pub active_user_days: u32,
    /// Window for daily time series.
    pub series_days: u32,
}

impl Default for ReportingWindow {
    fn default() -> Self {
        Self {
            active_user_days: DEFAULT_WINDOW_DAYS,
            series_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl ReportingWindow {
    /// Creates a window with explicit lengths.
    #[must_use]
    pub fn new(active_user_days: u32, series_days: u32) -> Self {
        Self {
            active_user_days,
            series_days,
        }
    }

    /// Earliest view timestamp that still counts towards active users.
    #[must_use]
    pub fn active_since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.active_user_days))
    }

    /// Timestamp range covered by the daily series.
    #[must_use]
    pub fn series_range(&self, now: DateTime<Utc>) -> TimeRange {
        TimeRange {
            from: now - Duration::days(i64::from(self.series_days)),
            to: now,
        }
    }

    /// Calendar days covered by the daily series, inclusive.
    #[must_use]
    pub fn series_dates(&self, now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
        let range = self.series_range(now);
        (range.from.date_naive(), range.to.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_window_is_thirty_days() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap();
        let window = ReportingWindow::default();

        assert_eq!(
            window.active_since(now),
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
        );
        let range = window.series_range(now);
        assert_eq!(range.to, now);
        assert_eq!(range.from, window.active_since(now));
    }

    #[test]
    fn test_series_dates_span_calendar_days() {
        let now = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap();
        let (from, to) = ReportingWindow::new(30, 7).series_dates(now);

        assert_eq!(from, NaiveDate::from_ymd_opt(2026, 3, 24).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
    }
}
