//! Commands for the Event Recorder.
//!
//! Every field is optional at the type level so that a missing required
//! field surfaces as a `Validation` error from the handler rather than a
//! deserialization rejection.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use soundwave_core::command::Command;
use soundwave_core::error::AnalyticsError;

/// Command to record one content view.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    /// The viewed content. Required.
    pub content_id: Option<String>,
    /// The viewer, if signed in.
    pub user_id: Option<String>,
    /// Client session; generated when absent.
    pub session_id: Option<String>,
    /// Seconds watched or listened. Fractions are rounded to whole seconds.
    pub view_duration: Option<Decimal>,
    /// Client platform tag.
    pub platform: Option<String>,
    /// Viewer country.
    pub country: Option<String>,
    /// Referring page.
    pub referrer: Option<String>,
}

impl Command for RecordView {
    fn command_type(&self) -> &'static str {
        "analytics.record_view"
    }
}

/// Command to record one engagement.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEngagement {
    /// The acting user. Required.
    pub user_id: Option<String>,
    /// Interaction tag. Required.
    pub event_type: Option<String>,
    /// The content interacted with.
    pub content_id: Option<String>,
    /// Opaque client metadata.
    pub metadata: Option<serde_json::Value>,
}

impl Command for RecordEngagement {
    fn command_type(&self) -> &'static str {
        "analytics.record_engagement"
    }
}

/// Command to record one transaction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransaction {
    /// Client transaction reference; generated when absent.
    pub transaction_id: Option<String>,
    /// The paying or receiving user. Required.
    pub user_id: Option<String>,
    /// The content involved.
    pub content_id: Option<String>,
    /// The ticketed event involved.
    pub event_id: Option<String>,
    /// Transaction-type tag. Required.
    pub transaction_type: Option<String>,
    /// Gross amount. Required; zero is allowed.
    pub amount: Option<Decimal>,
    /// Currency code.
    pub currency: Option<String>,
    /// Marketplace share; derived when absent.
    pub platform_fee: Option<Decimal>,
    /// Creator share; derived when absent.
    pub creator_revenue: Option<Decimal>,
    /// How the buyer paid.
    pub payment_method: Option<String>,
    /// Settlement status.
    pub status: Option<String>,
}

impl Command for RecordTransaction {
    fn command_type(&self) -> &'static str {
        "analytics.record_transaction"
    }
}

/// Drops blank strings so that `""` and `"  "` behave like an absent field.
pub(crate) fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Rounds a view duration half away from zero to whole seconds.
///
/// # Errors
///
/// Returns `AnalyticsError::Validation` if the duration is negative or does
/// not fit in an `i32`.
pub(crate) fn whole_seconds(value: Option<Decimal>) -> Result<Option<i32>, AnalyticsError> {
    value
        .map(|seconds| {
            if seconds < Decimal::ZERO {
                return Err(AnalyticsError::Validation(
                    "viewDuration must not be negative".into(),
                ));
            }
            seconds
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i32()
                .ok_or_else(|| AnalyticsError::Validation("viewDuration is too large".into()))
        })
        .transpose()
}

/// Returns the trimmed value of a required field.
///
/// # Errors
///
/// Returns `AnalyticsError::Validation` naming `field` if the value is absent
/// or blank.
pub(crate) fn required(field: &str, value: Option<&String>) -> Result<String, AnalyticsError> {
    non_blank(value).ok_or_else(|| AnalyticsError::missing(field))
}
