//! Command handlers for the Event Recorder.
//!
//! Each handler validates its command, builds the immutable event record,
//! and appends it with a single store call. Nothing is retried here: a
//! duplicate append would double-count the event, so the caller decides.

use soundwave_core::clock::Clock;
use soundwave_core::command::Command;
use soundwave_core::error::AnalyticsError;
use soundwave_core::event::{
    ContentViewEvent, DEFAULT_CURRENCY, DEFAULT_PLATFORM, DEFAULT_TRANSACTION_STATUS,
    EngagementEvent, TransactionEvent,
};
use soundwave_core::ids::IdGenerator;
use soundwave_core::store::EventStore;
use tracing::{debug, warn};

use crate::domain::commands::{
    RecordEngagement, RecordTransaction, RecordView, non_blank, required, whole_seconds,
};
use crate::domain::revenue::RevenueSplit;

fn log_store_failure(command: &dyn Command, err: &AnalyticsError) {
    warn!(command = command.command_type(), error = %err, "failed to append analytics event");
}

/// Handles the `RecordView` command.
///
/// # Errors
///
/// Returns `AnalyticsError::Validation` if `contentId` is missing or
/// `viewDuration` is negative or out of range, and `AnalyticsError::Store`
/// if the append fails.
pub async fn handle_record_view(
    command: &RecordView,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn EventStore,
) -> Result<ContentViewEvent, AnalyticsError> {
    let content_id = required("contentId", command.content_id.as_ref())?;
    let view_duration = whole_seconds(command.view_duration)?;

    let event = ContentViewEvent {
        id: ids.event_id(),
        content_id,
        user_id: non_blank(command.user_id.as_ref()),
        session_id: non_blank(command.session_id.as_ref()).unwrap_or_else(|| ids.session_id()),
        view_duration,
        platform: non_blank(command.platform.as_ref())
            .unwrap_or_else(|| DEFAULT_PLATFORM.to_owned()),
        country: non_blank(command.country.as_ref()),
        referrer: non_blank(command.referrer.as_ref()),
        viewed_at: clock.now(),
    };

    store
        .append_view(&event)
        .await
        .inspect_err(|e| log_store_failure(command, e))?;

    debug!(event_id = %event.id, content_id = %event.content_id, "recorded content view");
    Ok(event)
}

/// Handles the `RecordEngagement` command.
///
/// # Errors
///
/// Returns `AnalyticsError::Validation` if `userId` or `eventType` is
/// missing, and `AnalyticsError::Store` if the append fails.
pub async fn handle_record_engagement(
    command: &RecordEngagement,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn EventStore,
) -> Result<EngagementEvent, AnalyticsError> {
    let user_id = required("userId", command.user_id.as_ref())?;
    let event_type = required("eventType", command.event_type.as_ref())?;

    let event = EngagementEvent {
        id: ids.event_id(),
        user_id,
        event_type,
        content_id: non_blank(command.content_id.as_ref()),
        metadata: command.metadata.clone().filter(|m| !m.is_null()),
        occurred_at: clock.now(),
    };

    store
        .append_engagement(&event)
        .await
        .inspect_err(|e| log_store_failure(command, e))?;

    debug!(event_id = %event.id, event_type = %event.event_type, "recorded engagement");
    Ok(event)
}

/// Handles the `RecordTransaction` command. When the caller omits the fee
/// split it is computed with [`RevenueSplit::standard`].
///
/// # Errors
///
/// Returns `AnalyticsError::Validation` if `userId`, `transactionType` or
/// `amount` is missing or a money field is negative or out of bounds, and
/// `AnalyticsError::Store` if the append fails.
pub async fn handle_record_transaction(
    command: &RecordTransaction,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    store: &dyn EventStore,
) -> Result<TransactionEvent, AnalyticsError> {
    let user_id = required("userId", command.user_id.as_ref())?;
    let transaction_type = required("transactionType", command.transaction_type.as_ref())?;
    let amount = command
        .amount
        .ok_or_else(|| AnalyticsError::missing("amount"))?;
    let split = RevenueSplit::resolve(amount, command.platform_fee, command.creator_revenue)?;

    let event = TransactionEvent {
        id: ids.event_id(),
        transaction_id: non_blank(command.transaction_id.as_ref())
            .unwrap_or_else(|| ids.transaction_id()),
        user_id,
        content_id: non_blank(command.content_id.as_ref()),
        event_id: non_blank(command.event_id.as_ref()),
        transaction_type,
        amount,
        currency: non_blank(command.currency.as_ref())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
        platform_fee: split.platform_fee,
        creator_revenue: split.creator_revenue,
        payment_method: non_blank(command.payment_method.as_ref()),
        status: non_blank(command.status.as_ref())
            .unwrap_or_else(|| DEFAULT_TRANSACTION_STATUS.to_owned()),
        created_at: clock.now(),
    };

    store
        .append_transaction(&event)
        .await
        .inspect_err(|e| log_store_failure(command, e))?;

    debug!(
        event_id = %event.id,
        transaction_id = %event.transaction_id,
        amount = %event.amount,
        "recorded transaction"
    );
    Ok(event)
}
