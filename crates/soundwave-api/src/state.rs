//! Shared application state.

use std::sync::Arc;

use soundwave_core::clock::Clock;
use soundwave_core::ids::IdGenerator;
use soundwave_core::store::{EventStore, MetricsStore};
use soundwave_metrics::domain::window::ReportingWindow;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Time source for server-assigned timestamps and reporting windows.
    pub clock: Arc<dyn Clock>,
    /// Event, session and transaction id source.
    pub ids: Arc<dyn IdGenerator>,
    /// Write side of the analytics store.
    pub event_store: Arc<dyn EventStore>,
    /// Read side of the analytics store.
    pub metrics_store: Arc<dyn MetricsStore>,
    /// Trailing windows used by the aggregator.
    pub window: ReportingWindow,
}

impl AppState {
    /// Create new application state backed by a single store that serves
    /// both the write and the read side.
    #[must_use]
    pub fn new<S>(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        window: ReportingWindow,
    ) -> Self
    where
        S: EventStore + MetricsStore + 'static,
    {
        Self {
            clock,
            ids,
            event_store: store.clone(),
            metrics_store: store,
            window,
        }
    }
}
