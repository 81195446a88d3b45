//! Test ids — deterministic `IdGenerator` implementation for tests.

use std::sync::atomic::{AtomicU64, Ordering};

use soundwave_core::ids::IdGenerator;
use uuid::Uuid;

/// Generates ids from a shared counter: event ids are `Uuid::from_u128(n)`,
/// sessions are `session-n` and transactions `tx-n`. The counter starts at 1.
#[derive(Debug, Default)]
pub struct SequenceIds {
    next: AtomicU64,
}

impl SequenceIds {
    /// Create a new generator starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl IdGenerator for SequenceIds {
    fn event_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.bump()))
    }

    fn session_id(&self) -> String {
        format!("session-{}", self.bump())
    }

    fn transaction_id(&self) -> String {
        format!("tx-{}", self.bump())
    }
}
