//! Identifier generation abstraction for determinism.
//!
//! In production, event ids are time-ordered UUIDs and session/transaction
//! references come from the thread RNG. In tests a sequential implementation
//! is injected.

use rand::Rng;
use rand::distr::Alphanumeric;
use uuid::Uuid;

/// Length of the random suffix in generated session and transaction ids.
const TOKEN_LEN: usize = 16;

/// Abstraction over identifier generation.
pub trait IdGenerator: Send + Sync {
    /// Generate a new event identifier.
    fn event_id(&self) -> Uuid;

    /// Generate an opaque session identifier for anonymous clients.
    fn session_id(&self) -> String;

    /// Generate a transaction reference when the client did not send one.
    fn transaction_id(&self) -> String;
}

/// Production generator backed by UUID v7 and the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    fn token() -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect::<String>()
            .to_lowercase()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn event_id(&self) -> Uuid {
        Uuid::now_v7()
    }

    fn session_id(&self) -> String {
        format!("sess_{}", Self::token())
    }

    fn transaction_id(&self) -> String {
        format!("tx_{}", Self::token())
    }
}
