//! Shared test doubles and utilities for SoundWave analytics.

mod clock;
mod ids;
mod store;

pub use clock::FixedClock;
pub use ids::SequenceIds;
pub use store::{FailingAnalyticsStore, InMemoryAnalyticsStore};
