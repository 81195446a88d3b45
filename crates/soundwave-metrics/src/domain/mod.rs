//! Domain layer for the Metrics Aggregator.

pub mod window;
