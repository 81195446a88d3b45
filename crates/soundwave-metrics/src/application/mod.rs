//! Application layer for the Metrics Aggregator.

pub mod command_handlers;
pub mod query_handlers;
