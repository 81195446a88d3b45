//! SoundWave analytics — Metrics Aggregator.
//!
//! Read-only aggregate queries over the event store for the dashboards,
//! plus the on-demand `daily_metrics` refresh. Nothing is cached between
//! calls; every query re-aggregates the current store contents.

pub mod application;
pub mod domain;
