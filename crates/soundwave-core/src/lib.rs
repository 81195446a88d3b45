//! SoundWave Core — shared analytics abstractions.
//!
//! This crate defines the event records, metric views, error taxonomy and
//! store traits that the recorder, the aggregator and the storage backends
//! depend on. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod ids;
pub mod metrics;
pub mod store;
