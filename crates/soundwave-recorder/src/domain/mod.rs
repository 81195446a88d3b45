//! Domain layer for the Event Recorder.

pub mod commands;
pub mod revenue;
