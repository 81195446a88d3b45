//! Application layer for the Event Recorder.

pub mod command_handlers;
