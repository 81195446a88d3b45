//! SoundWave analytics — Event Recorder.
//!
//! Validates view, engagement and transaction descriptions, fills in
//! server-side defaults, and appends exactly one row per accepted event.

pub mod application;
pub mod domain;
