//! Route modules.

pub mod analytics;
pub mod health;
