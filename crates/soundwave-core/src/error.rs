//! Analytics error types.

use thiserror::Error;

/// Top-level error type for the analytics pipeline.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A required field is missing or malformed. Never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// A persistence or query failure, including query timeouts.
    #[error("store error: {0}")]
    Store(String),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl AnalyticsError {
    /// Builds a validation error for a required field that was not supplied.
    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self::Validation(format!("{field} is required"))
    }
}
