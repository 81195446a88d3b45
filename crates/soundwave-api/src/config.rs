//! Server configuration, read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use soundwave_metrics::domain::window::{DEFAULT_WINDOW_DAYS, ReportingWindow};

use crate::error::AppError;

/// Settings for the API server binary.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// PostgreSQL connection string (`DATABASE_URL`).
    pub database_url: String,
    /// Bind address (`HOST`).
    pub host: String,
    /// Bind port (`PORT`).
    pub port: u16,
    /// Pool size (`MAX_CONNECTIONS`).
    pub max_connections: u32,
    /// Per-query timeout in milliseconds (`QUERY_TIMEOUT_MS`).
    pub query_timeout_ms: u64,
    /// Active-user window in days (`ACTIVE_USER_WINDOW_DAYS`).
    pub active_user_window_days: u32,
    /// Daily series window in days (`SERIES_WINDOW_DAYS`).
    pub series_window_days: u32,
    /// Apply embedded migrations at startup (`RUN_MIGRATIONS`).
    pub run_migrations: bool,
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is unset or a value does
    /// not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_source(config::Environment::default())
    }

    /// Reads the configuration from `environment` layered over defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is unset, a value does
    /// not parse, or a window or timeout is zero.
    pub fn from_source(environment: config::Environment) -> Result<Self, AppError> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("max_connections", 10)?
            .set_default("query_timeout_ms", 5000)?
            .set_default("active_user_window_days", i64::from(DEFAULT_WINDOW_DAYS))?
            .set_default("series_window_days", i64::from(DEFAULT_WINDOW_DAYS))?
            .set_default("run_migrations", true)?
            .add_source(environment.try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.database_url.trim().is_empty() {
            return Err(AppError::Config("DATABASE_URL must be set".into()));
        }
        if self.query_timeout_ms == 0 {
            return Err(AppError::Config("QUERY_TIMEOUT_MS must be positive".into()));
        }
        if self.active_user_window_days == 0 || self.series_window_days == 0 {
            return Err(AppError::Config("window lengths must be positive".into()));
        }
        Ok(())
    }

    /// Per-query timeout.
    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Reporting windows for the aggregator.
    #[must_use]
    pub fn reporting_window(&self) -> ReportingWindow {
        ReportingWindow::new(self.active_user_window_days, self.series_window_days)
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a valid address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
