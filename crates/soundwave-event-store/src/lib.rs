//! PostgreSQL-backed analytics event store.
//!
//! Tables are created by the SQL migrations in the workspace `migrations/`
//! directory; [`MIGRATOR`] embeds them for the server binary.

pub mod pg_analytics_store;

pub use pg_analytics_store::PgAnalyticsStore;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
