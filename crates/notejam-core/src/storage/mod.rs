//! Storage layer: SQLite connection management and migrations

pub mod database;
pub mod migrations;

pub use database::{Database, DatabaseConfig};
pub use migrations::{migration_status, run_migrations, MigrationStatus};
