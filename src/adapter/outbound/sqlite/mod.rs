//! SQLite persistence adapters.
//!
//! Provides a SQLite-backed implementation of the tick, message and daily
//! bar stores using Diesel ORM.

pub mod database;
pub mod store;

pub use database::connection::{create_pool, run_migrations, DbPool};
pub use store::SqliteStore;
