//! Scheduler Store - SQLite persistence for the schedule cache
//!
//! Provides:
//! - Connection setup and embedded, checksummed migrations
//! - Full-replace writers for classrooms, sessions and blocks
//! - Hydration of the cache state at startup, seeding default blocks
//! - The settings key/value store

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod settings;

// Re-export key types
pub use errors::Result;
pub use repo::{PersistReport, SqliteRepo, Table};
pub use settings::SettingsStore;
