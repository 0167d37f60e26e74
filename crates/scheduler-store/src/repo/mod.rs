//! Repository layer: full-replace writes from the cache and the startup load

pub mod hydration;
pub mod sqlite_repo;

pub use sqlite_repo::{PersistReport, SqliteRepo, Table, TableFailure, TableReport};
