//! Scheduler Engine - orchestration layer
//!
//! Owns the schedule cache and the SQLite connection. Reads are served from
//! the cache; writes mutate the cache and then write the new image back to
//! storage outside the cache lock.

pub mod report;
pub mod scheduler;

pub use report::WriteReport;
pub use scheduler::Scheduler;
