//! Scheduler Core - in-memory schedule kernel
//!
//! This crate holds everything about the classroom schedule that does not touch
//! storage:
//! - Block, Classroom, Session and Settings models
//! - The block generator with its cascade rule
//! - Decoding of flat form key/value pairs into typed write requests
//! - The reader/writer-locked cache and the snapshot handed to renderers
//! - The error and logging facilities shared by the other crates

pub mod errors;
pub mod form;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;
pub mod snapshot;
pub mod time_of_day;

// Re-exported so the logging macros resolve for downstream crates.
pub use scheduler_core_types;

pub use errors::{ExError, ExErrorKind, Result, SchedulerError};
pub use ops::cache::ScheduleCache;
pub use snapshot::Snapshot;
