//! Input rules for write requests: count clamping and per-field outcomes

pub mod bounds;

pub use bounds::{clamp_count, BoundedCount, CountBounds, FieldOutcome, BLOCK_COUNT, CLASSROOM_COUNT};
