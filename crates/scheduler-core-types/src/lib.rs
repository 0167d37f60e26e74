//! Core types shared across the scheduler crates
//!
//! - **Correlation types**: RequestId, stamped on every write request
//! - **Schema constants**: canonical field keys and event names for logging

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
