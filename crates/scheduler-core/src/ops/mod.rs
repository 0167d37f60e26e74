pub mod block_generator;
pub mod cache;

pub use block_generator::{generate_blocks, generate_blocks_with_report, BlockSpec};
pub use cache::{CacheWrite, ReplaceAllReport, ScheduleCache, ScheduleState, SessionsReport};
