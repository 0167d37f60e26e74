//! Block generation with the cascade rule
//!
//! For block `i` (0-based):
//! - start: explicit override if it parses, `08:00` for the first block,
//!   otherwise the previous block's end plus the break
//! - end: explicit override if it parses, otherwise start plus session length
//!
//! The previous end carried forward is always the literal end of the previous
//! block, overridden or not.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::Serialize;

use crate::model::{Block, Settings};
use crate::rules::{FieldOutcome, BLOCK_COUNT};
use crate::time_of_day;

/// Requested block layout: a count plus optional per-index overrides
///
/// Override maps are keyed by 0-based block index and hold raw strings;
/// parsing happens during generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSpec {
    pub count: u32,
    pub starts: BTreeMap<usize, String>,
    pub ends: BTreeMap<usize, String>,
}

impl BlockSpec {
    /// Spec with no overrides
    pub fn new(count: u32) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Add an explicit start for the block at `index`
    pub fn with_start(mut self, index: usize, raw: impl Into<String>) -> Self {
        self.starts.insert(index, raw.into());
        self
    }

    /// Add an explicit end for the block at `index`
    pub fn with_end(mut self, index: usize, raw: impl Into<String>) -> Self {
        self.ends.insert(index, raw.into());
        self
    }

    /// Count after clamping to `[1, 20]`
    pub fn clamped_count(&self) -> u32 {
        self.count.clamp(BLOCK_COUNT.min, BLOCK_COUNT.max)
    }
}

/// How one block's start and end were obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockReport {
    pub block_id: u32,
    pub start: FieldOutcome,
    pub end: FieldOutcome,
}

/// Generator output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBlocks {
    pub blocks: Vec<Block>,
    pub report: Vec<BlockReport>,
}

/// Generate blocks, discarding the per-field report
pub fn generate_blocks(spec: &BlockSpec, settings: &Settings) -> Vec<Block> {
    generate_blocks_with_report(spec, settings).blocks
}

/// Generate blocks and record, per block, where each time came from
pub fn generate_blocks_with_report(spec: &BlockSpec, settings: &Settings) -> GeneratedBlocks {
    let count = spec.clamped_count() as usize;
    let mut blocks = Vec::with_capacity(count);
    let mut report = Vec::with_capacity(count);
    let mut prev_end: Option<NaiveTime> = None;

    for i in 0..count {
        let (explicit_start, start_outcome) = resolve_override(spec.starts.get(&i));
        let start = explicit_start.unwrap_or_else(|| match prev_end {
            Some(end) => time_of_day::add_minutes(end, settings.break_minutes),
            None => time_of_day::day_start(),
        });

        let (explicit_end, end_outcome) = resolve_override(spec.ends.get(&i));
        let end = explicit_end
            .unwrap_or_else(|| time_of_day::add_minutes(start, settings.session_length_minutes));

        let id = (i + 1) as u32;
        blocks.push(Block::new(
            id,
            time_of_day::format(start),
            time_of_day::format(end),
        ));
        report.push(BlockReport {
            block_id: id,
            start: start_outcome,
            end: end_outcome,
        });

        prev_end = Some(end);
    }

    GeneratedBlocks { blocks, report }
}

/// Blank overrides are absent; unparseable ones are rejected and fall through
fn resolve_override(raw: Option<&String>) -> (Option<NaiveTime>, FieldOutcome) {
    match raw.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => (None, FieldOutcome::Absent),
        Some(raw) => match time_of_day::parse(raw) {
            Some(time) => (Some(time), FieldOutcome::Applied),
            None => (
                None,
                FieldOutcome::Rejected {
                    raw: raw.to_string(),
                },
            ),
        },
    }
}
