use serde::{Deserialize, Serialize};

/// Block - one time interval of the daily grid, shared by every classroom
///
/// Ids form a dense 1..N sequence. `start` and `end` are zero-padded `HH:MM`
/// strings; `end` is normally after `start` but user overrides may break that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the schedule
    pub id: u32,

    /// Start time, `HH:MM`
    pub start: String,

    /// End time, `HH:MM`
    pub end: String,
}

impl Block {
    pub fn new(id: u32, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id,
            start: start.into(),
            end: end.into(),
        }
    }
}
