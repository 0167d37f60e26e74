use serde::{Deserialize, Serialize};

use super::Block;

/// Session - the content one classroom shows during one block
///
/// `start`/`end` are copied verbatim from the block at generation time and are
/// never edited on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub classroom_id: u32,
    pub start: String,
    pub end: String,
    pub title: String,
    pub presenter: String,
    pub description: String,
}

impl Session {
    /// Build the session for `classroom_id` during `block`
    pub fn for_block(
        classroom_id: u32,
        block: &Block,
        title: impl Into<String>,
        presenter: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            classroom_id,
            start: block.start.clone(),
            end: block.end.clone(),
            title: title.into(),
            presenter: presenter.into(),
            description: description.into(),
        }
    }

    /// An empty slot for `classroom_id` during `block`
    pub fn empty(classroom_id: u32, block: &Block) -> Self {
        Self::for_block(classroom_id, block, "", "", "")
    }

    /// Required-field check: a session is scheduled once it has both a title
    /// and a presenter
    pub fn is_scheduled(&self) -> bool {
        !self.title.trim().is_empty() && !self.presenter.trim().is_empty()
    }
}
