//! Decoding of flat form key/value pairs into typed write requests
//!
//! Keys understood:
//! - `num_classrooms`, `block_count`
//! - `session_length`, `break_minutes`
//! - `start_<n>` / `end_<n>` with `n` 1-based
//! - `title_<classroom>_<i>`, `presenter_<classroom>_<i>`, `desc_<classroom>_<i>`
//!   with `i` the 0-based block index
//! - `roomname_<classroom>`
//!
//! Unknown or malformed keys are ignored.

use std::collections::{BTreeMap, HashMap};

use crate::ops::block_generator::BlockSpec;
use crate::rules::{clamp_count, BoundedCount, BLOCK_COUNT, CLASSROOM_COUNT};

/// Form data as handed over by the HTTP layer
pub type FormData = HashMap<String, String>;

/// Title, presenter and description submitted for one (classroom, block) cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellInput {
    pub title: String,
    pub presenter: String,
    pub description: String,
}

impl CellInput {
    pub fn new(
        title: impl Into<String>,
        presenter: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            presenter: presenter.into(),
            description: description.into(),
        }
    }
}

/// Cell inputs keyed by (classroom id, 0-based block index)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellFields(BTreeMap<(u32, usize), CellInput>);

impl CellFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, classroom_id: u32, block_index: usize) -> Option<&CellInput> {
        self.0.get(&(classroom_id, block_index))
    }

    pub fn insert(&mut self, classroom_id: u32, block_index: usize, cell: CellInput) {
        self.0.insert((classroom_id, block_index), cell);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn entry(&mut self, classroom_id: u32, block_index: usize) -> &mut CellInput {
        self.0.entry((classroom_id, block_index)).or_default()
    }

    fn decode(form: &FormData) -> Self {
        let mut cells = CellFields::new();
        for (key, value) in form {
            let Some((field, classroom_id, block_index)) = parse_cell_key(key) else {
                continue;
            };
            let cell = cells.entry(classroom_id, block_index);
            match field {
                CellField::Title => cell.title = value.clone(),
                CellField::Presenter => cell.presenter = value.clone(),
                CellField::Description => cell.description = value.clone(),
            }
        }
        cells
    }
}

/// Raw settings values submitted alongside a block layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub session_length: Option<String>,
    pub break_minutes: Option<String>,
}

/// Block-layout write: resize classrooms, regenerate blocks, rebuild sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockForm {
    pub classroom_count: BoundedCount,
    pub block_count: BoundedCount,
    pub settings: SettingsUpdate,
    pub blocks: BlockSpec,
    pub cells: CellFields,
}

impl BlockForm {
    /// Programmatic constructor; counts are clamped the same way decoding does
    pub fn new(classroom_count: u32, blocks: BlockSpec) -> Self {
        let classroom_count = clamp_count(Some(&classroom_count.to_string()), CLASSROOM_COUNT);
        let block_count = clamp_count(Some(&blocks.count.to_string()), BLOCK_COUNT);
        let blocks = BlockSpec {
            count: block_count.value,
            ..blocks
        };
        Self {
            classroom_count,
            block_count,
            settings: SettingsUpdate::default(),
            blocks,
            cells: CellFields::new(),
        }
    }

    pub fn with_settings(mut self, settings: SettingsUpdate) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_cells(mut self, cells: CellFields) -> Self {
        self.cells = cells;
        self
    }

    /// Decode a submitted block form
    pub fn decode(form: &FormData) -> Self {
        let classroom_count = clamp_count(non_blank(form, "num_classrooms"), CLASSROOM_COUNT);
        let block_count = clamp_count(non_blank(form, "block_count"), BLOCK_COUNT);

        let mut blocks = BlockSpec::new(block_count.value);
        for (key, value) in form {
            if let Some(index) = parse_block_key(key, "start_") {
                blocks.starts.insert(index, value.clone());
            } else if let Some(index) = parse_block_key(key, "end_") {
                blocks.ends.insert(index, value.clone());
            }
        }

        Self {
            classroom_count,
            block_count,
            settings: SettingsUpdate {
                session_length: non_blank(form, "session_length").map(str::to_string),
                break_minutes: non_blank(form, "break_minutes").map(str::to_string),
            },
            blocks,
            cells: CellFields::decode(form),
        }
    }
}

/// Session-content write: rename rooms and refill cells against current blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionForm {
    pub room_names: BTreeMap<u32, String>,
    pub cells: CellFields,
}

impl SessionForm {
    pub fn decode(form: &FormData) -> Self {
        let room_names = form
            .iter()
            .filter_map(|(key, value)| {
                let id = key.strip_prefix("roomname_")?.parse::<u32>().ok()?;
                Some((id, value.clone()))
            })
            .collect();

        Self {
            room_names,
            cells: CellFields::decode(form),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellField {
    Title,
    Presenter,
    Description,
}

fn non_blank<'a>(form: &'a FormData, key: &str) -> Option<&'a str> {
    form.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// `start_3` -> index 2; `start_0` and non-numeric suffixes are ignored
fn parse_block_key(key: &str, prefix: &str) -> Option<usize> {
    let n: usize = key.strip_prefix(prefix)?.parse().ok()?;
    n.checked_sub(1)
}

/// `title_2_0` -> (Title, 2, 0)
fn parse_cell_key(key: &str) -> Option<(CellField, u32, usize)> {
    let (field, rest) = if let Some(rest) = key.strip_prefix("title_") {
        (CellField::Title, rest)
    } else if let Some(rest) = key.strip_prefix("presenter_") {
        (CellField::Presenter, rest)
    } else if let Some(rest) = key.strip_prefix("desc_") {
        (CellField::Description, rest)
    } else {
        return None;
    };

    let (classroom, index) = rest.split_once('_')?;
    Some((field, classroom.parse().ok()?, index.parse().ok()?))
}
