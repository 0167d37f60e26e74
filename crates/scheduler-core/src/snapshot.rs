//! Read surface handed to renderers
//!
//! A snapshot is a plain owned copy: it is built under the cache's read lock
//! and the lock is gone by the time anyone renders it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{Result, SchedulerError};
use crate::model::{Block, Classroom, Session, Settings};
use crate::ops::cache::ScheduleState;

/// Ordered copy of the whole schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Sorted by id ascending
    pub classrooms: Vec<Classroom>,
    /// Each list sorted by start time ascending
    pub sessions_by_classroom: BTreeMap<u32, Vec<Session>>,
    /// Sorted by id ascending
    pub blocks: Vec<Block>,
    pub settings: Settings,
}

/// One classroom with its sessions in start order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassroomView {
    pub classroom: Classroom,
    pub sessions: Vec<Session>,
}

impl Snapshot {
    pub(crate) fn from_state(state: &ScheduleState) -> Self {
        let classrooms: Vec<Classroom> = state.classrooms.values().cloned().collect();

        let sessions_by_classroom = state
            .sessions
            .iter()
            .map(|(id, sessions)| (*id, sorted_by_start(sessions)))
            .collect();

        let mut blocks = state.blocks.clone();
        blocks.sort_by_key(|b| b.id);

        Self {
            classrooms,
            sessions_by_classroom,
            blocks,
            settings: state.settings,
        }
    }

    /// Sessions for one classroom; empty when it has none
    pub fn sessions_for(&self, classroom_id: u32) -> &[Session] {
        self.sessions_by_classroom
            .get(&classroom_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Classroom detail view
    ///
    /// # Errors
    ///
    /// Returns `ClassroomNotFound` when the id is not in the snapshot.
    pub fn classroom(&self, classroom_id: u32) -> Result<ClassroomView> {
        let classroom = self
            .classrooms
            .iter()
            .find(|c| c.id == classroom_id)
            .cloned()
            .ok_or(SchedulerError::ClassroomNotFound { classroom_id })?;

        Ok(ClassroomView {
            classroom,
            sessions: self.sessions_for(classroom_id).to_vec(),
        })
    }

    /// Total sessions across all classrooms
    pub fn session_count(&self) -> usize {
        self.sessions_by_classroom.values().map(Vec::len).sum()
    }
}

/// Stable sort by `HH:MM` start; zero-padded strings order the same as times
pub(crate) fn sorted_by_start(sessions: &[Session]) -> Vec<Session> {
    let mut sorted = sessions.to_vec();
    sorted.sort_by(|a, b| a.start.cmp(&b.start));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ScheduleState {
        let b1 = Block::new(1, "08:00", "08:45");
        let b2 = Block::new(2, "09:00", "09:45");
        let mut state = ScheduleState::default();
        state.classrooms.insert(2, Classroom::with_default_name(2));
        state.classrooms.insert(1, Classroom::new(1, "Theater"));
        state.sessions.insert(
            1,
            vec![
                Session::for_block(1, &b2, "Second", "Bo", ""),
                Session::for_block(1, &b1, "First", "Ada", ""),
            ],
        );
        state.blocks = vec![b2, b1];
        state
    }

    #[test]
    fn test_snapshot_orders_everything() {
        let snapshot = Snapshot::from_state(&state());
        let ids: Vec<u32> = snapshot.classrooms.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
        let block_ids: Vec<u32> = snapshot.blocks.iter().map(|b| b.id).collect();
        assert_eq!(block_ids, vec![1, 2]);
        let titles: Vec<&str> = snapshot
            .sessions_for(1)
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_classroom_view() {
        let snapshot = Snapshot::from_state(&state());
        let view = snapshot.classroom(1).unwrap();
        assert_eq!(view.classroom.name, "Theater");
        assert_eq!(view.sessions.len(), 2);

        let empty = snapshot.classroom(2).unwrap();
        assert!(empty.sessions.is_empty());

        assert_eq!(
            snapshot.classroom(9),
            Err(SchedulerError::ClassroomNotFound { classroom_id: 9 })
        );
    }

    #[test]
    fn test_blocks_past_midnight_sort_first() {
        use crate::ops::block_generator::{generate_blocks, BlockSpec};

        let blocks = generate_blocks(&BlockSpec::new(20), &Settings::default());
        let mut state = ScheduleState::default();
        state.classrooms.insert(1, Classroom::with_default_name(1));
        state.sessions.insert(
            1,
            blocks
                .iter()
                .map(|b| Session::for_block(1, b, format!("Block {}", b.id), "", ""))
                .collect(),
        );
        state.blocks = blocks;

        let snapshot = Snapshot::from_state(&state);
        let sessions = snapshot.sessions_for(1);
        // Block 17 wraps to 00:00, so blocks 17..=20 come before block 1
        let titles: Vec<&str> = sessions.iter().take(5).map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Block 17", "Block 18", "Block 19", "Block 20", "Block 1"]);
        assert_eq!(sessions[0].start, "00:00");
        // Blocks themselves stay in id order
        assert_eq!(snapshot.blocks[0].start, "08:00");
    }
}
