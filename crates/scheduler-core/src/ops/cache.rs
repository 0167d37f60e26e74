use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use scheduler_core_types::schema::{FIELD_BLOCK_COUNT, FIELD_CLASSROOM_COUNT, FIELD_SESSION_COUNT};
use serde::Serialize;

use crate::form::{BlockForm, CellFields, SessionForm};
use crate::model::{Block, Classroom, Session, SettingKey, SettingOutcome, Settings};
use crate::ops::block_generator::{generate_blocks_with_report, BlockReport};
use crate::rules::BoundedCount;
use crate::snapshot::{sorted_by_start, ClassroomView, Snapshot};

/// Classrooms shown by editing forms when none exist yet
pub const DEFAULT_EDITOR_CLASSROOMS: u32 = 3;

/// Everything the cache holds, as one unit behind one lock
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleState {
    pub classrooms: BTreeMap<u32, Classroom>,
    /// Sessions per classroom in block order
    pub sessions: BTreeMap<u32, Vec<Session>>,
    pub blocks: Vec<Block>,
    pub settings: Settings,
}

impl ScheduleState {
    pub fn session_count(&self) -> usize {
        self.sessions.values().map(Vec::len).sum()
    }

    /// Current classroom count, or the editor default when there are none
    fn editor_classroom_count(&self) -> u32 {
        if self.classrooms.is_empty() {
            DEFAULT_EDITOR_CLASSROOMS
        } else {
            self.classrooms.len() as u32
        }
    }

    /// One session per (classroom, block) for classrooms `1..=classroom_count`
    fn rebuild_sessions(&mut self, classroom_count: u32, cells: &CellFields) -> usize {
        let mut sessions = BTreeMap::new();
        for classroom_id in 1..=classroom_count {
            let list: Vec<Session> = self
                .blocks
                .iter()
                .enumerate()
                .map(|(index, block)| match cells.get(classroom_id, index) {
                    Some(cell) => Session::for_block(
                        classroom_id,
                        block,
                        cell.title.trim(),
                        cell.presenter.trim(),
                        cell.description.trim(),
                    ),
                    None => Session::empty(classroom_id, block),
                })
                .collect();
            sessions.insert(classroom_id, list);
        }
        self.sessions = sessions;
        self.session_count()
    }
}

/// What a cache write did, plus the post-write state to persist
#[derive(Debug, Clone)]
pub struct CacheWrite<R> {
    pub report: R,
    /// Copy of the state taken before the write lock was released
    pub image: ScheduleState,
}

/// Per-field account of a `replace_all`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaceAllReport {
    pub classroom_count: BoundedCount,
    pub block_count: BoundedCount,
    pub session_length: Option<SettingOutcome>,
    pub break_minutes: Option<SettingOutcome>,
    pub blocks: Vec<BlockReport>,
    pub sessions_built: usize,
}

/// Per-field account of an `update_sessions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionsReport {
    pub classroom_count: u32,
    pub created: Vec<u32>,
    pub renamed: Vec<u32>,
    pub sessions_built: usize,
    pub scheduled: usize,
}

/// The in-process schedule cache
///
/// Classrooms, sessions, blocks and settings share a single reader/writer lock,
/// so a reader sees either the state before a write or the state after it,
/// never a mix. Every write replaces whole collections, which is why a poisoned
/// lock is recovered rather than propagated.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    state: RwLock<ScheduleState>,
}

impl ScheduleCache {
    pub fn new(state: ScheduleState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ScheduleState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ScheduleState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ordered copy of the whole schedule
    pub fn read_snapshot(&self) -> Snapshot {
        let state = self.read();
        Snapshot::from_state(&state)
    }

    /// One classroom with its sessions sorted by start
    ///
    /// # Errors
    ///
    /// Returns `ClassroomNotFound` for an unknown id.
    pub fn classroom(&self, classroom_id: u32) -> crate::errors::Result<ClassroomView> {
        let (classroom, sessions) = {
            let state = self.read();
            let classroom = state.classrooms.get(&classroom_id).cloned();
            let sessions = state.sessions.get(&classroom_id).cloned().unwrap_or_default();
            (classroom, sessions)
        };

        let classroom = classroom
            .ok_or(crate::errors::SchedulerError::ClassroomNotFound { classroom_id })?;
        Ok(ClassroomView {
            classroom,
            sessions: sorted_by_start(&sessions),
        })
    }

    /// Classroom list for editing forms: the current classrooms, or default
    /// placeholders when none exist yet
    pub fn editor_view(&self) -> Vec<Classroom> {
        let state = self.read();
        (1..=state.editor_classroom_count())
            .map(|id| {
                state
                    .classrooms
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| Classroom::with_default_name(id))
            })
            .collect()
    }

    pub fn settings(&self) -> Settings {
        self.read().settings
    }

    /// Copy of the full state
    pub fn state(&self) -> ScheduleState {
        self.read().clone()
    }

    /// Rebuild classrooms, blocks and sessions from a block form
    ///
    /// The returned image is copied before the write lock is released; the
    /// caller persists it after the lock is gone.
    pub fn replace_all(&self, form: &BlockForm) -> CacheWrite<ReplaceAllReport> {
        let mut state = self.write();

        let session_length = form
            .settings
            .session_length
            .as_deref()
            .map(|raw| state.settings.update_key(SettingKey::SessionLength, raw));
        let break_minutes = form
            .settings
            .break_minutes
            .as_deref()
            .map(|raw| state.settings.update_key(SettingKey::Break, raw));

        let classroom_count = form.classroom_count.value;
        let classrooms: BTreeMap<u32, Classroom> = (1..=classroom_count)
            .map(|id| {
                let classroom = state
                    .classrooms
                    .remove(&id)
                    .unwrap_or_else(|| Classroom::with_default_name(id));
                (id, classroom)
            })
            .collect();
        state.classrooms = classrooms;

        let generated = generate_blocks_with_report(&form.blocks, &state.settings);
        state.blocks = generated.blocks;

        let sessions_built = state.rebuild_sessions(classroom_count, &form.cells);

        tracing::debug!(
            { FIELD_CLASSROOM_COUNT } = classroom_count,
            { FIELD_BLOCK_COUNT } = state.blocks.len(),
            { FIELD_SESSION_COUNT } = sessions_built,
            "cache replaced"
        );

        let write = CacheWrite {
            report: ReplaceAllReport {
                classroom_count: form.classroom_count.clone(),
                block_count: form.block_count.clone(),
                session_length,
                break_minutes,
                blocks: generated.report,
                sessions_built,
            },
            image: state.clone(),
        };
        drop(state);
        write
    }

    /// Rename classrooms and refill session content against the current blocks
    pub fn update_sessions(&self, form: &SessionForm) -> CacheWrite<SessionsReport> {
        let mut state = self.write();
        let classroom_count = state.editor_classroom_count();

        let mut created = Vec::new();
        let mut renamed = Vec::new();
        for id in 1..=classroom_count {
            let classroom = state.classrooms.entry(id).or_insert_with(|| {
                created.push(id);
                Classroom::with_default_name(id)
            });
            if let Some(name) = form.room_names.get(&id) {
                let name = name.trim();
                if !name.is_empty() && name != classroom.name {
                    classroom.name = name.to_string();
                    renamed.push(id);
                }
            }
        }

        let sessions_built = state.rebuild_sessions(classroom_count, &form.cells);
        let scheduled = state
            .sessions
            .values()
            .flatten()
            .filter(|s| s.is_scheduled())
            .count();

        let write = CacheWrite {
            report: SessionsReport {
                classroom_count,
                created,
                renamed,
                sessions_built,
                scheduled,
            },
            image: state.clone(),
        };
        drop(state);
        write
    }

    /// Apply one raw settings update; blocks are not regenerated
    pub fn update_setting(&self, key: &str, raw: &str) -> CacheWrite<SettingOutcome> {
        let mut state = self.write();
        let outcome = state.settings.update(key, raw);
        let write = CacheWrite {
            report: outcome,
            image: state.clone(),
        };
        drop(state);
        write
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::CellInput;
    use crate::ops::block_generator::BlockSpec;

    #[test]
    fn test_replace_all_two_by_two() {
        let cache = ScheduleCache::default();
        let write = cache.replace_all(&BlockForm::new(2, BlockSpec::new(2)));
        assert_eq!(write.report.sessions_built, 4);

        let snapshot = cache.read_snapshot();
        assert_eq!(snapshot.classrooms.len(), 2);
        assert_eq!(snapshot.session_count(), 4);
        for classroom in &snapshot.classrooms {
            let sessions = snapshot.sessions_for(classroom.id);
            assert_eq!(sessions.len(), 2);
            for (session, block) in sessions.iter().zip(&snapshot.blocks) {
                assert_eq!(session.start, block.start);
                assert_eq!(session.end, block.end);
            }
        }
    }

    #[test]
    fn test_replace_all_preserves_names_and_drops_stale_rooms() {
        let mut state = ScheduleState::default();
        for id in 1..=4 {
            state.classrooms.insert(id, Classroom::new(id, format!("Room {}", id * 10)));
        }
        state.sessions.insert(4, Vec::new());
        let cache = ScheduleCache::new(state);

        cache.replace_all(&BlockForm::new(2, BlockSpec::new(1)));
        let snapshot = cache.read_snapshot();
        let names: Vec<&str> = snapshot.classrooms.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Room 10", "Room 20"]);
        assert!(!snapshot.sessions_by_classroom.contains_key(&4));

        cache.replace_all(&BlockForm::new(3, BlockSpec::new(1)));
        assert_eq!(cache.read_snapshot().classrooms[2].name, "Classroom 3");
    }

    #[test]
    fn test_replace_all_fills_cells_trimmed() {
        let mut cells = CellFields::new();
        cells.insert(1, 1, CellInput::new("  Robots ", " Ada", "Gears"));
        let cache = ScheduleCache::default();
        cache.replace_all(&BlockForm::new(1, BlockSpec::new(2)).with_cells(cells));

        let view = cache.classroom(1).unwrap();
        assert_eq!(view.sessions[0].title, "");
        assert_eq!(view.sessions[1].title, "Robots");
        assert_eq!(view.sessions[1].presenter, "Ada");
        assert!(view.sessions[1].is_scheduled());
    }

    #[test]
    fn test_write_releases_lock_before_returning() {
        let cache = ScheduleCache::default();
        let write = cache.replace_all(&BlockForm::new(1, BlockSpec::new(1)));
        assert!(cache.state.try_write().is_ok());
        assert_eq!(write.image, cache.state());
    }

    #[test]
    fn test_update_sessions_uses_current_blocks_and_default_count() {
        let cache = ScheduleCache::default();
        let mut form = SessionForm::default();
        form.room_names.insert(2, "Theater".to_string());

        let write = cache.update_sessions(&form);
        assert_eq!(write.report.classroom_count, DEFAULT_EDITOR_CLASSROOMS);
        assert_eq!(write.report.created, vec![1, 2, 3]);
        assert_eq!(write.report.renamed, vec![2]);
        // No blocks yet, so no sessions.
        assert_eq!(write.report.sessions_built, 0);
        assert_eq!(cache.classroom(2).unwrap().classroom.name, "Theater");
    }

    #[test]
    fn test_editor_view_placeholders() {
        let cache = ScheduleCache::default();
        let names: Vec<String> = cache.editor_view().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Classroom 1", "Classroom 2", "Classroom 3"]);
    }

    #[test]
    fn test_update_setting_keeps_blocks() {
        let cache = ScheduleCache::default();
        cache.replace_all(&BlockForm::new(1, BlockSpec::new(2)));
        let before = cache.read_snapshot().blocks;

        let write = cache.update_setting("session_length_minutes", "90");
        assert!(write.report.is_applied());
        assert_eq!(cache.settings().session_length_minutes, 90);
        assert_eq!(cache.read_snapshot().blocks, before);
    }
}
