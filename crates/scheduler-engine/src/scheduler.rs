//! The scheduler service
//!
//! Lock order is always connection mutex, then cache write lock. A writer
//! claims the connection first, so writers are serialised and write-backs
//! reach storage in the order the writes hit the cache. The cache lock is
//! released before any storage I/O, so readers never wait on SQLite; only
//! other writers queue behind a slow write-back.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use rusqlite::Connection;
use scheduler_core::form::{BlockForm, FormData, SessionForm};
use scheduler_core::model::{Classroom, SettingKey, SettingOutcome};
use scheduler_core::ops::{ReplaceAllReport, ScheduleCache, ScheduleState, SessionsReport};
use scheduler_core::snapshot::ClassroomView;
use scheduler_core::{log_op_end, log_op_error, log_op_start, ExError, ExErrorKind, Snapshot};
use scheduler_core_types::schema::{
    FIELD_BLOCK_COUNT, FIELD_CLASSROOM_COUNT, FIELD_ERR_CODE, FIELD_OP, FIELD_REQUEST_ID,
    FIELD_SESSION_COUNT, FIELD_SETTING_KEY, FIELD_TABLE,
};
use scheduler_core_types::RequestId;
use scheduler_store::errors::Result;
use scheduler_store::repo::hydration::load_schedule;
use scheduler_store::{db, PersistReport, SqliteRepo, Table};

use crate::report::WriteReport;

pub struct Scheduler {
    cache: Arc<ScheduleCache>,
    conn: Mutex<Connection>,
}

impl Scheduler {
    /// Open (creating if needed) the database at `path` and run the startup load
    ///
    /// # Errors
    ///
    /// Any storage error while opening, migrating or loading. Startup cannot
    /// continue past one.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = db::open_ready(path)?;
        Self::startup(conn)
    }

    /// Run the startup load over an already migrated connection
    ///
    /// # Errors
    ///
    /// Any storage error during the load, including seeding the default blocks.
    pub fn startup(mut conn: Connection) -> Result<Self> {
        log_op_start!("startup");
        let start = Instant::now();

        let state = load_schedule(&mut conn).map_err(|e| {
            log_op_error!(
                "startup",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "startup",
            duration_ms = start.elapsed().as_millis() as u64,
            { FIELD_CLASSROOM_COUNT } = state.classrooms.len(),
            { FIELD_BLOCK_COUNT } = state.blocks.len(),
            { FIELD_SESSION_COUNT } = state.session_count()
        );

        Ok(Self {
            cache: Arc::new(ScheduleCache::new(state)),
            conn: Mutex::new(conn),
        })
    }

    /// Shared handle to the cache, for readers that outlive a borrow of `self`
    pub fn cache(&self) -> Arc<ScheduleCache> {
        Arc::clone(&self.cache)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.cache.read_snapshot()
    }

    /// # Errors
    ///
    /// `ClassroomNotFound` for an unknown id.
    pub fn classroom(&self, classroom_id: u32) -> scheduler_core::Result<ClassroomView> {
        self.cache.classroom(classroom_id)
    }

    pub fn editor_view(&self) -> Vec<Classroom> {
        self.cache.editor_view()
    }

    /// Decode and apply a submitted block form
    pub fn submit_block_form(&self, form: &FormData) -> WriteReport<ReplaceAllReport> {
        self.replace_all(&BlockForm::decode(form))
    }

    /// Decode and apply a submitted session form
    pub fn submit_session_form(&self, form: &FormData) -> WriteReport<SessionsReport> {
        self.update_sessions(&SessionForm::decode(form))
    }

    /// Rebuild classrooms, blocks and sessions, then write all of them back
    pub fn replace_all(&self, form: &BlockForm) -> WriteReport<ReplaceAllReport> {
        let request_id = RequestId::new();
        log_op_start!(
            "replace_all",
            { FIELD_REQUEST_ID } = request_id.as_str(),
            { FIELD_CLASSROOM_COUNT } = form.classroom_count.value,
            { FIELD_BLOCK_COUNT } = form.block_count.value
        );
        let start = Instant::now();

        let mut conn = self.lock_conn();
        let write = self.cache.replace_all(form);

        let setting_outcomes = [
            (SettingKey::SessionLength, &write.report.session_length),
            (SettingKey::Break, &write.report.break_minutes),
        ];
        let mut settings_changed = false;
        for (key, outcome) in setting_outcomes {
            match outcome {
                Some(outcome) if outcome.is_applied() => settings_changed = true,
                Some(outcome) => {
                    log_dropped_setting("replace_all", &request_id, key.as_str(), outcome)
                }
                None => {}
            }
        }
        let mut tables = vec![Table::Classrooms, Table::Blocks, Table::Sessions];
        if settings_changed {
            tables.push(Table::Settings);
        }

        let persist = write_back(&mut conn, "replace_all", &request_id, &write.image, &tables);
        drop(conn);

        log_op_end!(
            "replace_all",
            duration_ms = start.elapsed().as_millis() as u64,
            { FIELD_REQUEST_ID } = request_id.as_str(),
            { FIELD_SESSION_COUNT } = write.report.sessions_built,
            persisted = persist.is_clean()
        );

        WriteReport {
            request_id,
            applied: write.report,
            persist,
        }
    }

    /// Rename classrooms and refill session content, then write both back
    pub fn update_sessions(&self, form: &SessionForm) -> WriteReport<SessionsReport> {
        let request_id = RequestId::new();
        log_op_start!(
            "update_sessions",
            { FIELD_REQUEST_ID } = request_id.as_str(),
            room_names = form.room_names.len(),
            cells = form.cells.len()
        );
        let start = Instant::now();

        let mut conn = self.lock_conn();
        let write = self.cache.update_sessions(form);
        let persist = write_back(
            &mut conn,
            "update_sessions",
            &request_id,
            &write.image,
            &[Table::Classrooms, Table::Sessions],
        );
        drop(conn);

        log_op_end!(
            "update_sessions",
            duration_ms = start.elapsed().as_millis() as u64,
            { FIELD_REQUEST_ID } = request_id.as_str(),
            { FIELD_SESSION_COUNT } = write.report.sessions_built,
            scheduled = write.report.scheduled,
            persisted = persist.is_clean()
        );

        WriteReport {
            request_id,
            applied: write.report,
            persist,
        }
    }

    /// Apply one raw settings update; an accepted value is written back
    pub fn update_setting(&self, key: &str, raw: &str) -> WriteReport<SettingOutcome> {
        let request_id = RequestId::new();
        log_op_start!(
            "update_setting",
            { FIELD_REQUEST_ID } = request_id.as_str(),
            { FIELD_SETTING_KEY } = key
        );
        let start = Instant::now();

        let mut conn = self.lock_conn();
        let write = self.cache.update_setting(key, raw);

        let persist = if write.report.is_applied() {
            write_back(
                &mut conn,
                "update_setting",
                &request_id,
                &write.image,
                &[Table::Settings],
            )
        } else {
            log_dropped_setting("update_setting", &request_id, key, &write.report);
            PersistReport::default()
        };
        drop(conn);

        log_op_end!(
            "update_setting",
            duration_ms = start.elapsed().as_millis() as u64,
            { FIELD_REQUEST_ID } = request_id.as_str(),
            applied = write.report.is_applied()
        );

        WriteReport {
            request_id,
            applied: write.report,
            persist,
        }
    }

    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn log_dropped_setting(op: &str, request_id: &RequestId, key: &str, outcome: &SettingOutcome) {
    if let SettingOutcome::Rejected(reason) = outcome {
        let err = reason.clone().into_error(key);
        tracing::info!(
            { FIELD_OP } = op,
            { FIELD_REQUEST_ID } = request_id.as_str(),
            { FIELD_SETTING_KEY } = key,
            reason = %err,
            "setting update dropped"
        );
    }
}

/// Persist `tables` from `image`; failures are logged and reported, never raised
fn write_back(
    conn: &mut Connection,
    op: &str,
    request_id: &RequestId,
    image: &ScheduleState,
    tables: &[Table],
) -> PersistReport {
    let report = SqliteRepo::persist_tables(conn, image, tables);

    for failure in &report.failures {
        let err = ExError::new(ExErrorKind::Persistence)
            .with_op(op)
            .with_entity_id(failure.table.as_str())
            .with_request_id(request_id.clone())
            .with_message(failure.message.as_str());
        tracing::error!(
            { FIELD_OP } = op,
            { FIELD_REQUEST_ID } = request_id.as_str(),
            { FIELD_TABLE } = failure.table.as_str(),
            { FIELD_ERR_CODE } = failure.code.as_str(),
            error = %err,
            "write-back failed"
        );
    }
    for table in report.tables.iter().filter(|t| t.skipped > 0) {
        tracing::warn!(
            { FIELD_OP } = op,
            { FIELD_REQUEST_ID } = request_id.as_str(),
            { FIELD_TABLE } = table.table.as_str(),
            skipped = table.skipped,
            "write-back skipped rows"
        );
    }

    report
}
