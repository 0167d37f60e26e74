//! Hydration - the startup load from SQLite into a cache state
//!
//! Classrooms load by id, sessions by (classroom_id, id) so each classroom's
//! sessions come back in block order, blocks by id.

use std::collections::BTreeMap;

use crate::errors::{from_rusqlite, Result};
use crate::repo::SqliteRepo;
use crate::settings::SettingsStore;
use rusqlite::Connection;
use scheduler_core::model::{Block, Classroom, Session, Settings};
use scheduler_core::ops::{generate_blocks, BlockSpec, ScheduleState};
use scheduler_core_types::schema::FIELD_BLOCK_COUNT;

/// Blocks seeded into an empty database
pub const SEED_BLOCK_COUNT: u32 = 5;

/// The seed block set: five blocks generated with the default settings
pub fn default_blocks() -> Vec<Block> {
    generate_blocks(&BlockSpec::new(SEED_BLOCK_COUNT), &Settings::default())
}

pub fn load_classrooms(conn: &Connection) -> Result<BTreeMap<u32, Classroom>> {
    let mut stmt = conn
        .prepare("SELECT id, name FROM classrooms ORDER BY id")
        .map_err(from_rusqlite)?;

    let classrooms = stmt
        .query_map([], |row| {
            let id: u32 = row.get(0)?;
            let name: String = row.get(1)?;
            Ok((id, Classroom::new(id, name)))
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<BTreeMap<_, _>, _>>()
        .map_err(from_rusqlite)?;

    Ok(classrooms)
}

pub fn load_sessions(conn: &Connection) -> Result<BTreeMap<u32, Vec<Session>>> {
    let mut stmt = conn
        .prepare(
            "SELECT classroom_id, start_time, end_time, title, presenter, description
             FROM sessions ORDER BY classroom_id, id",
        )
        .map_err(from_rusqlite)?;

    let rows = stmt
        .query_map([], |row| {
            Ok(Session {
                classroom_id: row.get(0)?,
                start: row.get(1)?,
                end: row.get(2)?,
                title: row.get(3)?,
                presenter: row.get(4)?,
                description: row.get(5)?,
            })
        })
        .map_err(from_rusqlite)?;

    let mut sessions: BTreeMap<u32, Vec<Session>> = BTreeMap::new();
    for row in rows {
        let session = row.map_err(from_rusqlite)?;
        sessions.entry(session.classroom_id).or_default().push(session);
    }
    Ok(sessions)
}

pub fn load_blocks(conn: &Connection) -> Result<Vec<Block>> {
    let mut stmt = conn
        .prepare("SELECT id, start_time, end_time FROM blocks ORDER BY id")
        .map_err(from_rusqlite)?;

    let blocks = stmt
        .query_map([], |row| {
            Ok(Block::new(
                row.get::<_, u32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    Ok(blocks)
}

/// Full startup load
///
/// Seeds and persists the default blocks when the table is empty, then loads
/// the settings. Any error here is meant to stop startup.
pub fn load_schedule(conn: &mut Connection) -> Result<ScheduleState> {
    let classrooms = load_classrooms(conn)?;
    let sessions = load_sessions(conn)?;
    let mut blocks = load_blocks(conn)?;

    if blocks.is_empty() {
        blocks = default_blocks();
        let report = SqliteRepo::replace_blocks(conn, &blocks)?;
        tracing::info!({ FIELD_BLOCK_COUNT } = report.written, "seeded default blocks");
    }

    let settings = SettingsStore::load(conn)?;

    Ok(ScheduleState {
        classrooms,
        sessions,
        blocks,
        settings,
    })
}
