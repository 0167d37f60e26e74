//! SQLite repository
//!
//! Every table is written by full replace: delete all rows, reinsert the
//! cache contents, one transaction per table. A row that fails to insert is
//! logged and skipped; the rest of the table still commits.

use std::collections::BTreeMap;

use crate::errors::{from_rusqlite, replace_failed, Result};
use crate::settings::SettingsStore;
use rusqlite::{Connection, Statement};
use scheduler_core::model::{Block, Classroom, Session};
use scheduler_core::ops::ScheduleState;
use scheduler_core_types::schema::FIELD_TABLE;
use serde::Serialize;

/// Persisted tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Classrooms,
    Sessions,
    Blocks,
    Settings,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Classrooms => "classrooms",
            Table::Sessions => "sessions",
            Table::Blocks => "blocks",
            Table::Settings => "settings",
        }
    }
}

/// Rows written and skipped for one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub table: Table,
    pub written: usize,
    pub skipped: usize,
}

/// A table whose replace did not commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFailure {
    pub table: Table,
    pub code: String,
    pub message: String,
}

/// Outcome of persisting a cache image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersistReport {
    pub tables: Vec<TableReport>,
    pub failures: Vec<TableFailure>,
}

impl PersistReport {
    /// No failed tables and no skipped rows
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.tables.iter().all(|t| t.skipped == 0)
    }

    pub fn table(&self, table: Table) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == table)
    }

    pub fn failed(&self, table: Table) -> bool {
        self.failures.iter().any(|f| f.table == table)
    }

    fn record(&mut self, table: Table, result: Result<TableReport>) {
        match result {
            Ok(report) => self.tables.push(report),
            Err(err) => self.failures.push(TableFailure {
                table,
                code: err.kind().code().to_string(),
                message: err.message().to_string(),
            }),
        }
    }
}

/// SQLite repository for the schedule tables
pub struct SqliteRepo;

impl SqliteRepo {
    /// Replace every classroom row
    pub fn replace_classrooms(
        conn: &mut Connection,
        classrooms: &BTreeMap<u32, Classroom>,
    ) -> Result<TableReport> {
        replace_table(
            conn,
            Table::Classrooms,
            "INSERT INTO classrooms (id, name) VALUES (?1, ?2)",
            classrooms.values(),
            |stmt, c| stmt.execute(rusqlite::params![c.id, c.name]),
        )
    }

    /// Replace every session row
    ///
    /// Rows go in per classroom in block order, so the autoincrement id
    /// preserves that order on reload.
    pub fn replace_sessions(
        conn: &mut Connection,
        sessions: &BTreeMap<u32, Vec<Session>>,
    ) -> Result<TableReport> {
        replace_table(
            conn,
            Table::Sessions,
            "INSERT INTO sessions (classroom_id, start_time, end_time, title, presenter, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            sessions.values().flatten(),
            |stmt, s| {
                stmt.execute(rusqlite::params![
                    s.classroom_id,
                    s.start,
                    s.end,
                    s.title,
                    s.presenter,
                    s.description,
                ])
            },
        )
    }

    /// Replace every block row
    pub fn replace_blocks(conn: &mut Connection, blocks: &[Block]) -> Result<TableReport> {
        replace_table(
            conn,
            Table::Blocks,
            "INSERT INTO blocks (id, start_time, end_time) VALUES (?1, ?2, ?3)",
            blocks.iter(),
            |stmt, b| stmt.execute(rusqlite::params![b.id, b.start, b.end]),
        )
    }

    /// Persist the listed tables from a cache image
    ///
    /// Each table is independent: a failed table is recorded in the report
    /// and the remaining tables are still written.
    pub fn persist_tables(
        conn: &mut Connection,
        image: &ScheduleState,
        tables: &[Table],
    ) -> PersistReport {
        let mut report = PersistReport::default();
        for &table in tables {
            let result = match table {
                Table::Classrooms => Self::replace_classrooms(conn, &image.classrooms),
                Table::Sessions => Self::replace_sessions(conn, &image.sessions),
                Table::Blocks => Self::replace_blocks(conn, &image.blocks),
                Table::Settings => SettingsStore::save_all(conn, &image.settings),
            };
            report.record(table, result);
        }
        report
    }

    /// Row count of one table
    pub fn count_rows(conn: &Connection, table: Table) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(from_rusqlite)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn replace_table<'a, T: 'a>(
    conn: &mut Connection,
    table: Table,
    insert_sql: &str,
    rows: impl Iterator<Item = &'a T>,
    mut insert: impl FnMut(&mut Statement<'_>, &T) -> rusqlite::Result<usize>,
) -> Result<TableReport> {
    let name = table.as_str();
    let tx = conn.transaction().map_err(|e| replace_failed(name, e))?;

    tx.execute(&format!("DELETE FROM {}", name), [])
        .map_err(|e| replace_failed(name, e))?;

    let mut written = 0;
    let mut skipped = 0;
    {
        let mut stmt = tx.prepare(insert_sql).map_err(|e| replace_failed(name, e))?;
        for row in rows {
            match insert(&mut stmt, row) {
                Ok(_) => written += 1,
                Err(err) => {
                    skipped += 1;
                    tracing::warn!(
                        { FIELD_TABLE } = name,
                        error = %err,
                        "row insert failed, skipping"
                    );
                }
            }
        }
    }

    tx.commit().map_err(|e| replace_failed(name, e))?;

    Ok(TableReport {
        table,
        written,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_replace_classrooms_drops_stale_rows() {
        let mut conn = setup();
        let mut classrooms = BTreeMap::new();
        for id in 1..=3 {
            classrooms.insert(id, Classroom::with_default_name(id));
        }
        SqliteRepo::replace_classrooms(&mut conn, &classrooms).unwrap();

        classrooms.remove(&3);
        let report = SqliteRepo::replace_classrooms(&mut conn, &classrooms).unwrap();
        assert_eq!(report.written, 2);
        assert_eq!(SqliteRepo::count_rows(&conn, Table::Classrooms).unwrap(), 2);
    }

    #[test]
    fn test_failed_row_is_skipped() {
        let mut conn = setup();
        conn.execute_batch(
            "CREATE TRIGGER reject_second_block BEFORE INSERT ON blocks
             WHEN NEW.id = 2 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

        let blocks = vec![
            Block::new(1, "08:00", "08:45"),
            Block::new(2, "09:00", "09:45"),
            Block::new(3, "10:00", "10:45"),
        ];
        let report = SqliteRepo::replace_blocks(&mut conn, &blocks).unwrap();
        assert_eq!(report.written, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(SqliteRepo::count_rows(&conn, Table::Blocks).unwrap(), 2);
    }

    #[test]
    fn test_missing_table_fails_only_that_table() {
        let mut conn = setup();
        conn.execute_batch("DROP TABLE sessions").unwrap();

        let mut image = ScheduleState::default();
        image.classrooms.insert(1, Classroom::with_default_name(1));
        let block = Block::new(1, "08:00", "08:45");
        image.sessions.insert(1, vec![Session::empty(1, &block)]);
        image.blocks.push(block);

        let report = SqliteRepo::persist_tables(
            &mut conn,
            &image,
            &[Table::Classrooms, Table::Sessions, Table::Blocks],
        );
        assert!(report.failed(Table::Sessions));
        assert_eq!(report.failures[0].code, "ERR_PERSISTENCE");
        assert_eq!(report.table(Table::Classrooms).map(|t| t.written), Some(1));
        assert_eq!(report.table(Table::Blocks).map(|t| t.written), Some(1));
        assert!(!report.is_clean());
    }
}
