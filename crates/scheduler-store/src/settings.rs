//! Settings store over the generic `settings(key, value)` table

use crate::errors::{from_rusqlite, Result};
use crate::repo::{Table, TableReport};
use rusqlite::{Connection, OptionalExtension};
use scheduler_core::model::{SettingKey, SettingOutcome, Settings};
use scheduler_core_types::schema::FIELD_SETTING_KEY;

pub struct SettingsStore;

impl SettingsStore {
    /// Load both settings
    ///
    /// A missing key is filled with its default and written back. A stored
    /// value that is unparseable or out of bounds is left in the table and the
    /// default is used in its place.
    pub fn load(conn: &Connection) -> Result<Settings> {
        let mut rows: Vec<(SettingKey, String)> = Vec::new();
        for key in SettingKey::ALL {
            match Self::get_raw(conn, key)? {
                Some(raw) => rows.push((key, raw)),
                None => {
                    let value = key.default_value();
                    Self::save(conn, key, value)?;
                    tracing::info!(
                        { FIELD_SETTING_KEY } = key.as_str(),
                        value,
                        "setting defaulted"
                    );
                }
            }
        }

        let (settings, rejected) =
            Settings::from_stored(rows.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        for (key, reason) in rejected {
            let err = reason.into_error(&key);
            tracing::warn!(
                { FIELD_SETTING_KEY } = key.as_str(),
                reason = %err,
                "stored setting invalid, using default"
            );
        }
        Ok(settings)
    }

    /// Stored text of one key; `None` when the row is missing
    ///
    /// A row holding NULL reads as an empty string, which then fails validation.
    pub fn get_raw(conn: &Connection, key: SettingKey) -> Result<Option<String>> {
        let value: Option<Option<String>> = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;
        Ok(value.map(Option::unwrap_or_default))
    }

    pub fn save(conn: &Connection, key: SettingKey, value: u32) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            rusqlite::params![key.as_str(), value.to_string()],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Write both settings rows
    pub fn save_all(conn: &Connection, settings: &Settings) -> Result<TableReport> {
        for key in SettingKey::ALL {
            Self::save(conn, key, settings.get(key))?;
        }
        Ok(TableReport {
            table: Table::Settings,
            written: SettingKey::ALL.len(),
            skipped: 0,
        })
    }

    /// Apply a raw update to `settings` and persist it when accepted
    ///
    /// A rejected update leaves both the in-memory value and the row alone.
    pub fn update(
        conn: &Connection,
        settings: &mut Settings,
        key: &str,
        raw: &str,
    ) -> Result<SettingOutcome> {
        let outcome = settings.update(key, raw);
        if let SettingOutcome::Applied { key, value } = outcome {
            Self::save(conn, key, value)?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use scheduler_core::logging_facility::test_capture::init_test_capture;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_load_fills_and_persists_defaults() {
        let conn = setup();
        let settings = SettingsStore::load(&conn).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(
            SettingsStore::get_raw(&conn, SettingKey::SessionLength).unwrap(),
            Some("45".to_string())
        );
        assert_eq!(
            SettingsStore::get_raw(&conn, SettingKey::Break).unwrap(),
            Some("15".to_string())
        );
    }

    #[test]
    fn test_update_round_trip() {
        let conn = setup();
        let mut settings = SettingsStore::load(&conn).unwrap();

        let outcome =
            SettingsStore::update(&conn, &mut settings, "session_length_minutes", "200").unwrap();
        assert!(outcome.is_applied());
        assert_eq!(SettingsStore::load(&conn).unwrap().session_length_minutes, 200);

        let outcome =
            SettingsStore::update(&conn, &mut settings, "session_length_minutes", "5").unwrap();
        assert!(!outcome.is_applied());
        assert_eq!(settings.session_length_minutes, 200);
        assert_eq!(SettingsStore::load(&conn).unwrap().session_length_minutes, 200);
    }

    #[test]
    fn test_unknown_key_is_not_persisted() {
        let conn = setup();
        let mut settings = Settings::default();
        SettingsStore::update(&conn, &mut settings, "lunch_minutes", "30").unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM settings WHERE key = 'lunch_minutes'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_invalid_stored_value_is_warned_once() {
        let capture = init_test_capture();
        let conn = setup();
        conn.execute(
            "INSERT INTO settings (key, value) VALUES ('session_length_minutes', '4321')",
            [],
        )
        .unwrap();

        SettingsStore::load(&conn).unwrap();

        let warnings = capture.count_events(|e| {
            e.level == tracing::Level::WARN
                && e.field("setting_key") == Some("session_length_minutes")
                && e.field("reason")
                    == Some("Invalid value for session_length_minutes: 4321 is outside [20, 300]")
        });
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_invalid_stored_value_uses_default_and_is_kept() {
        let conn = setup();
        conn.execute(
            "INSERT INTO settings (key, value) VALUES ('break_minutes', 'lots')",
            [],
        )
        .unwrap();

        let settings = SettingsStore::load(&conn).unwrap();
        assert_eq!(settings.break_minutes, 15);
        assert_eq!(
            SettingsStore::get_raw(&conn, SettingKey::Break).unwrap(),
            Some("lots".to_string())
        );
    }
}
