use serde::{Deserialize, Serialize};

use crate::errors::SchedulerError;

/// Default session length when nothing is stored
pub const DEFAULT_SESSION_LENGTH_MINUTES: u32 = 45;

/// Default break between blocks when nothing is stored
pub const DEFAULT_BREAK_MINUTES: u32 = 15;

/// The two bounded integers that drive block generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Length of a generated block, in `[20, 300]`
    pub session_length_minutes: u32,

    /// Gap between a block's end and the next derived start, in `[0, 120]`
    pub break_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session_length_minutes: DEFAULT_SESSION_LENGTH_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

/// Keys of the persisted settings rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingKey {
    SessionLength,
    Break,
}

impl SettingKey {
    pub const ALL: [SettingKey; 2] = [SettingKey::SessionLength, SettingKey::Break];

    /// Key as stored in the `settings` table
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::SessionLength => "session_length_minutes",
            SettingKey::Break => "break_minutes",
        }
    }

    /// Parse a stored key
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "session_length_minutes" => Some(SettingKey::SessionLength),
            "break_minutes" => Some(SettingKey::Break),
            _ => None,
        }
    }

    /// Inclusive bounds
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            SettingKey::SessionLength => (20, 300),
            SettingKey::Break => (0, 120),
        }
    }

    pub fn default_value(&self) -> u32 {
        match self {
            SettingKey::SessionLength => DEFAULT_SESSION_LENGTH_MINUTES,
            SettingKey::Break => DEFAULT_BREAK_MINUTES,
        }
    }

    /// Parse and bounds-check a raw value for this key
    pub fn validate(&self, raw: &str) -> Result<u32, RejectReason> {
        let value: i64 = raw.trim().parse().map_err(|_| RejectReason::NotAnInteger {
            raw: raw.to_string(),
        })?;
        let (min, max) = self.bounds();
        if value < i64::from(min) || value > i64::from(max) {
            return Err(RejectReason::OutOfBounds { value, min, max });
        }
        // In range, so it fits in u32.
        Ok(value as u32)
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a settings update was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    UnknownKey { key: String },
    NotAnInteger { raw: String },
    OutOfBounds { value: i64, min: u32, max: u32 },
}

impl RejectReason {
    /// Domain error for a dropped update of `key`, used when logging it
    pub fn into_error(self, key: &str) -> SchedulerError {
        match self {
            RejectReason::UnknownKey { key } => SchedulerError::UnknownSetting { key },
            RejectReason::NotAnInteger { raw } => SchedulerError::InvalidValue {
                field: key.to_string(),
                reason: format!("'{}' is not an integer", raw),
            },
            RejectReason::OutOfBounds { value, min, max } => SchedulerError::InvalidValue {
                field: key.to_string(),
                reason: format!("{} is outside [{}, {}]", value, min, max),
            },
        }
    }
}

/// Result of `Settings::update`
///
/// A rejected update leaves the previous value in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SettingOutcome {
    Applied { key: SettingKey, value: u32 },
    Rejected(RejectReason),
}

impl SettingOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SettingOutcome::Applied { .. })
    }
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> u32 {
        match key {
            SettingKey::SessionLength => self.session_length_minutes,
            SettingKey::Break => self.break_minutes,
        }
    }

    fn set(&mut self, key: SettingKey, value: u32) {
        match key {
            SettingKey::SessionLength => self.session_length_minutes = value,
            SettingKey::Break => self.break_minutes = value,
        }
    }

    /// Apply a raw update by stored key name
    ///
    /// Unknown keys, unparseable values and out-of-bounds values are rejected
    /// and the current value is kept.
    pub fn update(&mut self, key: &str, raw: &str) -> SettingOutcome {
        match SettingKey::from_key(key) {
            Some(key) => self.update_key(key, raw),
            None => SettingOutcome::Rejected(RejectReason::UnknownKey {
                key: key.to_string(),
            }),
        }
    }

    /// Apply a raw update for a known key
    pub fn update_key(&mut self, key: SettingKey, raw: &str) -> SettingOutcome {
        match key.validate(raw) {
            Ok(value) => {
                self.set(key, value);
                SettingOutcome::Applied { key, value }
            }
            Err(reason) => SettingOutcome::Rejected(reason),
        }
    }

    /// Build settings from stored rows
    ///
    /// Missing, unparseable or out-of-bounds rows fall back to the default.
    /// Rejected rows are returned with their key so the caller can report them.
    pub fn from_stored<'a, I>(rows: I) -> (Self, Vec<(String, RejectReason)>)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut settings = Settings::default();
        let mut rejected = Vec::new();
        for (key, raw) in rows {
            if let SettingOutcome::Rejected(reason) = settings.update(key, raw) {
                rejected.push((key.to_string(), reason));
            }
        }
        (settings, rejected)
    }
}
