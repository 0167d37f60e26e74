//! `HH:MM` time-of-day parsing, formatting and minute arithmetic
//!
//! Arithmetic wraps at midnight; the schedule has no notion of days.

use chrono::{Duration, NaiveTime};

/// chrono format string for block times
pub const TIME_FORMAT: &str = "%H:%M";

/// Start of the first block when no override is given
pub const DAY_START: &str = "08:00";

/// Parse a 24-hour `HH:MM` string, ignoring surrounding whitespace
pub fn parse(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()
}

/// Format as zero-padded `HH:MM`
pub fn format(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// `time + minutes`, wrapping past midnight
pub fn add_minutes(time: NaiveTime, minutes: u32) -> NaiveTime {
    let (wrapped, _days) = time.overflowing_add_signed(Duration::minutes(i64::from(minutes)));
    wrapped
}

/// The default first-block start
pub fn day_start() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        let t = parse("09:05").unwrap();
        assert_eq!(format(t), "09:05");
        assert_eq!(format(parse(" 13:30 ").unwrap()), "13:30");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("").is_none());
        assert!(parse("noon").is_none());
        assert!(parse("25:00").is_none());
        assert!(parse("10:75").is_none());
    }

    #[test]
    fn test_add_minutes_wraps_midnight() {
        let t = parse("23:30").unwrap();
        assert_eq!(format(add_minutes(t, 45)), "00:15");
    }

    #[test]
    fn test_day_start_matches_constant() {
        assert_eq!(format(day_start()), DAY_START);
    }
}
