use serde::Serialize;

/// Inclusive bounds for a count field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBounds {
    pub min: u32,
    pub max: u32,
}

/// `block_count` accepts 1..=20
pub const BLOCK_COUNT: CountBounds = CountBounds { min: 1, max: 20 };

/// `num_classrooms` accepts 1..=30
pub const CLASSROOM_COUNT: CountBounds = CountBounds { min: 1, max: 30 };

/// What happened to one submitted field
///
/// Nothing here is ever surfaced as an error: every outcome still produces a
/// usable value, this only records how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FieldOutcome {
    /// Supplied and used as-is
    Applied,
    /// Not supplied, the default rule produced the value
    Absent,
    /// Supplied but out of range, pulled to the nearest bound
    Clamped { requested: i64, applied: i64 },
    /// Supplied but unparseable, the default rule produced the value
    Rejected { raw: String },
}

/// A count after clamping, with how it got there
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundedCount {
    pub value: u32,
    pub outcome: FieldOutcome,
}

/// Parse and clamp a raw count field
///
/// Blank and unparseable input count as 0 and therefore land on `min`.
pub fn clamp_count(raw: Option<&str>, bounds: CountBounds) -> BoundedCount {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return BoundedCount {
            value: bounds.min,
            outcome: FieldOutcome::Absent,
        };
    }

    match raw.parse::<i64>() {
        Ok(requested) => {
            let applied = requested.clamp(i64::from(bounds.min), i64::from(bounds.max));
            let outcome = if applied == requested {
                FieldOutcome::Applied
            } else {
                FieldOutcome::Clamped { requested, applied }
            };
            BoundedCount {
                value: applied as u32,
                outcome,
            }
        }
        Err(_) => BoundedCount {
            value: bounds.min,
            outcome: FieldOutcome::Rejected {
                raw: raw.to_string(),
            },
        },
    }
}
