use serde::{Deserialize, Serialize};

/// Classroom - a room that hosts one session per block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    /// 1-based room number; ids are dense 1..N
    pub id: u32,

    /// Display name, never blank
    pub name: String,
}

impl Classroom {
    /// Create a classroom, falling back to the default name when `name` is blank
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            Self::default_name(id)
        } else {
            name
        };
        Self { id, name }
    }

    /// Create a classroom carrying the default name
    pub fn with_default_name(id: u32) -> Self {
        Self {
            id,
            name: Self::default_name(id),
        }
    }

    /// `"Classroom <id>"`
    pub fn default_name(id: u32) -> String {
        format!("Classroom {}", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_falls_back_to_default() {
        assert_eq!(Classroom::new(4, "   ").name, "Classroom 4");
        assert_eq!(Classroom::new(4, "").name, "Classroom 4");
        assert_eq!(Classroom::new(4, "Theater").name, "Theater");
    }
}
