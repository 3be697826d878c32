//! Search pattern types.

use serde::{Deserialize, Serialize};

/// How a search pattern matches document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    Exact,
    Partial,
    Regex,
}

impl PatternType {
    /// Parse a pattern type from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(Self::Exact),
            "partial" => Some(Self::Partial),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }

    /// The string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Partial => "partial",
            Self::Regex => "regex",
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-defined search pattern attached to a settings profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPattern {
    pub id: i64,
    pub setting_id: i64,
    pub pattern_type: PatternType,
    pub pattern_text: String,
}

/// Data for creating a new search pattern.
#[derive(Debug, Clone)]
pub struct NewSearchPattern {
    pub setting_id: i64,
    pub pattern_type: PatternType,
    pub pattern_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_type_round_trips_through_string_form() {
        for pt in [PatternType::Exact, PatternType::Partial, PatternType::Regex] {
            assert_eq!(PatternType::parse(pt.as_str()), Some(pt));
        }
    }

    #[test]
    fn pattern_type_rejects_unknown_strings() {
        assert_eq!(PatternType::parse("EXACT"), None);
        assert_eq!(PatternType::parse("glob"), None);
        assert_eq!(PatternType::parse(""), None);
    }
}
