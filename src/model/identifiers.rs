//! Core identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a remote dataset resource (e.g. `en_kjv`).
///
/// Doubles as the cache key in the persistent store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceId(String);

impl SourceId {
    /// Smart constructor: validates a non-empty, whitespace-free id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidSourceId> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidSourceId::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidSourceId::Whitespace(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Built-in ids from the catalog, known to be valid.
    pub(crate) fn from_static(raw: &'static str) -> Self {
        Self(raw.to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SourceId {
    type Error = InvalidSourceId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> Self {
        id.0
    }
}

impl std::str::FromStr for SourceId {
    type Err = InvalidSourceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Opaque identity of a clipboard entry.
///
/// Stable across reorders; the gesture controller holds these instead of
/// list positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(String);

impl EntryId {
    /// Smart constructor: validates non-empty entry id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidEntryId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidEntryId::Empty);
        }
        Ok(Self(raw))
    }

    /// Build the id for a verse selection.
    ///
    /// `token` distinguishes repeated selections of the same verse.
    pub(crate) fn for_verse(book: &str, chapter: usize, verse: usize, token: u64) -> Self {
        Self(format!("{book}-{chapter}-{verse}-{token}"))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ===== Error Types =====

/// Rejected source id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSourceId {
    /// Empty after trimming.
    #[error("Source ID cannot be empty")]
    Empty,
    /// Contains whitespace inside the id.
    #[error("Source ID cannot contain whitespace: {0:?}")]
    Whitespace(String),
}

/// Rejected entry id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidEntryId {
    /// Empty string.
    #[error("Entry ID cannot be empty")]
    Empty,
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_rejects_empty() {
        assert_eq!(SourceId::new(""), Err(InvalidSourceId::Empty));
        assert_eq!(SourceId::new("   "), Err(InvalidSourceId::Empty));
    }

    #[test]
    fn source_id_trims_surrounding_whitespace() {
        let id = SourceId::new("  en_kjv ").unwrap();
        assert_eq!(id.as_str(), "en_kjv");
    }

    #[test]
    fn source_id_rejects_inner_whitespace() {
        assert!(matches!(
            SourceId::new("en kjv"),
            Err(InvalidSourceId::Whitespace(_))
        ));
    }

    #[test]
    fn source_id_parses_from_str() {
        let id: SourceId = "pt_nvi".parse().unwrap();
        assert_eq!(id.to_string(), "pt_nvi");
    }

    #[test]
    fn source_id_serde_rejects_empty_string() {
        let result: Result<SourceId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn source_id_serializes_as_plain_string() {
        let id = SourceId::new("en_bbe").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"en_bbe\"");
    }

    #[test]
    fn entry_id_rejects_empty() {
        assert_eq!(EntryId::new(""), Err(InvalidEntryId::Empty));
    }

    #[test]
    fn entry_id_for_verse_concatenates_parts() {
        let id = EntryId::for_verse("gn", 0, 2, 7);
        assert_eq!(id.as_str(), "gn-0-2-7");
    }

    #[test]
    fn entry_ids_with_different_tokens_differ() {
        let a = EntryId::for_verse("jo", 2, 15, 1);
        let b = EntryId::for_verse("jo", 2, 15, 2);
        assert_ne!(a, b);
    }
}
