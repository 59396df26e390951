//! Dataset wire-format parser.
//!
//! Pure functions converting the downloaded payload into a validated [`Dataset`].
//! The payload is a JSON array of `{ abbrev, name, chapters }` objects where
//! `chapters` is an array of verse-text arrays; position is the numbering.

use crate::model::catalog;
use crate::model::{Book, Dataset, LoadError};
use serde::Deserialize;

const UTF8_BOM: &str = "\u{feff}";

/// Raw JSON structure for deserializing a book.
#[derive(Debug, Deserialize)]
struct RawBook {
    abbrev: String,
    #[serde(default)]
    name: Option<String>,
    chapters: Vec<Vec<String>>,
}

/// Decode and parse a complete payload.
///
/// # Errors
///
/// `DecodeFailure` when the bytes are not UTF-8, `ParseFailure` when the text is not a
/// dataset document or violates the dataset invariants.
pub fn parse_dataset(source_id: &str, bytes: &[u8]) -> Result<Dataset, LoadError> {
    let text = decode_utf8(source_id, bytes)?;
    parse_dataset_str(source_id, text)
}

/// Decode the payload as UTF-8, stripping a leading byte order mark.
pub fn decode_utf8<'a>(source_id: &str, bytes: &'a [u8]) -> Result<&'a str, LoadError> {
    let text = std::str::from_utf8(bytes).map_err(|e| LoadError::DecodeFailure {
        source_id: source_id.to_string(),
        valid_up_to: e.valid_up_to(),
    })?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text))
}

/// Parse already-decoded text.
pub fn parse_dataset_str(source_id: &str, text: &str) -> Result<Dataset, LoadError> {
    let raw: Vec<RawBook> = serde_json::from_str(text).map_err(|e| LoadError::ParseFailure {
        source_id: source_id.to_string(),
        reason: e.to_string(),
    })?;

    let books = raw.into_iter().map(into_book).collect();

    Dataset::new(books).map_err(|e| LoadError::ParseFailure {
        source_id: source_id.to_string(),
        reason: e.to_string(),
    })
}

fn into_book(raw: RawBook) -> Book {
    let display_name = match raw.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => catalog::display_name(&raw.abbrev)
            .map(str::to_string)
            .unwrap_or_else(|| raw.abbrev.clone()),
    };
    Book::new(raw.abbrev, display_name, raw.chapters)
}
