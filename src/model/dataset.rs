//! Book / chapter / verse corpus types.
//!
//! A [`Dataset`] is immutable once built and is shared as `Arc<Dataset>`
//! between the loader, the cache and the view layer.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// One chapter: its verses in order. The chapter's index is its identity.
pub type Chapter = Vec<String>;

/// A book of the corpus.
///
/// Field names follow the wire format (`abbrev`, `name`, `chapters`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "abbrev")]
    abbreviation: String,
    #[serde(rename = "name")]
    display_name: String,
    chapters: Vec<Chapter>,
}

impl Book {
    /// Build a book from its parts.
    pub fn new(
        abbreviation: impl Into<String>,
        display_name: impl Into<String>,
        chapters: Vec<Chapter>,
    ) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            display_name: display_name.into(),
            chapters,
        }
    }

    /// Unique short key, e.g. `gn`.
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// Name shown to readers, e.g. `Genesis`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// All chapters in order.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Chapter at 0-based `index`.
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// Verse text at 0-based `chapter` and `verse`.
    pub fn verse(&self, chapter: usize, verse: usize) -> Option<&str> {
        self.chapters
            .get(chapter)
            .and_then(|c| c.get(verse))
            .map(String::as_str)
    }
}

/// The full corpus for one version/language.
///
/// Invariants: at least one book, abbreviations unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    books: Vec<Book>,
}

impl Dataset {
    /// Smart constructor enforcing the non-empty / unique-abbreviation invariants.
    pub fn new(books: Vec<Book>) -> Result<Self, InvalidDataset> {
        if books.is_empty() {
            return Err(InvalidDataset::Empty);
        }
        let mut seen = HashSet::with_capacity(books.len());
        for book in &books {
            if !seen.insert(book.abbreviation.as_str()) {
                return Err(InvalidDataset::DuplicateAbbreviation(
                    book.abbreviation.clone(),
                ));
            }
        }
        Ok(Self { books })
    }

    /// Books in canonical order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Book with the given abbreviation.
    pub fn book(&self, abbreviation: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.abbreviation == abbreviation)
    }

    /// Position of the book with the given abbreviation.
    pub fn position_of(&self, abbreviation: &str) -> Option<usize> {
        self.books.iter().position(|b| b.abbreviation == abbreviation)
    }

    /// Text of the verse identified by `reference`.
    pub fn verse(&self, reference: &VerseRef) -> Option<&str> {
        self.book(&reference.book)
            .and_then(|b| b.verse(reference.chapter, reference.verse))
    }

    /// Total number of verses across all books.
    pub fn verse_count(&self) -> usize {
        self.books
            .iter()
            .flat_map(|b| b.chapters.iter())
            .map(Vec::len)
            .sum()
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let books = Vec::<Book>::deserialize(deserializer)?;
        Dataset::new(books).map_err(serde::de::Error::custom)
    }
}

/// Identity of a verse: 0-based `(book, chapter, verse)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseRef {
    /// Book abbreviation.
    pub book: String,
    /// 0-based chapter index.
    pub chapter: usize,
    /// 0-based verse index.
    pub verse: usize,
}

impl VerseRef {
    /// Reference from its parts.
    pub fn new(book: impl Into<String>, chapter: usize, verse: usize) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }
}

/// Why a list of books is not a valid dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDataset {
    /// No books at all.
    #[error("dataset contains no books")]
    Empty,
    /// Two books share an abbreviation.
    #[error("duplicate book abbreviation: {0}")]
    DuplicateAbbreviation(String),
}
