//! Error types for versepad.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via `?` and
//! `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error wrapping the fatal failures
//!   - [`LoadError`] - Dataset acquisition failures (network, decode, parse)
//!   - [`ClipboardError`] - Invalid positions passed to clipboard mutations
//!   - [`NavigationError`] - Selections that do not exist in the loaded dataset
//! - [`StoreError`] - Persistent cache failures. Never leaves the store boundary.
//!
//! # Recovery Strategy
//!
//! Store errors are **non-fatal**: the persistent store logs them and reports the entry
//! as absent. Load errors are fatal to the load in progress and go back to the caller,
//! which may fall back to a previously cached copy. Clipboard errors indicate a defect in
//! event sequencing and are logged at error level.

use crate::config::SettingsError;
use crate::model::InvalidSourceId;
use thiserror::Error;

/// Top-level application error.
///
/// Returned from the application root. Domain errors convert via `From`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The dataset could not be acquired from the network or the cache.
    #[error("Failed to load dataset: {0}")]
    Load(#[from] LoadError),

    /// A clipboard mutation referenced a position that does not exist.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// A book/chapter/verse selection does not exist in the dataset.
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// A source id supplied by the user or configuration is malformed.
    #[error("Invalid source: {0}")]
    InvalidSource(#[from] InvalidSourceId),

    /// The settings file could not be written.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// No dataset has been opened yet.
    #[error("No dataset loaded")]
    NoDataset,
}

/// Failures of the persistent cache.
///
/// User-facing name: `CacheUnavailable`. These never propagate past
/// [`PersistentStore`](crate::store::PersistentStore); they are logged and the entry is
/// treated as absent.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage cannot be reached (missing directory, disabled backend).
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// A stored record exists but cannot be decoded.
    #[error("Corrupt cache record for {key}: {reason}")]
    Corrupt {
        /// Key of the unreadable record.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// Generic I/O failure (permissions, disk full / quota exceeded).
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The record could not be encoded for writing.
    #[error("Failed to encode cache record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures of a dataset load. Collectively reported as `LoadFailed`.
///
/// Cloneable so that callers sharing one in-flight fetch all receive the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Connection, HTTP status or mid-stream read failure.
    ///
    /// A stream that ends before the advertised length also lands here.
    #[error("Load failed for {source_id}: network failure: {reason}")]
    NetworkFailure {
        /// Dataset being loaded.
        source_id: String,
        /// Transport message.
        reason: String,
    },

    /// The payload is not valid UTF-8.
    #[error("Load failed for {source_id}: payload is not valid UTF-8 (at byte {valid_up_to})")]
    DecodeFailure {
        /// Dataset being loaded.
        source_id: String,
        /// Length of the valid UTF-8 prefix.
        valid_up_to: usize,
    },

    /// The text is not a valid dataset document.
    #[error("Load failed for {source_id}: invalid dataset: {reason}")]
    ParseFailure {
        /// Dataset being loaded.
        source_id: String,
        /// Parser message.
        reason: String,
    },
}

impl LoadError {
    /// Every variant is a `LoadFailed` condition.
    pub fn is_load_failed(&self) -> bool {
        true
    }

    /// Dataset id the failed load was for.
    pub fn source_id(&self) -> &str {
        match self {
            LoadError::NetworkFailure { source_id, .. }
            | LoadError::DecodeFailure { source_id, .. }
            | LoadError::ParseFailure { source_id, .. } => source_id,
        }
    }
}

/// Errors from clipboard mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// A position outside `0..len` was passed to `remove_at` or `move_to`.
    #[error("Clipboard position {index} out of range (len {len})")]
    IndexOutOfRange {
        /// The offending position.
        index: usize,
        /// Length of the clipboard at the time of the call.
        len: usize,
    },
}

/// Errors from the books / chapter / verse selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// No book with this abbreviation.
    #[error("Unknown book: {0}")]
    UnknownBook(String),

    /// The book has fewer chapters.
    #[error("Book {book} has no chapter {chapter}")]
    ChapterOutOfRange {
        /// Book abbreviation.
        book: String,
        /// 0-based chapter index that was asked for.
        chapter: usize,
    },

    /// The chapter has fewer verses.
    #[error("{book} {chapter} has no verse {verse}")]
    VerseOutOfRange {
        /// Book abbreviation.
        book: String,
        /// 0-based chapter index.
        chapter: usize,
        /// 0-based verse index that was asked for.
        verse: usize,
    },

    /// A chapter was chosen while no book is selected.
    #[error("No book selected")]
    NoBookSelected,
}
