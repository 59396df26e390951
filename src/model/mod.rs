//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod identifiers;

// Re-export for convenience
pub use dataset::{Book, Chapter, Dataset, InvalidDataset, VerseRef};
pub use error::{AppError, ClipboardError, LoadError, NavigationError, StoreError};
pub use identifiers::{EntryId, InvalidEntryId, InvalidSourceId, SourceId};
