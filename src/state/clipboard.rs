//! Ordered verse clipboard.
//!
//! The entry order is exactly the order of the text pushed to the [`ClipboardSink`]:
//! every mutation finishes rearranging the entries first and then re-synchronizes the
//! sink once, so the sink never observes an intermediate state.

use super::sink::ClipboardSink;
use crate::model::{ClipboardError, EntryId};
use tracing::{debug, error, warn};

/// One verse placed on the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    id: EntryId,
    text: String,
    book: String,
    chapter: usize,
    verse: usize,
}

impl ClipboardEntry {
    /// Opaque unique id.
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    /// Pre-formatted text, e.g. `In the beginning… — Genesis 1:1`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Abbreviation of the source book.
    pub fn book(&self) -> &str {
        &self.book
    }

    /// 0-based chapter index.
    pub fn chapter(&self) -> usize {
        self.chapter
    }

    /// 0-based verse index.
    pub fn verse(&self) -> usize {
        self.verse
    }
}

/// Text stored for a verse: `"{verse text} — {Book} {chapter}:{verse}"` with 1-based
/// numbering in the label.
pub fn format_entry_text(
    verse_text: &str,
    book_display_name: &str,
    chapter: usize,
    verse: usize,
) -> String {
    format!(
        "{} — {} {}:{}",
        verse_text.trim(),
        book_display_name,
        chapter + 1,
        verse + 1
    )
}

/// What `remove_at` took out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// The entry that was removed.
    pub entry: ClipboardEntry,
    /// The clipboard is now empty; the UI may collapse its container.
    pub became_empty: bool,
}

/// Ordered verse working set mirrored to a [`ClipboardSink`].
pub struct ClipboardModel {
    entries: Vec<ClipboardEntry>,
    sink: Box<dyn ClipboardSink>,
    next_token: u64,
}

impl std::fmt::Debug for ClipboardModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardModel")
            .field("entries", &self.entries)
            .field("next_token", &self.next_token)
            .finish_non_exhaustive()
    }
}

impl ClipboardModel {
    /// An empty clipboard writing to `sink`. Nothing is written until the first
    /// mutation.
    pub fn new(sink: Box<dyn ClipboardSink>) -> Self {
        Self {
            entries: Vec::new(),
            sink,
            next_token: 0,
        }
    }

    /// Append a verse and return the id of the new entry. Duplicates are allowed.
    pub fn add(
        &mut self,
        book: &str,
        chapter: usize,
        verse: usize,
        verse_text: &str,
        book_display_name: &str,
    ) -> EntryId {
        let id = EntryId::for_verse(book, chapter, verse, self.next_token);
        self.next_token += 1;

        self.entries.push(ClipboardEntry {
            id: id.clone(),
            text: format_entry_text(verse_text, book_display_name, chapter, verse),
            book: book.to_string(),
            chapter,
            verse,
        });
        debug!(entry = %id, len = self.entries.len(), "Clipboard add");
        self.sync();
        id
    }

    /// Remove the entry at `position`; later entries shift left.
    ///
    /// # Errors
    /// `IndexOutOfRange` when `position >= len`. The clipboard is left untouched.
    pub fn remove_at(&mut self, position: usize) -> Result<Removal, ClipboardError> {
        self.check(position)?;
        let entry = self.entries.remove(position);
        let became_empty = self.entries.is_empty();
        debug!(entry = %entry.id, position, became_empty, "Clipboard remove");
        self.sync();
        Ok(Removal {
            entry,
            became_empty,
        })
    }

    /// Move the entry at `from` so it ends up at `to` (remove, then insert into the
    /// shorter sequence). `move_to(0, 2)` on `[A, B, C]` gives `[B, C, A]`.
    ///
    /// # Errors
    /// `IndexOutOfRange` when either index is `>= len`.
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<(), ClipboardError> {
        self.check(from)?;
        self.check(to)?;
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        debug!(from, to, "Clipboard move");
        self.sync();
        Ok(())
    }

    /// Drop every entry. Returns `true` when this emptied a non-empty clipboard.
    pub fn clear(&mut self) -> bool {
        let became_empty = !self.entries.is_empty();
        self.entries.clear();
        self.sync();
        became_empty
    }

    /// Entry texts joined with `\n`, in order.
    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(ClipboardEntry::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Entries in clipboard order.
    pub fn entries(&self) -> &[ClipboardEntry] {
        &self.entries
    }

    /// Entry at `position`.
    pub fn get(&self, position: usize) -> Option<&ClipboardEntry> {
        self.entries.get(position)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the clipboard holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current position of the entry with `id`.
    pub fn position_of(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    fn check(&self, index: usize) -> Result<(), ClipboardError> {
        if index < self.entries.len() {
            return Ok(());
        }
        let err = ClipboardError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        };
        error!(error = %err, "Rejected clipboard mutation");
        Err(err)
    }

    fn sync(&mut self) {
        let text = self.serialize();
        if let Err(e) = self.sink.set_text(&text) {
            warn!(error = %e, "Clipboard sink write failed");
        }
    }
}

#[cfg(test)]
#[path = "clipboard_tests.rs"]
mod tests;
