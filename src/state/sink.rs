//! Write-only destinations for the serialized clipboard.
//!
//! The OS clipboard is an external collaborator: [`ClipboardModel`](super::ClipboardModel)
//! pushes its full serialization on every mutation and never reads back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Clipboard sink failures.
#[derive(Debug, Error)]
pub enum SinkError {
    /// No clipboard could be opened (headless session, no display server).
    #[error("System clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard refused the text.
    #[error("Failed to write clipboard: {0}")]
    Write(String),
}

/// Receives the complete clipboard text after each mutation.
pub trait ClipboardSink {
    /// Replace the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), SinkError>;
}

/// The operating system clipboard, via `arboard`.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

impl SystemClipboard {
    /// # Errors
    /// `SinkError::Unavailable` when the platform clipboard cannot be opened.
    pub fn new() -> Result<Self, SinkError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| SinkError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), SinkError> {
        self.inner
            .set_text(text)
            .map_err(|e| SinkError::Write(e.to_string()))
    }
}

/// Records every write in memory.
///
/// Clones share the same history, so a test can keep one handle while the model owns
/// the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    history: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
}

impl MemorySink {
    /// Empty sink that accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (they are still not recorded).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All texts written so far, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    /// The most recent text, if any.
    pub fn last(&self) -> Option<String> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.history.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl ClipboardSink for MemorySink {
    fn set_text(&mut self, text: &str) -> Result<(), SinkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::Write("memory sink set to fail".into()));
        }
        let mut history = self
            .history
            .lock()
            .map_err(|_| SinkError::Write("memory sink lock poisoned".into()))?;
        history.push(text.to_string());
        Ok(())
    }
}
