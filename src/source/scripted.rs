//! In-memory fetcher serving fixed payloads.
//!
//! Each source id maps to a [`Script`]: the chunks to deliver, whether the size is
//! advertised, and optionally a failure partway through. Useful for running without a
//! network and for exercising the loader's streaming and failure paths.

use super::{ByteStream, ResourceFetcher};
use crate::model::{LoadError, SourceId};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// What to serve for one source id.
#[derive(Debug, Clone)]
pub struct Script {
    chunks: Vec<Bytes>,
    advertise_length: bool,
    length_override: Option<u64>,
    fail_after: Option<usize>,
    open_error: Option<String>,
    gate: Option<Arc<Semaphore>>,
}

impl Script {
    /// Serve `payload` split into chunks of `chunk_size` bytes, advertising its length.
    pub fn payload(payload: impl Into<Bytes>, chunk_size: usize) -> Self {
        let payload: Bytes = payload.into();
        let chunk_size = chunk_size.max(1);
        let mut chunks = Vec::new();
        let mut offset = 0;
        while offset < payload.len() {
            let end = (offset + chunk_size).min(payload.len());
            chunks.push(payload.slice(offset..end));
            offset = end;
        }
        Self {
            chunks,
            advertise_length: true,
            length_override: None,
            fail_after: None,
            open_error: None,
            gate: None,
        }
    }

    /// A source whose request fails before any byte arrives.
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self {
            open_error: Some(reason.into()),
            ..Self::payload(Bytes::new(), 1)
        }
    }

    /// Omit the size, forcing heuristic progress.
    pub fn without_length(mut self) -> Self {
        self.advertise_length = false;
        self
    }

    /// Advertise `length` regardless of the real payload size.
    pub fn with_advertised_length(mut self, length: u64) -> Self {
        self.advertise_length = true;
        self.length_override = Some(length);
        self
    }

    /// Deliver `n` chunks, then a network error.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Deliver only the first `n` chunks and end cleanly, as a dropped connection
    /// would look to the reader.
    pub fn truncated_after(mut self, n: usize) -> Self {
        let total: usize = self.chunks.iter().map(Bytes::len).sum();
        self.length_override.get_or_insert(total as u64);
        self.chunks.truncate(n);
        self
    }

    /// Every chunk waits for a permit on `gate` before it is delivered.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn content_length(&self) -> Option<u64> {
        if !self.advertise_length {
            return None;
        }
        Some(
            self.length_override
                .unwrap_or_else(|| self.chunks.iter().map(|c| c.len() as u64).sum()),
        )
    }
}

/// Fetcher answering from a table of [`Script`]s.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, Script>>,
    opens: AtomicUsize,
}

impl ScriptedFetcher {
    /// Fetcher with no scripts; every source is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the script for `source`.
    pub fn insert(&self, source: &str, script: Script) {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(source.to_string(), script);
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(self, source: &str, script: Script) -> Self {
        self.insert(source, script);
        self
    }

    /// Number of `open` calls so far.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

struct Playback {
    source_id: String,
    chunks: VecDeque<Bytes>,
    delivered: usize,
    fail_after: Option<usize>,
    gate: Option<Arc<Semaphore>>,
    done: bool,
}

#[async_trait]
impl ResourceFetcher for ScriptedFetcher {
    async fn open(&self, source: &SourceId) -> Result<ByteStream, LoadError> {
        self.opens.fetch_add(1, Ordering::SeqCst);

        let script = self
            .scripts
            .lock()
            .ok()
            .and_then(|scripts| scripts.get(source.as_str()).cloned());

        let Some(script) = script else {
            return Err(LoadError::NetworkFailure {
                source_id: source.to_string(),
                reason: "HTTP 404 Not Found".into(),
            });
        };

        if let Some(reason) = script.open_error.clone() {
            return Err(LoadError::NetworkFailure {
                source_id: source.to_string(),
                reason,
            });
        }

        let content_length = script.content_length();
        let playback = Playback {
            source_id: source.to_string(),
            chunks: script.chunks.into(),
            delivered: 0,
            fail_after: script.fail_after,
            gate: script.gate,
            done: false,
        };

        let chunks = futures::stream::unfold(playback, |mut p| async move {
            if p.done {
                return None;
            }
            if let Some(gate) = &p.gate {
                match gate.acquire().await {
                    Ok(permit) => permit.forget(),
                    Err(_) => return None,
                }
            } else {
                tokio::task::yield_now().await;
            }
            if p.fail_after == Some(p.delivered) {
                p.done = true;
                let err = LoadError::NetworkFailure {
                    source_id: p.source_id.clone(),
                    reason: "connection reset".into(),
                };
                return Some((Err(err), p));
            }
            let chunk = p.chunks.pop_front()?;
            p.delivered += 1;
            Some((Ok(chunk), p))
        })
        .boxed();

        Ok(ByteStream {
            content_length,
            chunks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    fn source(id: &str) -> SourceId {
        SourceId::new(id).unwrap()
    }

    #[tokio::test]
    async fn serves_payload_in_chunks() {
        let fetcher = ScriptedFetcher::new().with("a", Script::payload("abcdefg", 3));
        let stream = fetcher.open(&source("a")).await.unwrap();

        assert_eq!(stream.content_length, Some(7));
        let chunks: Vec<Bytes> = stream.chunks.try_collect().await.unwrap();
        assert_eq!(chunks, vec!["abc", "def", "g"]);
        assert_eq!(fetcher.open_count(), 1);
    }

    #[tokio::test]
    async fn unknown_source_is_not_found() {
        let fetcher = ScriptedFetcher::new();
        let err = fetcher.open(&source("missing")).await.unwrap_err();
        assert!(matches!(err, LoadError::NetworkFailure { ref reason, .. } if reason.contains("404")));
    }

    #[tokio::test]
    async fn failing_after_yields_error_item() {
        let fetcher =
            ScriptedFetcher::new().with("a", Script::payload("abcdef", 2).failing_after(1));
        let stream = fetcher.open(&source("a")).await.unwrap();
        let items: Vec<_> = stream.chunks.collect().await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn truncated_after_keeps_full_advertised_length() {
        let fetcher =
            ScriptedFetcher::new().with("a", Script::payload("abcdef", 2).truncated_after(1));
        let stream = fetcher.open(&source("a")).await.unwrap();

        assert_eq!(stream.content_length, Some(6));
        let chunks: Vec<Bytes> = stream.chunks.try_collect().await.unwrap();
        assert_eq!(chunks, vec!["ab"]);
    }

    #[tokio::test]
    async fn without_length_hides_size() {
        let fetcher = ScriptedFetcher::new().with("a", Script::payload("abc", 1).without_length());
        let stream = fetcher.open(&source("a")).await.unwrap();
        assert_eq!(stream.content_length, None);
    }
}
