//! Remote dataset sources.
//!
//! This module provides the streaming side of dataset acquisition:
//! - [`ResourceFetcher`]: opens a byte stream for a source id
//! - [`HttpFetcher`]: the network implementation (`GET {base}/{id}.json`)
//! - [`ScriptedFetcher`]: fixed in-memory payloads, for offline runs and tests
//! - [`ProgressTracker`]: byte counting → percentage

use crate::model::{LoadError, SourceId};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

pub mod http;
pub mod progress;
pub mod scripted;

pub use http::HttpFetcher;
pub use progress::ProgressTracker;
pub use scripted::{Script, ScriptedFetcher};

/// Stream of payload chunks in arrival order.
pub type ChunkStream = BoxStream<'static, Result<Bytes, LoadError>>;

/// An opened remote resource.
pub struct ByteStream {
    /// Advertised total size, when the server sent one.
    pub content_length: Option<u64>,
    /// Payload chunks.
    pub chunks: ChunkStream,
}

impl std::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStream")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Opens streaming reads of named dataset resources.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Start reading `source`. Errors here are connection / status failures; errors
    /// while reading surface as items of the returned stream.
    async fn open(&self, source: &SourceId) -> Result<ByteStream, LoadError>;
}
