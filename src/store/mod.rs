//! Persistent dataset cache.
//!
//! A single logical table of [`CacheRecord`]s keyed by source id. Backends implement
//! [`StoreBackend`] and may fail in any way; [`PersistentStore`] is the boundary where
//! those failures are logged and turned into "absent" so callers only ever see
//! `Option`/`bool`.
//!
//! No eviction: a record lives until it is overwritten by a later `put` for the same
//! key or the storage is wiped externally. Concurrent writes are last-write-wins.

use crate::model::{Dataset, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Current layout of [`CacheRecord`]. Records written with any other version are
/// ignored on read.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// One cached dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Layout version, compared with [`CACHE_SCHEMA_VERSION`].
    pub schema_version: u32,
    /// Source id the record belongs to.
    pub key: String,
    /// When the record was written.
    pub stored_at: DateTime<Utc>,
    /// The cached dataset.
    pub data: Dataset,
}

impl CacheRecord {
    /// Build a record stamped with the current schema version and time.
    pub fn new(key: impl Into<String>, data: Dataset) -> Self {
        Self {
            schema_version: CACHE_SCHEMA_VERSION,
            key: key.into(),
            stored_at: Utc::now(),
            data,
        }
    }
}

/// Only the version field, decoded before the full record so an old layout is
/// recognised even when the rest of it no longer deserializes.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordHeader {
    #[serde(default)]
    pub schema_version: Option<u32>,
}

/// Storage backend for cache records.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Read the record under `key`. `Ok(None)` when nothing is stored.
    async fn read(&self, key: &str) -> Result<Option<CacheRecord>, StoreError>;

    /// Write `record` under `record.key`, replacing any previous record.
    async fn write(&self, record: CacheRecord) -> Result<(), StoreError>;
}

/// Error-swallowing facade over a [`StoreBackend`].
///
/// Cheap to clone; all clones share the backend.
#[derive(Clone)]
pub struct PersistentStore {
    backend: Arc<dyn StoreBackend>,
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore").finish_non_exhaustive()
    }
}

impl PersistentStore {
    /// Store over `backend`.
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    /// Fetch the dataset cached under `key`.
    ///
    /// Storage failures, corrupt records and records from another schema version
    /// all read as `None`.
    pub async fn get(&self, key: &str) -> Option<Arc<Dataset>> {
        match self.backend.read(key).await {
            Ok(Some(record)) if record.schema_version != CACHE_SCHEMA_VERSION => {
                warn!(
                    key,
                    found = record.schema_version,
                    expected = CACHE_SCHEMA_VERSION,
                    "Ignoring cache record with stale schema version"
                );
                None
            }
            Ok(Some(record)) => {
                debug!(key, stored_at = %record.stored_at, "Cache hit");
                Some(Arc::new(record.data))
            }
            Ok(None) => {
                debug!(key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed; treating as miss");
                None
            }
        }
    }

    /// Store `dataset` under `key`. Returns `true` once the backend acknowledged it.
    pub async fn put(&self, key: &str, dataset: &Dataset) -> bool {
        let record = CacheRecord::new(key, dataset.clone());
        match self.backend.write(record).await {
            Ok(()) => {
                debug!(key, "Cached dataset");
                true
            }
            Err(e) => {
                warn!(key, error = %e, "Cache write failed");
                false
            }
        }
    }
}
