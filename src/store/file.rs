//! File-backed store: one JSON document per key.
//!
//! Layout: `{root}/datasets/{sanitized key}.json`. Writes go to a temp file in the
//! same directory and are renamed into place, so a reader sees either the old record
//! or the new one.

use super::{CacheRecord, RecordHeader, StoreBackend, CACHE_SCHEMA_VERSION};
use crate::model::StoreError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

const NAMESPACE: &str = "datasets";

/// One JSON file per key under `<root>/datasets/`.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileStore {
    /// Store rooted at `root`. Nothing is created until the first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join(NAMESPACE),
            tmp_counter: AtomicU64::new(0),
        }
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Map a key onto a safe file stem. Characters outside `[A-Za-z0-9._-]` become `_`.
pub fn sanitize_key(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    // "." and ".." would escape the namespace directory
    if stem.chars().all(|c| c == '.') {
        stem.replace('.', "_")
    } else {
        stem
    }
}

#[async_trait]
impl StoreBackend for FileStore {
    async fn read(&self, key: &str) -> Result<Option<CacheRecord>, StoreError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let header: RecordHeader =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if header.schema_version != Some(CACHE_SCHEMA_VERSION) {
            warn!(
                key,
                found = ?header.schema_version,
                expected = CACHE_SCHEMA_VERSION,
                "Cache file written by another schema version"
            );
            return Ok(None);
        }

        let record: CacheRecord =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Some(record))
    }

    async fn write(&self, record: CacheRecord) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(&record.key);
        let bytes = serde_json::to_vec(&record)?;

        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("{}.{}.tmp", std::process::id(), n));

        tokio::fs::write(&tmp, bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Io(e));
        }
        Ok(())
    }
}
