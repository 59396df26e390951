//! In-process store backend.
//!
//! Used for headless runs without a cache directory and by tests, which can switch
//! it to "unavailable" to exercise the failure path and read its call counters.

use super::{CacheRecord, StoreBackend};
use crate::model::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-process store with failure injection and call counters.
#[derive(Debug)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, CacheRecord>>,
    available: AtomicBool,
    failing_reads: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty, available store.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            failing_reads: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// When `false`, every read and write fails with `StoreError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make the next `n` reads fail with `StoreError::Unavailable`.
    pub fn fail_next_reads(&self, n: usize) {
        self.failing_reads.store(n, Ordering::SeqCst);
    }

    /// Number of `read` calls, successful or not.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `write` calls that stored a record.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Whether a record is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.records
            .lock()
            .map(|records| records.contains_key(key))
            .unwrap_or(false)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store disabled".into()))
        }
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<CacheRecord>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let failing = self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(StoreError::Unavailable("simulated read failure".into()));
        }
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        Ok(records.get(key).cloned())
    }

    async fn write(&self, record: CacheRecord) -> Result<(), StoreError> {
        self.check_available()?;
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        records.insert(record.key.clone(), record);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
