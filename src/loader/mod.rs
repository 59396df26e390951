//! Dataset loader: cache lookup, streamed download, progress, cache population.
//!
//! One [`DatasetLoader`] is built by the application root and shared by reference.
//! `load` checks the [`PersistentStore`] first and only goes to the network on a miss.
//! Concurrent loads of the same source share one fetch. Progress is published on a
//! `watch` channel for the most recently requested source only; a load that has been
//! superseded keeps running to completion but its progress is no longer reported.

use crate::model::{Dataset, LoadError, SourceId};
use crate::parser;
use crate::source::{ProgressTracker, ResourceFetcher};
use crate::store::PersistentStore;
use futures::future::{BoxFuture, FutureExt, Shared};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<Dataset>, LoadError>>>;

/// Stage of the observed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Nothing requested yet.
    Idle,
    /// Looking in the persistent cache.
    CheckingCache,
    /// Bytes are arriving from the network.
    Downloading,
    /// Dataset available (from cache or network).
    Complete,
    /// The load failed; percent has been reset to 0.
    Failed,
}

/// Snapshot published on the progress channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadProgress {
    /// Source being observed; `None` before the first load.
    pub source: Option<SourceId>,
    /// Completion percentage, 0 to 100.
    pub percent: u8,
    /// Current stage.
    pub phase: LoadPhase,
}

impl LoadProgress {
    fn idle() -> Self {
        Self {
            source: None,
            percent: 0,
            phase: LoadPhase::Idle,
        }
    }
}

/// Tuning knobs for the loader.
#[derive(Debug, Clone, Copy)]
pub struct LoaderOptions {
    /// Scale of the heuristic progress curve for unknown-length downloads.
    pub progress_scale_bytes: u64,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            progress_scale_bytes: 4 * 1024 * 1024,
        }
    }
}

struct Inner {
    store: PersistentStore,
    fetcher: Arc<dyn ResourceFetcher>,
    options: LoaderOptions,
    progress: watch::Sender<LoadProgress>,
    inflight: Mutex<HashMap<SourceId, SharedLoad>>,
}

/// Streams, parses and caches datasets.
///
/// Cloning yields another handle to the same loader.
#[derive(Clone)]
pub struct DatasetLoader {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetLoader")
            .field("options", &self.inner.options)
            .field("progress", &*self.inner.progress.borrow())
            .finish_non_exhaustive()
    }
}

impl DatasetLoader {
    /// Build a loader over `store` and `fetcher`.
    pub fn new(
        store: PersistentStore,
        fetcher: Arc<dyn ResourceFetcher>,
        options: LoaderOptions,
    ) -> Self {
        let (progress, _) = watch::channel(LoadProgress::idle());
        Self {
            inner: Arc::new(Inner {
                store,
                fetcher,
                options,
                progress,
                inflight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The store this loader reads and populates.
    pub fn store(&self) -> &PersistentStore {
        &self.inner.store
    }

    /// Receive progress updates for the active source.
    pub fn subscribe(&self) -> watch::Receiver<LoadProgress> {
        self.inner.progress.subscribe()
    }

    /// Latest published progress.
    pub fn progress(&self) -> LoadProgress {
        self.inner.progress.borrow().clone()
    }

    /// Load `source`: cached copy if present, otherwise a streamed download.
    ///
    /// # Errors
    /// `LoadFailed` (any [`LoadError`]) when the download, decoding or parsing fails.
    /// Nothing is cached in that case and progress returns to 0.
    pub async fn load(&self, source: &SourceId) -> Result<Arc<Dataset>, LoadError> {
        self.start(source, true).await
    }

    /// Download `source` even when a cached copy exists, then replace the cache entry.
    /// A load of `source` already in flight is joined instead of starting a second fetch.
    pub async fn refresh(&self, source: &SourceId) -> Result<Arc<Dataset>, LoadError> {
        self.start(source, false).await
    }

    /// `load`, falling back to whatever the store holds for `source` on failure.
    ///
    /// # Errors
    /// The original load error when the store has nothing either.
    pub async fn load_with_fallback(&self, source: &SourceId) -> Result<Arc<Dataset>, LoadError> {
        match self.load(source).await {
            Ok(dataset) => Ok(dataset),
            Err(err) => {
                warn!(%source, error = %err, "Load failed; trying cached copy");
                match self.inner.store.get(source.as_str()).await {
                    Some(dataset) => {
                        info!(%source, "Serving cached copy after failed load");
                        Ok(dataset)
                    }
                    None => Err(err),
                }
            }
        }
    }

    async fn start(&self, source: &SourceId, use_cache: bool) -> Result<Arc<Dataset>, LoadError> {
        self.activate(source);

        let shared = {
            let mut inflight = lock_inflight(&self.inner);
            // At most one fetch per source; a refresh joins whatever is pending.
            match inflight.get(source) {
                Some(existing) => {
                    debug!(%source, "Joining in-flight load");
                    existing.clone()
                }
                None => {
                    let fut = run_load(self.inner.clone(), source.clone(), use_cache)
                        .boxed()
                        .shared();
                    inflight.insert(source.clone(), fut.clone());
                    fut
                }
            }
        };

        shared.await
    }

    /// Make `source` the observed load. Switching sources discards the previous
    /// progress state.
    fn activate(&self, source: &SourceId) {
        self.inner.progress.send_if_modified(|current| {
            if current.source.as_ref() == Some(source) {
                return false;
            }
            *current = LoadProgress {
                source: Some(source.clone()),
                percent: 0,
                phase: LoadPhase::CheckingCache,
            };
            true
        });
    }
}

fn lock_inflight(inner: &Inner) -> std::sync::MutexGuard<'_, HashMap<SourceId, SharedLoad>> {
    match inner.inflight.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Publish `percent`/`phase` if `source` is still the active source.
fn publish(inner: &Inner, source: &SourceId, percent: u8, phase: LoadPhase) {
    inner.progress.send_if_modified(|current| {
        if current.source.as_ref() != Some(source) {
            return false;
        }
        let next = LoadProgress {
            source: Some(source.clone()),
            percent,
            phase,
        };
        if *current == next {
            return false;
        }
        *current = next;
        true
    });
}

async fn run_load(
    inner: Arc<Inner>,
    source: SourceId,
    use_cache: bool,
) -> Result<Arc<Dataset>, LoadError> {
    let result = load_pipeline(&inner, &source, use_cache).await;

    match &result {
        Ok(_) => publish(&inner, &source, 100, LoadPhase::Complete),
        Err(e) => {
            warn!(%source, error = %e, "Dataset load failed");
            publish(&inner, &source, 0, LoadPhase::Failed);
        }
    }

    lock_inflight(&inner).remove(&source);

    result
}

async fn load_pipeline(
    inner: &Inner,
    source: &SourceId,
    use_cache: bool,
) -> Result<Arc<Dataset>, LoadError> {
    if use_cache {
        publish(inner, source, 0, LoadPhase::CheckingCache);
        if let Some(dataset) = inner.store.get(source.as_str()).await {
            info!(%source, "Loaded dataset from cache");
            return Ok(dataset);
        }
    }

    let dataset = Arc::new(download(inner, source).await?);

    if !inner.store.put(source.as_str(), &dataset).await {
        warn!(%source, "Dataset loaded but not cached");
    }

    Ok(dataset)
}

async fn download(inner: &Inner, source: &SourceId) -> Result<Dataset, LoadError> {
    let stream = inner.fetcher.open(source).await?;
    let mut tracker =
        ProgressTracker::new(stream.content_length, inner.options.progress_scale_bytes);
    let mut chunks = stream.chunks;
    let mut received = Vec::new();

    publish(inner, source, 0, LoadPhase::Downloading);

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        // 100 is reserved for `Complete`, after parsing.
        if let Some(percent) = tracker.advance(chunk.len()) {
            publish(inner, source, percent.min(99), LoadPhase::Downloading);
        }
        received.push(chunk);
    }

    if tracker.is_short() {
        return Err(LoadError::NetworkFailure {
            source_id: source.to_string(),
            reason: format!(
                "stream ended after {} of {} bytes",
                tracker.received(),
                tracker.total().unwrap_or_default()
            ),
        });
    }

    let mut buffer = Vec::with_capacity(tracker.received() as usize);
    for chunk in &received {
        buffer.extend_from_slice(chunk);
    }
    drop(received);

    debug!(%source, bytes = buffer.len(), "Download complete; parsing");
    let dataset = parser::parse_dataset(source.as_str(), &buffer)?;

    info!(
        %source,
        books = dataset.books().len(),
        verses = dataset.verse_count(),
        "Parsed dataset"
    );

    if let Some(percent) = tracker.finish() {
        debug!(%source, percent, "Progress complete");
    }

    Ok(dataset)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
