//! Application root.
//!
//! [`App`] owns every long-lived component: the dataset loader (with its store and
//! fetcher), the clipboard, the gesture controller, navigation and the settings file.
//! Nothing in the crate is a global; front ends build one `App` and drive it.

use crate::config::{ResolvedConfig, SettingsStore};
use crate::loader::{DatasetLoader, LoaderOptions};
use crate::model::{AppError, Dataset, EntryId, NavigationError, SourceId};
use crate::source::{HttpFetcher, ResourceFetcher};
use crate::state::{
    ClipboardModel, ClipboardSink, GestureController, GestureEvent, GestureOutcome,
    LongPressScheduler, SessionToken, TokioScheduler, ViewCoordinator,
};
use crate::store::{FileStore, PersistentStore};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Application state: loader, clipboard, gestures, navigation and settings.
pub struct App {
    config: ResolvedConfig,
    loader: DatasetLoader,
    clipboard: ClipboardModel,
    gestures: GestureController,
    navigation: ViewCoordinator,
    settings: SettingsStore,
    source_override: Option<SourceId>,
    current: Option<(SourceId, Arc<Dataset>)>,
    long_press_rx: Option<mpsc::UnboundedReceiver<SessionToken>>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("navigation", &self.navigation)
            .field("clipboard_len", &self.clipboard.len())
            .field("current", &self.current.as_ref().map(|(id, _)| id))
            .finish_non_exhaustive()
    }
}

impl App {
    /// Assemble an app from explicit parts.
    pub fn new(
        config: ResolvedConfig,
        settings: SettingsStore,
        store: PersistentStore,
        fetcher: Arc<dyn ResourceFetcher>,
        sink: Box<dyn ClipboardSink>,
        scheduler: Box<dyn LongPressScheduler>,
    ) -> Self {
        let loader = DatasetLoader::new(
            store,
            fetcher,
            LoaderOptions {
                progress_scale_bytes: config.progress_scale_bytes,
            },
        );
        let gestures = GestureController::new(config.gestures, scheduler);
        Self {
            config,
            loader,
            clipboard: ClipboardModel::new(sink),
            gestures,
            navigation: ViewCoordinator::new(),
            settings,
            source_override: None,
            current: None,
            long_press_rx: None,
        }
    }

    /// The production wiring: HTTP fetcher, file cache under `config.cache_dir` and
    /// tokio long-press timers. Must be called inside a tokio runtime.
    ///
    /// # Errors
    /// `AppError::Load` if the HTTP client cannot be built.
    pub fn with_http(
        config: ResolvedConfig,
        settings: SettingsStore,
        sink: Box<dyn ClipboardSink>,
    ) -> Result<Self, AppError> {
        let fetcher = HttpFetcher::new(config.base_url.clone(), config.request_timeout)?;
        let store = PersistentStore::new(Arc::new(FileStore::new(&config.cache_dir)));
        let (scheduler, rx) = TokioScheduler::channel();

        let mut app = Self::new(
            config,
            settings,
            store,
            Arc::new(fetcher),
            sink,
            Box::new(scheduler),
        );
        app.long_press_rx = Some(rx);
        Ok(app)
    }

    /// Resolved configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The dataset loader (subscribe here for progress).
    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    /// The verse clipboard.
    pub fn clipboard(&self) -> &ClipboardModel {
        &self.clipboard
    }

    /// Mutable access to the clipboard, for front ends that edit it directly.
    pub fn clipboard_mut(&mut self) -> &mut ClipboardModel {
        &mut self.clipboard
    }

    /// The gesture controller, for item feedback via [`GestureController::visual`].
    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    /// Books / chapter / verse selector.
    pub fn navigation(&self) -> &ViewCoordinator {
        &self.navigation
    }

    /// The dataset currently open, with its id.
    pub fn current(&self) -> Option<(&SourceId, &Arc<Dataset>)> {
        self.current.as_ref().map(|(id, data)| (id, data))
    }

    /// Force the startup dataset (command line `--source`).
    pub fn set_source_override(&mut self, source: Option<SourceId>) {
        self.source_override = source;
    }

    /// Dataset to open first: explicit override, else the last one saved, else the
    /// configured default.
    pub fn startup_source(&self) -> SourceId {
        if let Some(source) = &self.source_override {
            return source.clone();
        }
        match self.settings.load() {
            Ok(settings) => settings
                .last_source
                .unwrap_or_else(|| self.config.default_source.clone()),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable settings");
                self.config.default_source.clone()
            }
        }
    }

    /// Load `source` (cache first, falling back to the cache after a failed
    /// download), remember it as the last choice and go back to the books screen.
    ///
    /// # Errors
    /// `AppError::Load` when neither the network nor the cache can provide it.
    pub async fn open(&mut self, source: &SourceId) -> Result<Arc<Dataset>, AppError> {
        let dataset = self.loader.load_with_fallback(source).await?;
        self.install(source, dataset.clone());
        Ok(dataset)
    }

    /// Like [`open`](Self::open) but re-downloads even when a cached copy exists.
    /// The cached copy is still used if the download fails.
    pub async fn refresh(&mut self, source: &SourceId) -> Result<Arc<Dataset>, AppError> {
        let dataset = match self.loader.refresh(source).await {
            Ok(dataset) => dataset,
            Err(err) => match self.loader.store().get(source.as_str()).await {
                Some(cached) => {
                    warn!(%source, error = %err, "Refresh failed; keeping cached copy");
                    cached
                }
                None => return Err(err.into()),
            },
        };
        self.install(source, dataset.clone());
        Ok(dataset)
    }

    fn install(&mut self, source: &SourceId, dataset: Arc<Dataset>) {
        if let Err(e) = self.settings.remember_source(source) {
            warn!(error = %e, "Could not save selected dataset");
        }
        info!(%source, books = dataset.books().len(), "Dataset opened");
        self.navigation.reset();
        self.current = Some((source.clone(), dataset));
    }

    /// Copy one verse (0-based chapter and verse) of the open dataset to the clipboard.
    ///
    /// # Errors
    /// `NoDataset` before anything was opened; `Navigation` for a book, chapter or
    /// verse that does not exist.
    pub fn copy_verse(
        &mut self,
        book: &str,
        chapter: usize,
        verse: usize,
    ) -> Result<EntryId, AppError> {
        let (_, dataset) = self.current.as_ref().ok_or(AppError::NoDataset)?;
        let found = dataset
            .book(book)
            .ok_or_else(|| NavigationError::UnknownBook(book.to_string()))?;
        let chapter_verses =
            found
                .chapter(chapter)
                .ok_or_else(|| NavigationError::ChapterOutOfRange {
                    book: found.abbreviation().to_string(),
                    chapter,
                })?;
        let text = chapter_verses
            .get(verse)
            .ok_or_else(|| NavigationError::VerseOutOfRange {
                book: found.abbreviation().to_string(),
                chapter,
                verse,
            })?;

        Ok(self.clipboard.add(
            found.abbreviation(),
            chapter,
            verse,
            text,
            found.display_name(),
        ))
    }

    /// Open the chapter list of `book` in the current dataset.
    pub fn select_book(&mut self, book: &str) -> Result<(), AppError> {
        let (_, dataset) = self.current.as_ref().ok_or(AppError::NoDataset)?;
        self.navigation.select_book(dataset, book)?;
        Ok(())
    }

    /// Open the verse list of the 0-based `chapter` of the selected book.
    pub fn select_chapter(&mut self, chapter: usize) -> Result<(), AppError> {
        let (_, dataset) = self.current.as_ref().ok_or(AppError::NoDataset)?;
        self.navigation.select_chapter(dataset, chapter)?;
        Ok(())
    }

    /// Go up one screen. Returns `false` when already on the books screen.
    pub fn back(&mut self) -> bool {
        self.navigation.back()
    }

    /// Feed one input event to the gesture controller.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> GestureOutcome {
        self.gestures.handle(event, &mut self.clipboard)
    }

    /// Wait for the next long-press expiry and apply it. `None` when this app has no
    /// timer channel or the channel closed.
    pub async fn next_long_press(&mut self) -> Option<GestureOutcome> {
        let token = self.long_press_rx.as_mut()?.recv().await?;
        Some(self.handle_gesture(GestureEvent::LongPressElapsed(token)))
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
