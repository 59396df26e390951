//! Lightweight durable settings: the last-chosen dataset.
//!
//! Stored as a small JSON document so the next start can reopen the same dataset.

use crate::model::SourceId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("Failed to access settings at {path:?}: {source}")]
    Io {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON.
    #[error("Corrupt settings file at {path:?}: {source}")]
    Corrupt {
        /// Settings file path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Persisted user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Dataset selected most recently.
    #[serde(default)]
    pub last_source: Option<SourceId>,
}

/// Default settings path: `~/.local/state/versepad/settings.json`.
pub fn default_settings_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("versepad").join("settings.json")
    } else {
        PathBuf::from("versepad-settings.json")
    }
}

/// File-backed settings store.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Settings stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings; a missing file yields defaults.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|source| SettingsError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Write settings, creating the parent directory if needed.
    ///
    /// Writes to a sibling temp file and renames it over the target.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_vec_pretty(settings).map_err(|source| SettingsError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }

    /// Record `source` as the last selection, keeping other settings.
    pub fn remember_source(&self, source: &SourceId) -> Result<(), SettingsError> {
        let mut settings = self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Replacing unreadable settings file");
            Settings::default()
        });
        if settings.last_source.as_ref() == Some(source) {
            return Ok(());
        }
        settings.last_source = Some(source.clone());
        self.save(&settings)
    }
}
