//! Configuration file loading with precedence handling.

use crate::model::catalog::DEFAULT_SOURCE;
use crate::model::SourceId;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default host serving `{source}.json` dataset documents.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/thiagobodruk/bible/master/json";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value is syntactically valid but unusable (e.g. an empty source id).
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Config key.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/versepad/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Base URL serving `{source}.json`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Dataset opened when nothing was saved from a previous run.
    #[serde(default)]
    pub default_source: Option<String>,

    /// Directory holding the dataset cache.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Byte scale of the progress curve used when the size is not advertised.
    #[serde(default)]
    pub progress_scale_bytes: Option<u64>,

    /// Whole-request timeout for dataset downloads.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Touch gesture thresholds.
    #[serde(default)]
    pub gestures: Option<GestureSection>,
}

/// `[gestures]` table.
///
/// ```toml
/// [gestures]
/// long_press_ms = 300
/// delete_threshold_px = 80.0
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GestureSection {
    /// Long-press duration in milliseconds.
    #[serde(default)]
    pub long_press_ms: Option<u64>,
    /// Movement in pixels that turns a press into a swipe.
    #[serde(default)]
    pub jitter_px: Option<f32>,
    /// Largest swipe offset shown, in pixels.
    #[serde(default)]
    pub max_swipe_px: Option<f32>,
    /// Leftward swipe distance that deletes on release.
    #[serde(default)]
    pub delete_threshold_px: Option<f32>,
    /// Vertical drift above which a swipe never deletes.
    #[serde(default)]
    pub max_vertical_px: Option<f32>,
}

/// Thresholds for the touch gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Stationary press duration that enters drag mode.
    pub long_press: Duration,
    /// Movement that cancels the long press and starts a swipe.
    pub jitter_px: f32,
    /// Largest swipe offset shown.
    pub max_swipe_px: f32,
    /// Leftward displacement that deletes on release.
    pub delete_threshold_px: f32,
    /// Vertical drift above which a swipe never deletes.
    pub max_vertical_px: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press: Duration::from_millis(300),
            jitter_px: 10.0,
            max_swipe_px: 100.0,
            delete_threshold_px: 80.0,
            max_vertical_px: 30.0,
        }
    }
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Base URL serving dataset documents.
    pub base_url: String,
    /// Dataset used when none was saved.
    pub default_source: SourceId,
    /// Cache directory.
    pub cache_dir: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Progress curve scale for unknown-length downloads.
    pub progress_scale_bytes: u64,
    /// Download timeout.
    pub request_timeout: Duration,
    /// Gesture thresholds.
    pub gestures: GestureConfig,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_source: default_source_id(),
            cache_dir: default_cache_dir(),
            log_file_path: default_log_path(),
            progress_scale_bytes: 4 * 1024 * 1024,
            request_timeout: Duration::from_secs(120),
            gestures: GestureConfig::default(),
        }
    }
}

fn default_source_id() -> SourceId {
    SourceId::from_static(DEFAULT_SOURCE)
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/versepad/versepad.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("versepad").join("versepad.log")
    } else {
        PathBuf::from("versepad.log")
    }
}

/// Resolve default cache directory (`~/.cache/versepad` on Linux).
pub fn default_cache_dir() -> PathBuf {
    if let Some(cache_dir) = dirs::cache_dir() {
        cache_dir.join("versepad")
    } else {
        PathBuf::from(".versepad-cache")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/versepad/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("versepad").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `VERSEPAD_CONFIG` environment variable
/// 3. Default path `~/.config/versepad/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("VERSEPAD_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
///
/// # Errors
///
/// `InvalidValue` if `default_source` is not a valid source id.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let default_source = match config.default_source {
        Some(raw) => SourceId::new(raw).map_err(|e| ConfigError::InvalidValue {
            field: "default_source",
            reason: e.to_string(),
        })?,
        None => defaults.default_source,
    };

    let gestures = merge_gestures(defaults.gestures, config.gestures.unwrap_or_default());

    Ok(ResolvedConfig {
        base_url: config.base_url.unwrap_or(defaults.base_url),
        default_source,
        cache_dir: config.cache_dir.unwrap_or(defaults.cache_dir),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        progress_scale_bytes: config
            .progress_scale_bytes
            .filter(|scale| *scale > 0)
            .unwrap_or(defaults.progress_scale_bytes),
        request_timeout: config
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout),
        gestures,
    })
}

fn merge_gestures(defaults: GestureConfig, section: GestureSection) -> GestureConfig {
    GestureConfig {
        long_press: section
            .long_press_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.long_press),
        jitter_px: section.jitter_px.unwrap_or(defaults.jitter_px),
        max_swipe_px: section.max_swipe_px.unwrap_or(defaults.max_swipe_px),
        delete_threshold_px: section
            .delete_threshold_px
            .unwrap_or(defaults.delete_threshold_px),
        max_vertical_px: section.max_vertical_px.unwrap_or(defaults.max_vertical_px),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `VERSEPAD_BASE_URL`: Override base URL
/// - `VERSEPAD_SOURCE`: Override default source (ignored if invalid)
/// - `VERSEPAD_CACHE_DIR`: Override cache directory
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(base_url) = std::env::var("VERSEPAD_BASE_URL") {
        config.base_url = base_url;
    }

    if let Ok(source) = std::env::var("VERSEPAD_SOURCE") {
        match SourceId::new(source) {
            Ok(id) => config.default_source = id,
            Err(e) => tracing::warn!(error = %e, "Ignoring invalid VERSEPAD_SOURCE"),
        }
    }

    if let Ok(cache_dir) = std::env::var("VERSEPAD_CACHE_DIR") {
        config.cache_dir = PathBuf::from(cache_dir);
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    base_url_override: Option<String>,
    cache_dir_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(base_url) = base_url_override {
        config.base_url = base_url;
    }

    if let Some(cache_dir) = cache_dir_override {
        config.cache_dir = cache_dir;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
