//! Configuration module.
//!
//! - [`loader`]: TOML config file with defaults → file → env → CLI precedence
//! - [`settings`]: small JSON settings file remembering the last dataset

pub mod loader;
pub mod settings;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_cache_dir, default_config_path,
    default_log_path, load_config_file, load_config_with_precedence, merge_config, ConfigError,
    ConfigFile, GestureConfig, GestureSection, ResolvedConfig, DEFAULT_BASE_URL,
};
pub use settings::{default_settings_path, Settings, SettingsError, SettingsStore};
