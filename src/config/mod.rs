// SPDX-License-Identifier: MPL-2.0
//! This module handles the engine's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use lens_browse::config::{self, Config};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.navigation.infinite_scrolling = true;
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use crate::app::paths;
use crate::error::Result;
use defaults::{
    DEFAULT_DECODE_THREADS, DEFAULT_INFINITE_SCROLLING, DEFAULT_USE_PRELOADER, MAX_DECODE_THREADS,
    MIN_DECODE_THREADS,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Settings the orchestrator reads; re-applied on every change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseSettings {
    /// Wrap around at the first and last file.
    pub infinite_scrolling: bool,
    /// Decode the neighbors of the current file ahead of need.
    pub use_preloader: bool,
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self {
            infinite_scrolling: DEFAULT_INFINITE_SCROLLING,
            use_preloader: DEFAULT_USE_PRELOADER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Concurrent decodes run by the loader.
    pub decode_threads: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            decode_threads: DEFAULT_DECODE_THREADS,
        }
    }
}

impl WorkerConfig {
    /// Decode threads clamped to the supported range.
    #[must_use]
    pub fn decode_threads(&self) -> usize {
        self.decode_threads
            .clamp(MIN_DECODE_THREADS, MAX_DECODE_THREADS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub navigation: BrowseSettings,
    pub workers: WorkerConfig,
}

fn get_default_config_path() -> Option<PathBuf> {
    paths::get_app_config_dir().map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the resolved config directory.
///
/// Returns the defaults when no settings file exists yet.
///
/// # Errors
///
/// Returns an error if the settings file exists but cannot be read.
pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

/// Loads the configuration from an explicit config directory.
///
/// # Errors
///
/// Returns an error if the settings file exists but cannot be read.
pub fn load_from_dir(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        load_from_path(&path)
    } else {
        Ok(Config::default())
    }
}

/// Saves the configuration into the resolved config directory.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads a settings file. Invalid TOML yields the defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
        Config::default()
    }))
}

/// Writes a settings file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            navigation: BrowseSettings {
                infinite_scrolling: true,
                use_preloader: false,
            },
            workers: WorkerConfig { decode_threads: 4 },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[navigation]\ninfinite_scrolling = true\n")
            .expect("failed to write toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert!(loaded.navigation.infinite_scrolling);
        assert_eq!(loaded.navigation.use_preloader, DEFAULT_USE_PRELOADER);
        assert_eq!(loaded.workers.decode_threads, DEFAULT_DECODE_THREADS);
    }

    #[test]
    fn load_from_dir_without_file_returns_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let loaded = load_from_dir(temp_dir.path()).expect("load should not error");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn decode_threads_are_clamped() {
        assert_eq!(WorkerConfig { decode_threads: 0 }.decode_threads(), MIN_DECODE_THREADS);
        assert_eq!(
            WorkerConfig { decode_threads: 1000 }.decode_threads(),
            MAX_DECODE_THREADS
        );
    }

    #[test]
    fn default_config_matches_defaults() {
        let config = Config::default();
        assert_eq!(config.navigation.infinite_scrolling, DEFAULT_INFINITE_SCROLLING);
        assert_eq!(config.navigation.use_preloader, DEFAULT_USE_PRELOADER);
        assert_eq!(config.workers.decode_threads(), DEFAULT_DECODE_THREADS);
    }
}
