//! Settings management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory at startup.
pub const SETTINGS_FILE: &str = "dinnye.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Host settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation module, binary or text format.
    pub module_path: PathBuf,
    pub window: WindowSettings,
    /// Output size in pixels the world extent is fitted into.
    pub output_size: f32,
    /// Pending objects draw their size class from `0..size_classes`.
    pub size_classes: u32,
    /// Record stride for modules that do not declare one.
    pub record_stride_words: Option<usize>,
    /// Keep every issued seed and log them on exit.
    pub capture_seeds: bool,
    /// Seeds to issue before falling back to random ones.
    pub replay_seeds: Option<Vec<i32>>,
    /// Maximum `tracing` level: error, warn, info, debug or trace.
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            module_path: PathBuf::from("dinnye.wasm"),
            window: WindowSettings::default(),
            output_size: 720.0,
            size_classes: 5,
            record_stride_words: None,
            capture_seeds: false,
            replay_seeds: None,
            log_level: "info".to_string(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Dinnye".to_string(),
            width: 720,
            height: 720,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str, path: &Path) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json, path)
    }

    /// Load `path` if it exists, otherwise defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply command-line overrides: the first argument names the module.
    pub fn with_args(mut self, mut args: impl Iterator<Item = String>) -> Self {
        if let Some(module) = args.next() {
            self.module_path = PathBuf::from(module);
        }
        self
    }
}
