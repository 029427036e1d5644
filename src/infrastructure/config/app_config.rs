//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;
use crate::domain::entities::GenerationSettings;

pub(super) const APP_NAME: &str = "dbthumb";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory of payload files when `cache_in_file` is on.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// File holding persisted options (settings fingerprint, dictionary prefix).
    #[serde(default)]
    pub state_path: Option<PathBuf>,

    /// Thumbnail generation settings.
    #[serde(default)]
    pub thumbnail: GenerationSettings,
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(cache_dir) = &args.cache_dir {
            self.cache_dir = Some(cache_dir.clone());
        }
        if let Some(state_path) = &args.state_path {
            self.state_path = Some(state_path.clone());
        }
        if let Some(image_size) = args.image_size {
            self.thumbnail.image_size = image_size;
        }
        if let Some(jpeg_quality) = args.jpeg_quality {
            self.thumbnail.jpeg_quality = jpeg_quality;
        }
        if let Some(compress) = args.compress {
            self.thumbnail.compress = compress;
        }
        if let Some(cache_in_file) = args.cache_in_file {
            self.thumbnail.cache_in_file = cache_in_file;
        }
        if let Some(store_color) = args.store_color {
            self.thumbnail.store_color = store_color;
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("dbthumb.log"))
    }

    /// Returns default payload cache directory.
    #[must_use]
    pub fn default_cache_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.cache_dir().join("payloads"))
    }

    /// Returns default options file path.
    #[must_use]
    pub fn default_state_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("state.toml"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }

    /// Returns effective payload cache directory.
    #[must_use]
    pub fn effective_cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir.clone().or_else(Self::default_cache_dir)
    }

    /// Returns effective options file path.
    #[must_use]
    pub fn effective_state_path(&self) -> Option<PathBuf> {
        self.state_path.clone().or_else(Self::default_state_path)
    }
}
