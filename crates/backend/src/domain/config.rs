//! Configuration for gitrank.
//!
//! Config priority: `$GITRANK_CONFIG` > `$XDG_CONFIG_HOME/gitrank/config.toml` >
//! platform config dir > built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use crate::{actor::reader::ReaderOptions, pipeline::PipelineOptions};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "GITRANK_CONFIG";

// ============================================================================
// Pipeline Configuration
// ============================================================================

/// Streaming and ranking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
  /// Pending records per input queue before the reader blocks
  /// Default: 10
  #[serde(default = "default_queue_capacity")]
  pub queue_capacity: usize,

  /// Longest record a reader accepts, in bytes
  /// Default: 65536
  #[serde(default = "default_max_record_len")]
  pub max_record_len: usize,

  /// Number of entries returned when no count is given
  /// Default: 10
  #[serde(default = "default_count")]
  pub count: usize,
}

fn default_queue_capacity() -> usize {
  10
}
fn default_max_record_len() -> usize {
  64 * 1024
}
fn default_count() -> usize {
  10
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      queue_capacity: default_queue_capacity(),
      max_record_len: default_max_record_len(),
      count: default_count(),
    }
  }
}

// ============================================================================
// Event Tags
// ============================================================================

/// Literal event-type tags as they appear in the events file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventTags {
  pub watch: String,
  pub push: String,
  pub create: String,
}

impl Default for EventTags {
  fn default() -> Self {
    Self {
      watch: "WatchEvent".to_string(),
      push: "PushEvent".to_string(),
      create: "CreateEvent".to_string(),
    }
  }
}

// ============================================================================
// Logging Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log level: "off", "error", "warn", "info", "debug", "trace"
  /// Default: "info"
  pub level: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
    }
  }
}

// ============================================================================
// Root Configuration
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  pub pipeline: PipelineConfig,
  pub events: EventTags,
  pub logging: LoggingConfig,
}

/// A config file that exists but could not be used
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("invalid config {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

impl Config {
  /// Load the first config file found, falling back to defaults.
  ///
  /// Nothing is logged here since this runs before logging is set up. An
  /// unreadable or invalid file is returned alongside the defaults for the
  /// caller to report.
  pub fn load() -> (Self, Option<ConfigError>) {
    Self::load_or_default(Self::config_path().as_deref())
  }

  fn load_or_default(path: Option<&Path>) -> (Self, Option<ConfigError>) {
    match path.map(Self::load_from).transpose() {
      Ok(config) => (config.flatten().unwrap_or_default(), None),
      Err(e) => (Self::default(), Some(e)),
    }
  }

  /// Load a specific file. Returns `Ok(None)` if it does not exist.
  pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
    if !path.exists() {
      return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(Some(config))
  }

  /// Get the config path that would be consulted
  pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
      return Some(PathBuf::from(path));
    }

    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
      return Some(PathBuf::from(path).join("gitrank").join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("gitrank").join("config.toml"))
  }

  /// Pipeline options derived from this config
  pub fn pipeline_options(&self) -> PipelineOptions {
    PipelineOptions {
      queue_capacity: self.pipeline.queue_capacity,
      reader: ReaderOptions::with_max_record_len(self.pipeline.max_record_len),
      tags: self.events.clone(),
    }
  }
}
