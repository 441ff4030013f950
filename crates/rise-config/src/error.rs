use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a definition.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The definition file could not be read.
  #[error("failed to read definition file {path}: {source}")]
  Io {
    path: PathBuf,
    source: std::io::Error,
  },

  /// The file extension does not map to a known format.
  #[error("unsupported definition format: {0} (expected .json, .yaml or .yml)")]
  UnsupportedFormat(String),

  #[error("invalid JSON definition: {0}")]
  Json(#[from] serde_json::Error),

  #[error("invalid YAML definition: {0}")]
  Yaml(#[from] serde_yaml::Error),
}
