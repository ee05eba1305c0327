//! Error types for dashgen-core.

use std::path::PathBuf;

use thiserror::Error;

/// The resource tree could not be listed at some directory.
///
/// Always fatal: a walk that hits this discards everything it collected.
#[derive(Debug, Error)]
#[error("failed to read resource directory '{dir}': {source}")]
pub struct ReadError {
    /// Logical, forward-slash directory path (`""` is the tree root).
    pub dir: String,
    #[source]
    pub source: std::io::Error,
}

impl ReadError {
    pub(crate) fn new(dir: &str, source: std::io::Error) -> Self {
        ReadError {
            dir: display_dir(dir).to_string(),
            source,
        }
    }
}

fn display_dir(dir: &str) -> &str {
    if dir.is_empty() {
        "."
    } else {
        dir
    }
}

/// All errors that can arise while loading generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },

    /// Underlying I/O failure while reading the config file.
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
