//! Error types for uc-fs

use crate::config::ConfigFormat;
use std::path::PathBuf;

/// Result type for uc-fs operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A write failed before the target was replaced; the old file is intact.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config content could not be decoded or encoded.
    #[error("Invalid {format} in {path}: {message}")]
    Config {
        path: PathBuf,
        format: ConfigFormat,
        message: String,
    },

    #[error("Unsupported config file {path}: expected .toml or .json")]
    UnsupportedFormat { path: PathBuf },

    /// Another process holds the lock and the OS refused to wait for it.
    #[error("Could not lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn lock(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Lock {
            path: path.into(),
            source,
        }
    }
}
