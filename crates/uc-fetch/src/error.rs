//! Error types for uc-fetch

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid source location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed with HTTP status {status}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("Response from {url} exceeds the {limit} byte limit")]
    TooLarge { url: String, limit: u64 },

    #[error("Unexpected response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Malformed archive: {message}")]
    MalformedArchive { message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Background task failed: {message}")]
    Dispatch { message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocation {
            location: location.into(),
            reason: reason.into(),
        }
    }
}
