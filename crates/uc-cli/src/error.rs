//! Error types for uc-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from uc-core
    #[error(transparent)]
    Core(#[from] uc_core::Error),

    /// Error from uc-fetch
    #[error(transparent)]
    Fetch(#[from] uc_fetch::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// True when the failure came from a download or API request.
    pub fn is_network(&self) -> bool {
        match self {
            Self::Core(err) => err.is_network(),
            Self::Fetch(_) => true,
            _ => false,
        }
    }
}
