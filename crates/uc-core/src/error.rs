//! Error types for uc-core

use std::path::PathBuf;

/// Result type for uc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in uc-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An entry with this id is already in the ledger
    #[error("An import with id '{id}' already exists")]
    DuplicateId { id: String },

    /// Two entries would import the same stylesheet
    #[error("'{path}' is already imported")]
    DuplicatePath { path: String },

    /// No entry with this id
    #[error("No import with id '{id}'")]
    NotFound { id: String },

    /// Reorder target outside the ledger
    #[error("Index {index} is out of range for {len} imports")]
    IndexOutOfRange { index: usize, len: usize },

    /// A start marker without a matching end marker
    #[error("Managed block in {path} starting at line {line} is never closed")]
    CorruptManagedBlock { path: PathBuf, line: usize },

    /// The path resolves outside the mods directory
    #[error("Path '{path}' escapes the mods directory")]
    PathTraversal { path: String },

    /// The path cannot be written into an import line
    #[error("Path '{path}' cannot be used in an @import line")]
    InvalidImportPath { path: String },

    /// A write failed before the target was replaced; the old file is intact
    #[error("Failed to write {path}: {source}")]
    FilesystemWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing installed mod files failed; the ledger was already updated
    #[error("Failed to remove {path}: {source}")]
    ArtifactRemoval {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Download, timeout, HTTP status or archive failure
    #[error(transparent)]
    NetworkFetch(#[from] uc_fetch::Error),

    /// The fetch was started for a session that has since been closed or replaced
    #[error("Fetch result discarded: the profile session changed while it was running")]
    StaleFetch,

    /// The source was imported before; use an update instead
    #[error("'{location}' is already imported as '{id}'")]
    AlreadyImported { id: String, location: String },

    /// The entry has no remote source to update from
    #[error("Import '{id}' is not from a remote source")]
    NotUpdatable { id: String },

    #[error("Profile not found: {query}")]
    ProfileNotFound { query: String },

    /// A folder import without `userChrome.css`, `mod.css`, or a single stylesheet
    #[error("No entry stylesheet found in {path}")]
    NoEntryStylesheet { path: PathBuf },

    #[error("{path} is {size} bytes, over the {limit} byte limit")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// The import source is missing or of the wrong kind
    #[error("Cannot import {path}: {reason}")]
    InvalidSource { path: PathBuf, reason: String },

    /// Following the mod's `@import`s leads back to `userChrome.css` or to
    /// a stylesheet already on the chain
    #[error("{path} imports '{import}', which leads back into its own import chain")]
    CircularImport { path: PathBuf, import: String },

    #[error("Backup not found: {name}")]
    BackupNotFound { name: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from uc-fs
    #[error(transparent)]
    Fs(uc_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl From<uc_fs::Error> for Error {
    fn from(err: uc_fs::Error) -> Self {
        match err {
            uc_fs::Error::Write { path, source } => Self::FilesystemWrite { path, source },
            other => Self::Fs(other),
        }
    }
}

impl Error {
    /// True for errors caused by the network rather than local state.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::NetworkFetch(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_write_errors_become_filesystem_write() {
        let err: Error = uc_fs::Error::write(
            "/p/chrome/userChrome.css",
            std::io::Error::other("disk full"),
        )
        .into();
        assert!(matches!(err, Error::FilesystemWrite { .. }));
        assert!(err.to_string().contains("userChrome.css"));
    }

    #[test]
    fn other_fs_errors_stay_wrapped() {
        let err: Error = uc_fs::Error::lock(
            PathBuf::from("/p/chrome/.ucloader/lock"),
            std::io::Error::other("would block"),
        )
        .into();
        assert!(matches!(err, Error::Fs(_)));
    }
}
