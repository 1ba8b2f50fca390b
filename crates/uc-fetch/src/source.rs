//! The fetcher seam shared by every remote source kind.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of remote source a mod was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteKind {
    DirectUrl,
    GithubRepo,
}

impl RemoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectUrl => "direct-url",
            Self::GithubRepo => "github-repo",
        }
    }
}

impl fmt::Display for RemoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mod materialized into a staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMod {
    pub source: RemoteKind,
    /// The location as the user gave it, trimmed.
    pub source_location: String,
    /// Version token to store on the ledger entry.
    pub version: String,
    /// A `.css` file for direct URLs, a directory for repositories.
    pub path: PathBuf,
    /// Suggested (unsanitized) name for the installed file or folder.
    pub name: String,
}

impl FetchedMod {
    pub fn is_folder(&self) -> bool {
        self.path.is_dir()
    }
}

/// A remote source strategy.
///
/// Implementations block; callers that must stay responsive go through
/// [`crate::dispatch`].
pub trait SourceFetcher: Send + Sync {
    fn kind(&self) -> RemoteKind;

    /// Download `location` into `staging` and report its version token.
    fn fetch(&self, location: &str, staging: &Path) -> Result<FetchedMod>;

    /// Query the current remote version token without installing anything.
    fn remote_version(&self, location: &str) -> Result<String>;
}
