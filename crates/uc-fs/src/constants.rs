//! Well-known names inside a profile's chrome directory.

use std::path::Path;

/// Standard chrome-directory markers and paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromePath {
    /// The `chrome` directory inside a profile
    ChromeDir,
    /// The root stylesheet the browser loads
    Stylesheet,
    /// The loader's private state directory inside `chrome`
    StateDir,
    /// The sidecar ledger file inside the state directory
    LedgerFile,
    /// The cross-process lock file inside the state directory
    LockFile,
    /// The stylesheet backups directory inside the state directory
    BackupsDir,
    /// Scratch space for downloads inside the state directory
    StagingDir,
}

impl ChromePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChromeDir => "chrome",
            Self::Stylesheet => "userChrome.css",
            Self::StateDir => ".ucloader",
            Self::LedgerFile => "ledger.toml",
            Self::LockFile => "lock",
            Self::BackupsDir => "backups",
            Self::StagingDir => "staging",
        }
    }
}

impl AsRef<Path> for ChromePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ChromePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ChromePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
