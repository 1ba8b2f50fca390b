//! Where the loader's files live inside a profile's chrome directory.

use std::path::{Path, PathBuf};
use uc_fs::{ChromePath, join_relative};

/// Resolved paths for one chrome directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeLayout {
    chrome_dir: PathBuf,
    mods_dir: String,
}

impl ChromeLayout {
    /// `mods_dir` is relative to `chrome_dir`, forward-slashed.
    pub fn new(chrome_dir: impl Into<PathBuf>, mods_dir: impl Into<String>) -> Self {
        let mods_dir: String = mods_dir.into();
        Self {
            chrome_dir: chrome_dir.into(),
            mods_dir: mods_dir.trim_matches('/').to_string(),
        }
    }

    pub fn chrome_dir(&self) -> &Path {
        &self.chrome_dir
    }

    /// The mods directory name relative to chrome, e.g. `mods`.
    pub fn mods_dir_name(&self) -> &str {
        &self.mods_dir
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.resolve(&self.mods_dir)
    }

    pub fn stylesheet(&self) -> PathBuf {
        self.chrome_dir.join(ChromePath::Stylesheet)
    }

    pub fn state_dir(&self) -> PathBuf {
        self.chrome_dir.join(ChromePath::StateDir)
    }

    pub fn ledger_file(&self) -> PathBuf {
        self.state_dir().join(ChromePath::LedgerFile)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.state_dir().join(ChromePath::LockFile)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.state_dir().join(ChromePath::BackupsDir)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.state_dir().join(ChromePath::StagingDir)
    }

    /// Native path for a chrome-relative forward-slash path.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        join_relative(&self.chrome_dir, relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_hang_off_chrome_dir() {
        let layout = ChromeLayout::new("/p/chrome", "mods/");
        assert_eq!(layout.mods_dir_name(), "mods");
        assert_eq!(layout.mods_dir(), PathBuf::from("/p/chrome/mods"));
        assert_eq!(layout.stylesheet(), PathBuf::from("/p/chrome/userChrome.css"));
        assert_eq!(
            layout.ledger_file(),
            PathBuf::from("/p/chrome/.ucloader/ledger.toml")
        );
        assert_eq!(
            layout.resolve("mods/nord/mod.css"),
            PathBuf::from("/p/chrome/mods/nord/mod.css")
        );
    }
}
