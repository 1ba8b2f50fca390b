//! Sidecar persistence for ledger metadata.
//!
//! The stylesheet only carries path, enabled flag and order. Everything
//! else about an entry lives in `chrome/.ucloader/ledger.toml`, keyed by
//! relative path:
//!
//! ```toml
//! version = "1"
//!
//! [mods."mods/nord/mod.css"]
//! id = "nord"
//! source = "github-repo"
//! source_location = "https://github.com/someone/nord"
//! version = "3f1c..."
//! imported_at = "2026-10-16T09:30:00Z"
//! ```

use super::{ImportEntry, Ledger, SourceKind};
use crate::Result;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Read;
use std::path::Path;

const FORMAT_VERSION: &str = "1";

/// Metadata for one entry, without the fields the stylesheet owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: String,
    pub source: SourceKind,
    #[serde(default)]
    pub source_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub imported_at: DateTime<Utc>,
}

impl From<&ImportEntry> for EntryRecord {
    fn from(entry: &ImportEntry) -> Self {
        Self {
            id: entry.id.clone(),
            source: entry.source,
            source_location: entry.source_location.clone(),
            version: entry.version.clone(),
            imported_at: entry.imported_at,
        }
    }
}

impl EntryRecord {
    /// Rebuild the full entry from this record and the stylesheet's view.
    pub fn to_entry(&self, relative_path: &str, enabled: bool) -> ImportEntry {
        ImportEntry {
            id: self.id.clone(),
            relative_path: relative_path.to_string(),
            source: self.source,
            source_location: self.source_location.clone(),
            enabled,
            version: self.version.clone(),
            imported_at: self.imported_at,
        }
    }
}

/// The on-disk sidecar document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFile {
    pub version: String,
    #[serde(default)]
    pub mods: BTreeMap<String, EntryRecord>,
}

impl Default for LedgerFile {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            mods: BTreeMap::new(),
        }
    }
}

impl LedgerFile {
    /// Snapshot the metadata of every entry in `ledger`.
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            mods: ledger
                .entries()
                .iter()
                .map(|e| (e.relative_path.clone(), EntryRecord::from(e)))
                .collect(),
            ..Self::default()
        }
    }

    pub fn record(&self, relative_path: &str) -> Option<&EntryRecord> {
        self.mods.get(relative_path)
    }

    /// Load the sidecar under a shared lock. A missing or empty file is empty.
    pub fn load(path: &Path) -> Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(uc_fs::Error::io(path, e).into()),
        };
        file.lock_shared()?;

        // Read through the locked handle
        let mut content = String::new();
        (&file).read_to_string(&mut content)?;
        // `save` creates the file to lock it before the content is written.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let sidecar: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), records = sidecar.mods.len(), "loaded sidecar");
        Ok(sidecar)
    }

    /// Save the sidecar atomically under an exclusive lock.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| uc_fs::Error::write(parent, e))?;
        }
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| uc_fs::Error::write(path, e))?;
        lock_file.lock_exclusive()?;

        uc_fs::io::write_atomic(path, content.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ucloader").join("ledger.toml");

        let mut ledger = Ledger::for_mods_dir("mods");
        ledger
            .add(
                ImportEntry::new(
                    "nord",
                    "mods/nord/mod.css",
                    SourceKind::GithubRepo,
                    "someone/nord",
                )
                .with_version("0123456789abcdef0123456789abcdef01234567"),
            )
            .unwrap();
        let sidecar = LedgerFile::from_ledger(&ledger);

        sidecar.save(&path).unwrap();
        let loaded = LedgerFile::load(&path).unwrap();

        assert_eq!(loaded, sidecar);
        let record = loaded.record("mods/nord/mod.css").unwrap();
        assert_eq!(record.source, SourceKind::GithubRepo);
    }

    #[test]
    fn missing_sidecar_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = LedgerFile::load(&dir.path().join("ledger.toml")).unwrap();
        assert!(loaded.mods.is_empty());
        assert_eq!(loaded.version, "1");
    }

    #[test]
    fn empty_sidecar_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        std::fs::write(&path, "").unwrap();
        assert!(LedgerFile::load(&path).unwrap().mods.is_empty());
    }

    #[test]
    fn source_serializes_kebab_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.toml");
        let mut ledger = Ledger::for_mods_dir("mods");
        ledger
            .add(ImportEntry::new(
                "a",
                "mods/a.css",
                SourceKind::DirectUrl,
                "https://example.com/a.css",
            ))
            .unwrap();

        LedgerFile::from_ledger(&ledger).save(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("source = \"direct-url\""), "{text}");
    }
}
