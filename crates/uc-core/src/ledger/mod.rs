//! The Import Ledger
//!
//! An ordered list of [`ImportEntry`] values bound to one mods directory.
//! Order is render order, and render order is cascade order. Every
//! mutation validates first and either applies fully or leaves the ledger
//! untouched.

mod entry;
pub mod store;

pub use entry::{ImportEntry, SourceKind};
pub use store::{EntryRecord, LedgerFile};

use crate::{Error, Result};
use uc_blocks::ImportLine;
use uc_blocks::grammar::is_renderable_path;
use uc_fs::{ChromePath, normalize_relative};

/// Ordered imports for one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    mods_dir: String,
    entries: Vec<ImportEntry>,
}

impl Ledger {
    /// An empty ledger whose entries must live under `mods_dir`.
    pub fn for_mods_dir(mods_dir: impl Into<String>) -> Self {
        let mods_dir: String = mods_dir.into();
        Self {
            mods_dir: mods_dir.trim_matches('/').to_string(),
            entries: Vec::new(),
        }
    }

    pub fn mods_dir(&self) -> &str {
        &self.mods_dir
    }

    pub fn entries(&self) -> &[ImportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&ImportEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn find_by_path(&self, relative_path: &str) -> Option<&ImportEntry> {
        self.entries.iter().find(|e| e.relative_path == relative_path)
    }

    /// The first entry imported from `location`.
    pub fn find_by_source_location(&self, location: &str) -> Option<&ImportEntry> {
        let location = location.trim();
        if location.is_empty() {
            return None;
        }
        self.entries.iter().find(|e| e.source_location == location)
    }

    /// The lines of the managed block, in order.
    pub fn import_lines(&self) -> Vec<ImportLine> {
        self.entries.iter().map(ImportEntry::import_line).collect()
    }

    /// Check that `relative_path` stays inside the mods directory and can
    /// be rendered. Returns its normalized form.
    pub fn validate_path(&self, relative_path: &str) -> Result<String> {
        let traversal = || Error::PathTraversal {
            path: relative_path.to_string(),
        };
        let normalized = normalize_relative(relative_path).ok_or_else(traversal)?;

        let inside = if self.mods_dir.is_empty() || self.mods_dir == "." {
            true
        } else {
            normalized
                .strip_prefix(self.mods_dir.as_str())
                .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
        };
        let reserved = normalized == ChromePath::Stylesheet.as_str()
            || normalized.starts_with(&format!("{}/", ChromePath::StateDir));
        if !inside || reserved {
            return Err(traversal());
        }

        if !is_renderable_path(&normalized) {
            return Err(Error::InvalidImportPath { path: normalized });
        }
        Ok(normalized)
    }

    /// Append `entry`.
    ///
    /// # Errors
    /// [`Error::DuplicateId`] or [`Error::DuplicatePath`] when either is
    /// already present, [`Error::PathTraversal`] when the path leaves the
    /// mods directory.
    pub fn add(&mut self, mut entry: ImportEntry) -> Result<()> {
        entry.relative_path = self.validate_path(&entry.relative_path)?;
        if entry.id.trim().is_empty() {
            entry.id = ImportEntry::derive_id(&self.mods_dir, &entry.relative_path);
        }
        if self.contains(&entry.id) {
            return Err(Error::DuplicateId { id: entry.id });
        }
        if self.find_by_path(&entry.relative_path).is_some() {
            return Err(Error::DuplicatePath {
                path: entry.relative_path,
            });
        }

        tracing::info!(id = %entry.id, path = %entry.relative_path, "import added");
        self.entries.push(entry);
        Ok(())
    }

    /// Remove and return an entry. Never touches the filesystem.
    pub fn remove(&mut self, id: &str) -> Result<ImportEntry> {
        let index = self.index_of(id)?;
        let entry = self.entries.remove(index);
        tracing::info!(id, "import removed");
        Ok(entry)
    }

    /// Set the enabled flag. Returns whether the value changed.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<bool> {
        let index = self.index_of(id)?;
        let entry = &mut self.entries[index];
        if entry.enabled == enabled {
            return Ok(false);
        }
        entry.enabled = enabled;
        tracing::info!(id, enabled, "import toggled");
        Ok(true)
    }

    /// Move an entry to `new_index`; the other entries keep their relative order.
    pub fn reorder(&mut self, id: &str, new_index: usize) -> Result<()> {
        let index = self.index_of(id)?;
        if new_index >= self.entries.len() {
            return Err(Error::IndexOutOfRange {
                index: new_index,
                len: self.entries.len(),
            });
        }
        let entry = self.entries.remove(index);
        self.entries.insert(new_index, entry);
        tracing::info!(id, from = index, to = new_index, "import moved");
        Ok(())
    }

    pub fn set_version(&mut self, id: &str, version: impl Into<String>) -> Result<()> {
        let index = self.index_of(id)?;
        let version = version.into();
        tracing::info!(id, %version, "import version updated");
        self.entries[index].version = Some(version);
        Ok(())
    }

    /// Replace the entry `id` in place, keeping its position.
    ///
    /// The replacement may change path and id, subject to the same checks
    /// as [`Ledger::add`] against every other entry.
    pub fn replace(&mut self, id: &str, mut entry: ImportEntry) -> Result<()> {
        let index = self.index_of(id)?;
        entry.relative_path = self.validate_path(&entry.relative_path)?;

        for (i, other) in self.entries.iter().enumerate() {
            if i == index {
                continue;
            }
            if other.id == entry.id {
                return Err(Error::DuplicateId { id: entry.id });
            }
            if other.relative_path == entry.relative_path {
                return Err(Error::DuplicatePath {
                    path: entry.relative_path,
                });
            }
        }

        self.entries[index] = entry;
        Ok(())
    }

    /// An id not yet in the ledger: `base`, else `base-2`, `base-3`, ...
    pub fn unique_id(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Remove every entry, returning them in order.
    pub fn clear(&mut self) -> Vec<ImportEntry> {
        tracing::info!(count = self.entries.len(), "all imports removed");
        std::mem::take(&mut self.entries)
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })
    }

    /// Append without validation. Used by reconciliation for lines already
    /// checked against the mods directory.
    pub(crate) fn push_unchecked(&mut self, entry: ImportEntry) {
        self.entries.push(entry);
    }
}
