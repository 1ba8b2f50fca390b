//! Per-profile sessions
//!
//! A [`ProfileSession`] is the command surface for one profile. Every
//! mutation runs under the profile's in-process mutex and an exclusive lock
//! on `.ucloader/lock`, loads the ledger fresh from disk, applies the change,
//! then writes the stylesheet and the sidecar together. A failing step leaves
//! both files as they were.
//!
//! Network results are applied through a [`FetchTicket`]. Closing the session,
//! or selecting another profile, bumps the session's generation and turns
//! outstanding tickets stale.

use crate::backup::BackupInfo;
use crate::config::AppConfig;
use crate::install::{self, ConflictPolicy};
use crate::layout::ChromeLayout;
use crate::ledger::{ImportEntry, Ledger, SourceKind};
use crate::profile::Profile;
use crate::sync::Synchronizer;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tempfile::TempDir;
use uc_fetch::{FetchedMod, UpdateQuery};
use uc_fs::io::FileLock;

/// Hands out sessions and serializes sessions on the same profile.
#[derive(Debug, Default)]
pub struct SessionManager {
    config: AppConfig,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
    selected: Mutex<Option<Arc<AtomicU64>>>,
}

impl SessionManager {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            locks: Mutex::new(HashMap::new()),
            selected: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Open a session without affecting other sessions.
    pub fn open(&self, profile: Profile) -> ProfileSession {
        let key = dunce::canonicalize(&profile.path).unwrap_or_else(|_| profile.path.clone());
        let guard = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key).or_default())
        };
        let layout = ChromeLayout::new(profile.chrome_dir(), self.config.mods_dir.clone());
        tracing::debug!(profile = %profile.path.display(), "session opened");

        ProfileSession {
            sync: Synchronizer::new(layout, self.config.max_backups),
            profile,
            guard,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Open a session and make it the selected one.
    ///
    /// Fetches started on the previously selected session become stale.
    pub fn select(&self, profile: Profile) -> ProfileSession {
        let session = self.open(profile);
        let mut selected = self.selected.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = selected.replace(Arc::clone(&session.generation)) {
            previous.fetch_add(1, Ordering::SeqCst);
        }
        session
    }
}

/// Proof that a fetch was started on a particular session generation.
///
/// Owns a scratch directory under `.ucloader/staging` that is deleted when
/// the ticket is dropped.
#[derive(Debug)]
pub struct FetchTicket {
    profile: PathBuf,
    generation: u64,
    staging: TempDir,
}

impl FetchTicket {
    /// Where the fetcher should materialize the download.
    pub fn staging_dir(&self) -> &Path {
        self.staging.path()
    }
}

/// Result of removing an import together with its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub entry: ImportEntry,
    /// Files or folders that were deleted
    pub removed: Vec<PathBuf>,
}

/// The command surface for one profile.
#[derive(Debug)]
pub struct ProfileSession {
    profile: Profile,
    sync: Synchronizer,
    guard: Arc<Mutex<()>>,
    generation: Arc<AtomicU64>,
}

struct Locked<'a> {
    _guard: MutexGuard<'a, ()>,
    _file: FileLock,
}

impl ProfileSession {
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn layout(&self) -> &ChromeLayout {
        self.sync.layout()
    }

    fn lock(&self) -> Result<Locked<'_>> {
        let guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let file = FileLock::acquire(&self.layout().lock_file())?;
        Ok(Locked {
            _guard: guard,
            _file: file,
        })
    }

    /// Load, apply `op`, persist. The caller holds the locks.
    fn mutate_locked<T>(&self, op: impl FnOnce(&mut Ledger) -> Result<T>) -> Result<T> {
        let mut ledger = self.sync.load()?;
        let value = op(&mut ledger)?;
        self.sync.persist(&ledger)?;
        Ok(value)
    }

    fn mutate<T>(&self, op: impl FnOnce(&mut Ledger) -> Result<T>) -> Result<T> {
        let _locked = self.lock()?;
        self.mutate_locked(op)
    }

    /// The current ledger, reconciled from disk.
    pub fn ledger(&self) -> Result<Ledger> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        self.sync.load()
    }

    pub fn entries(&self) -> Result<Vec<ImportEntry>> {
        Ok(self.ledger()?.entries().to_vec())
    }

    pub fn add(&self, entry: ImportEntry) -> Result<()> {
        self.mutate(|ledger| ledger.add(entry))
    }

    /// Remove an import from the ledger, leaving its files in place.
    pub fn remove(&self, id: &str) -> Result<ImportEntry> {
        self.mutate(|ledger| ledger.remove(id))
    }

    /// Returns whether the flag changed.
    pub fn set_enabled(&self, id: &str, enabled: bool) -> Result<bool> {
        self.mutate(|ledger| {
            if enabled {
                self.check_enable(ledger, id)?;
            }
            ledger.set_enabled(id, enabled)
        })
    }

    /// Flip the enabled flag and return the new value.
    pub fn toggle(&self, id: &str) -> Result<bool> {
        self.mutate(|ledger| {
            let enabled = !ledger
                .get(id)
                .ok_or_else(|| Error::NotFound { id: id.to_string() })?
                .enabled;
            if enabled {
                self.check_enable(ledger, id)?;
            }
            ledger.set_enabled(id, enabled)?;
            Ok(enabled)
        })
    }

    pub fn reorder(&self, id: &str, new_index: usize) -> Result<()> {
        self.mutate(|ledger| ledger.reorder(id, new_index))
    }

    pub fn set_version(&self, id: &str, version: &str) -> Result<()> {
        self.mutate(|ledger| ledger.set_version(id, version))
    }

    /// Copy a stylesheet into the mods directory and import it.
    pub fn import_file(&self, src: &Path, policy: ConflictPolicy) -> Result<ImportEntry> {
        let location = absolute(src);
        self.mutate(|ledger| {
            let name = install::install_file(src, &self.layout().mods_dir(), policy)?;
            self.record_installed(ledger, &name, SourceKind::LocalFile, &location, None)
        })
    }

    /// Copy a mod folder into the mods directory and import its entry stylesheet.
    pub fn import_folder(&self, src: &Path, policy: ConflictPolicy) -> Result<ImportEntry> {
        let location = absolute(src);
        let name = src
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.mutate(|ledger| {
            let installed = install::install_folder(src, &self.layout().mods_dir(), &name, policy)?;
            self.record_installed(ledger, &installed, SourceKind::LocalFolder, &location, None)
        })
    }

    /// Start a fetch: reserve a staging directory bound to this session's
    /// current generation.
    pub fn begin_fetch(&self) -> Result<FetchTicket> {
        let root = self.layout().staging_dir();
        std::fs::create_dir_all(&root).map_err(|e| uc_fs::Error::write(&root, e))?;
        let staging = tempfile::Builder::new()
            .prefix("fetch-")
            .tempdir_in(&root)
            .map_err(|e| uc_fs::Error::write(&root, e))?;
        Ok(FetchTicket {
            profile: self.profile.path.clone(),
            generation: self.generation.load(Ordering::SeqCst),
            staging,
        })
    }

    /// Whether results for `ticket` may still be applied.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.profile == self.profile.path
            && ticket.generation == self.generation.load(Ordering::SeqCst)
    }

    fn check_ticket(&self, ticket: &FetchTicket) -> Result<()> {
        if self.is_current(ticket) {
            Ok(())
        } else {
            tracing::info!(profile = %self.profile.path.display(), "discarding stale fetch");
            Err(Error::StaleFetch)
        }
    }

    /// Install and import a downloaded mod.
    pub fn import_fetched(
        &self,
        ticket: &FetchTicket,
        fetched: &FetchedMod,
        policy: ConflictPolicy,
    ) -> Result<ImportEntry> {
        self.check_ticket(ticket)?;
        let _locked = self.lock()?;
        self.check_ticket(ticket)?;

        self.mutate_locked(|ledger| {
            if let Some(existing) = ledger.find_by_source_location(&fetched.source_location) {
                return Err(Error::AlreadyImported {
                    id: existing.id.clone(),
                    location: fetched.source_location.clone(),
                });
            }
            let mods_dir = self.layout().mods_dir();
            let installed = if fetched.is_folder() {
                install::install_folder(&fetched.path, &mods_dir, &fetched.name, policy)?
            } else {
                install::install_file(&fetched.path, &mods_dir, policy)?
            };
            self.record_installed(
                ledger,
                &installed,
                SourceKind::from(fetched.source),
                &fetched.source_location,
                Some(&fetched.version),
            )
        })
    }

    /// Replace an imported remote mod's files with a newer download.
    ///
    /// Keeps the entry's id, position and enabled state. An update whose
    /// stylesheets import back into their own chain is still installed but
    /// left disabled, and [`Error::CircularImport`] is returned.
    pub fn apply_update(
        &self,
        ticket: &FetchTicket,
        id: &str,
        fetched: &FetchedMod,
    ) -> Result<ImportEntry> {
        self.check_ticket(ticket)?;
        let _locked = self.lock()?;
        self.check_ticket(ticket)?;

        self.mutate_locked(|ledger| {
            let entry = ledger
                .get(id)
                .cloned()
                .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
            let matches_source = entry.source.remote() == Some(fetched.source)
                && entry.source_location == fetched.source_location;
            if !matches_source {
                return Err(Error::NotUpdatable { id: id.to_string() });
            }

            let prefix = format!("{}/", ledger.mods_dir());
            let rest = entry
                .relative_path
                .strip_prefix(&prefix)
                .ok_or_else(|| Error::PathTraversal {
                    path: entry.relative_path.clone(),
                })?
                .to_string();

            let installed = if fetched.is_folder() {
                let folder = rest
                    .split_once('/')
                    .map_or(fetched.name.as_str(), |(top, _)| top);
                install::install_folder(
                    &fetched.path,
                    &self.layout().mods_dir(),
                    folder,
                    ConflictPolicy::Replace,
                )?
            } else {
                install::replace_file(&fetched.path, &self.layout().resolve(&entry.relative_path))?;
                rest
            };

            let mut updated = ImportEntry {
                relative_path: format!("{prefix}{installed}"),
                version: Some(fetched.version.clone()),
                ..entry
            };
            let cycle = install::check_import_cycles(
                self.layout().chrome_dir(),
                &self.layout().resolve(&updated.relative_path),
            )
            .err();
            if cycle.is_some() {
                updated.enabled = false;
            }
            ledger.replace(id, updated.clone())?;
            tracing::info!(id, version = %fetched.version, "update applied");
            Ok(match cycle {
                Some(err) => Err(err),
                None => Ok(updated),
            })
        })?
    }

    /// Add or refresh the ledger entry for freshly installed files.
    ///
    /// Installing over a path that is already imported refreshes that entry
    /// in place; otherwise a new entry is appended with a unique id.
    fn record_installed(
        &self,
        ledger: &mut Ledger,
        installed: &str,
        source: SourceKind,
        location: &str,
        version: Option<&str>,
    ) -> Result<ImportEntry> {
        let relative_path = format!("{}/{installed}", ledger.mods_dir());
        let base_id = ImportEntry::derive_id(ledger.mods_dir(), &relative_path);
        let mut entry = ImportEntry::new(base_id, &relative_path, source, location);
        entry.version = version.map(str::to_string);

        let existing = ledger.find_by_path(&relative_path).cloned();
        let recorded = install::check_import_cycles(
            self.layout().chrome_dir(),
            &self.layout().resolve(&relative_path),
        )
        .and_then(|()| match &existing {
            Some(existing) => {
                let entry = ImportEntry {
                    id: existing.id.clone(),
                    enabled: existing.enabled,
                    ..entry
                };
                ledger.replace(&existing.id, entry.clone())?;
                Ok(entry)
            }
            None => {
                entry.id = ledger.unique_id(&entry.id);
                ledger.add(entry.clone())?;
                Ok(entry)
            }
        });

        if recorded.is_err() && existing.is_none() {
            self.discard_installed(ledger.mods_dir(), &relative_path);
        }
        recorded
    }

    /// Delete files installed for an import that was never recorded.
    fn discard_installed(&self, mods_dir: &str, relative_path: &str) {
        if let Err(err) =
            install::remove_artifacts(self.layout().chrome_dir(), mods_dir, relative_path, &[])
        {
            tracing::warn!(path = relative_path, error = %err, "failed to clean up installed files");
        }
    }

    fn check_enable(&self, ledger: &Ledger, id: &str) -> Result<()> {
        let entry = ledger
            .get(id)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        install::check_import_cycles(
            self.layout().chrome_dir(),
            &self.layout().resolve(&entry.relative_path),
        )
    }

    /// Remove an import and delete its installed files.
    ///
    /// The ledger is written first. A failure deleting files is reported as
    /// [`Error::ArtifactRemoval`] with the import already gone.
    pub fn remove_with_artifacts(&self, id: &str) -> Result<Removal> {
        let _locked = self.lock()?;
        let (entry, remaining) = self.mutate_locked(|ledger| {
            let entry = ledger.remove(id)?;
            let remaining: Vec<String> = ledger
                .entries()
                .iter()
                .map(|e| e.relative_path.clone())
                .collect();
            Ok((entry, remaining))
        })?;

        let remaining: Vec<&str> = remaining.iter().map(String::as_str).collect();
        let removed = install::remove_artifacts(
            self.layout().chrome_dir(),
            self.layout().mods_dir_name(),
            &entry.relative_path,
            &remaining,
        )?;
        Ok(Removal { entry, removed })
    }

    /// Remove every import and delete their files.
    pub fn remove_all(&self) -> Result<Vec<Removal>> {
        let _locked = self.lock()?;
        let entries = self.mutate_locked(|ledger| Ok(ledger.clear()))?;

        let mut removals = Vec::with_capacity(entries.len());
        for entry in entries {
            let removed = install::remove_artifacts(
                self.layout().chrome_dir(),
                self.layout().mods_dir_name(),
                &entry.relative_path,
                &[],
            )?;
            removals.push(Removal { entry, removed });
        }
        Ok(removals)
    }

    /// Update-check queries for every remote import.
    pub fn update_queries(&self) -> Result<Vec<UpdateQuery>> {
        Ok(self
            .ledger()?
            .entries()
            .iter()
            .filter_map(ImportEntry::update_query)
            .collect())
    }

    /// Stylesheet backups, oldest first.
    pub fn backups(&self) -> Result<Vec<BackupInfo>> {
        self.sync.backups().list()
    }

    /// Restore `userChrome.css` from a backup. The ledger is rebuilt from the
    /// restored file on the next load.
    pub fn restore_backup(&self, name: &str) -> Result<()> {
        let _locked = self.lock()?;
        self.sync
            .backups()
            .restore(name, &self.layout().stylesheet())
    }

    /// Invalidate every outstanding [`FetchTicket`] of this session.
    pub fn close(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(profile = %self.profile.path.display(), "session closed");
    }
}

fn absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
