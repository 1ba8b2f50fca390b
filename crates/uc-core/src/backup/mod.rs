//! Stylesheet backups
//!
//! Before every write that changes `userChrome.css`, the current file is
//! copied to `.ucloader/backups/userChrome-<UTC timestamp>.css`. Backups made
//! within the same millisecond get a `-<n>` suffix after the timestamp and
//! are ordered by that number.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use uc_fs::validate_path_identifier;

const PREFIX: &str = "userChrome-";
const SUFFIX: &str = ".css";
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3fZ";

/// A stored backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// File name, used to restore it
    pub name: String,
    pub path: PathBuf,
    /// Parsed from the name; `None` for names this tool did not produce
    pub created: Option<DateTime<Utc>>,
    pub size: u64,
}

/// Creates, lists, prunes and restores stylesheet backups.
#[derive(Debug, Clone)]
pub struct BackupManager {
    dir: PathBuf,
    max_backups: usize,
}

impl BackupManager {
    /// `max_backups == 0` keeps every backup.
    pub fn new(dir: impl Into<PathBuf>, max_backups: usize) -> Self {
        Self {
            dir: dir.into(),
            max_backups,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into the backups directory, then prune old backups.
    ///
    /// Returns `None` when `source` does not exist.
    pub fn create(&self, source: &Path) -> Result<Option<PathBuf>> {
        if !source.is_file() {
            return Ok(None);
        }
        fs::create_dir_all(&self.dir).map_err(|e| uc_fs::Error::write(&self.dir, e))?;

        let stamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let mut dest = self.dir.join(format!("{PREFIX}{stamp}{SUFFIX}"));
        let mut n = 1;
        while dest.exists() {
            dest = self.dir.join(format!("{PREFIX}{stamp}-{n}{SUFFIX}"));
            n += 1;
        }

        fs::copy(source, &dest).map_err(|e| uc_fs::Error::write(&dest, e))?;
        tracing::debug!(backup = %dest.display(), "stylesheet backed up");

        self.prune()?;
        Ok(Some(dest))
    }

    /// All backups, oldest first.
    pub fn list(&self) -> Result<Vec<BackupInfo>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(uc_fs::Error::io(&self.dir, e).into()),
        };

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(PREFIX) || !name.ends_with(SUFFIX) {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            backups.push(BackupInfo {
                created: parse_created(&name),
                path: entry.path(),
                size: metadata.len(),
                name,
            });
        }
        backups.sort_by_cached_key(|b| (b.created, sequence(&b.name), b.name.clone()));
        Ok(backups)
    }

    /// Look up a backup by file name.
    pub fn get(&self, name: &str) -> Result<BackupInfo> {
        validate_path_identifier(name, "Backup name").map_err(|_| Error::BackupNotFound {
            name: name.to_string(),
        })?;
        self.list()?
            .into_iter()
            .find(|b| b.name == name)
            .ok_or_else(|| Error::BackupNotFound {
                name: name.to_string(),
            })
    }

    /// Replace `target` with the backup `name`.
    ///
    /// The current `target` is backed up first, so a restore can itself be
    /// undone.
    pub fn restore(&self, name: &str, target: &Path) -> Result<()> {
        let backup = self.get(name)?;
        let content = fs::read(&backup.path).map_err(|e| uc_fs::Error::io(&backup.path, e))?;

        self.create(target)?;
        uc_fs::io::write_atomic(target, &content)?;
        tracing::info!(backup = %backup.name, target = %target.display(), "stylesheet restored");
        Ok(())
    }

    /// Delete the oldest backups beyond the retention limit.
    pub fn prune(&self) -> Result<usize> {
        if self.max_backups == 0 {
            return Ok(0);
        }
        let backups = self.list()?;
        let excess = backups.len().saturating_sub(self.max_backups);
        for backup in &backups[..excess] {
            fs::remove_file(&backup.path).map_err(|e| uc_fs::Error::io(&backup.path, e))?;
            tracing::debug!(backup = %backup.name, "pruned backup");
        }
        Ok(excess)
    }
}

fn parse_created(name: &str) -> Option<DateTime<Utc>> {
    let stamp = name.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
    // Collision suffixes look like "-1" after the "Z".
    let stamp = stamp.split_once('Z').map_or(stamp, |(head, _)| head);
    NaiveDateTime::parse_from_str(stamp, "%Y%m%dT%H%M%S%.3f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// The collision number after the timestamp; 0 when there is none.
fn sequence(name: &str) -> u32 {
    name.strip_suffix(SUFFIX)
        .and_then(|stem| stem.rsplit_once("Z-"))
        .and_then(|(_, n)| n.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(max: usize) -> (tempfile::TempDir, BackupManager, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let manager = BackupManager::new(dir.path().join("backups"), max);
        let source = dir.path().join("userChrome.css");
        fs::write(&source, "a {}\n").unwrap();
        (dir, manager, source)
    }

    #[test]
    fn create_copies_source() {
        let (_dir, manager, source) = setup(0);
        let path = manager.create(&source).unwrap().unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "a {}\n");

        let listed = manager.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].created.is_some());
    }

    #[test]
    fn create_without_source_is_noop() {
        let (dir, manager, _) = setup(0);
        assert!(manager.create(&dir.path().join("absent.css")).unwrap().is_none());
        assert!(manager.list().unwrap().is_empty());
    }

    #[test]
    fn prune_keeps_newest() {
        let (_dir, manager, source) = setup(2);
        for _ in 0..4 {
            manager.create(&source).unwrap();
        }
        assert_eq!(manager.list().unwrap().len(), 2);
    }

    #[test]
    fn restore_replaces_target_and_backs_it_up() {
        let (_dir, manager, source) = setup(0);
        let backup = manager.create(&source).unwrap().unwrap();
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        fs::write(&source, "b {}\n").unwrap();

        manager.restore(&name, &source).unwrap();

        assert_eq!(fs::read_to_string(&source).unwrap(), "a {}\n");
        assert_eq!(manager.list().unwrap().len(), 2);
    }

    #[test]
    fn unknown_or_unsafe_names_are_not_found() {
        let (_dir, manager, source) = setup(0);
        for name in ["userChrome-x.css", "../userChrome.css", ""] {
            assert!(matches!(
                manager.restore(name, &source),
                Err(Error::BackupNotFound { .. })
            ));
        }
    }

    #[test]
    fn created_parses_from_name() {
        let created = parse_created("userChrome-20261016T093000.123Z-2.css").unwrap();
        assert_eq!(created.format("%Y-%m-%d %H:%M:%S").to_string(), "2026-10-16 09:30:00");
        assert!(parse_created("userChrome-garbage.css").is_none());
    }

    #[test]
    fn same_millisecond_backups_sort_by_sequence() {
        let (_dir, manager, _) = setup(2);
        fs::create_dir_all(manager.dir()).unwrap();
        for name in [
            "userChrome-20261016T093000.123Z-2.css",
            "userChrome-20261016T093000.123Z-1.css",
            "userChrome-20261016T093000.123Z.css",
            "userChrome-20261015T120000.000Z.css",
        ] {
            fs::write(manager.dir().join(name), name).unwrap();
        }

        let names: Vec<String> = manager.list().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(
            names,
            [
                "userChrome-20261015T120000.000Z.css",
                "userChrome-20261016T093000.123Z.css",
                "userChrome-20261016T093000.123Z-1.css",
                "userChrome-20261016T093000.123Z-2.css",
            ]
        );

        assert_eq!(manager.prune().unwrap(), 2);
        let kept: Vec<String> = manager.list().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(
            kept,
            [
                "userChrome-20261016T093000.123Z-1.css",
                "userChrome-20261016T093000.123Z-2.css",
            ]
        );
    }
}
