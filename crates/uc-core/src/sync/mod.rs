//! Stylesheet Synchronizer
//!
//! Keeps the managed block of `userChrome.css` and the sidecar ledger in
//! step with a [`Ledger`]:
//!
//! - [`read`] parses the block into ordered import lines
//! - [`write`] renders a ledger into the block, backing up and writing
//!   atomically only when the content changes
//! - [`reconcile`] rebuilds a ledger from parsed lines plus sidecar metadata

mod reconcile;

pub use reconcile::reconcile;

use crate::backup::BackupManager;
use crate::layout::ChromeLayout;
use crate::ledger::{Ledger, LedgerFile};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use uc_blocks::{ImportLine, Stylesheet, parse_stylesheet_bytes};

/// What [`write`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The rendered content matched the file; nothing was written.
    Unchanged,
    /// The file was replaced. `backup` holds the copy of the previous content.
    Written { backup: Option<PathBuf> },
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

fn parse_at(path: &Path, content: &[u8]) -> Result<Stylesheet> {
    parse_stylesheet_bytes(content).map_err(|err| match err {
        uc_blocks::Error::UnterminatedBlock { line } => Error::CorruptManagedBlock {
            path: path.to_path_buf(),
            line,
        },
    })
}

/// Parse the managed block of the stylesheet at `path`.
///
/// A missing file, or one without a block, yields no imports.
pub fn read(path: &Path) -> Result<Vec<ImportLine>> {
    let content = uc_fs::io::read_bytes_or_empty(path)?;
    Ok(parse_at(path, &content)?.imports().to_vec())
}

/// Render `ledger` into `content`, which was read from `path`.
///
/// Bytes outside the managed block come back unchanged, whatever their encoding.
pub fn render(ledger: &Ledger, path: &Path, content: &[u8]) -> Result<Vec<u8>> {
    let sheet = parse_at(path, content)?;
    Ok(sheet.render_bytes(&ledger.import_lines()))
}

/// Render `ledger` into the stylesheet at `path`.
///
/// Unchanged content is not rewritten. Otherwise the current file is backed
/// up (when `backups` is given) and replaced atomically; a failure leaves
/// the previous file in place.
pub fn write(ledger: &Ledger, path: &Path, backups: Option<&BackupManager>) -> Result<WriteOutcome> {
    let current = uc_fs::io::read_bytes_if_exists(path)?;
    write_over(ledger, path, current.as_deref(), backups)
}

fn write_over(
    ledger: &Ledger,
    path: &Path,
    current: Option<&[u8]>,
    backups: Option<&BackupManager>,
) -> Result<WriteOutcome> {
    let rendered = render(ledger, path, current.unwrap_or_default())?;

    if current == Some(rendered.as_slice()) {
        tracing::debug!(path = %path.display(), "stylesheet unchanged");
        return Ok(WriteOutcome::Unchanged);
    }

    let backup = match backups {
        Some(manager) => manager.create(path)?,
        None => None,
    };
    uc_fs::io::write_atomic(path, &rendered)?;
    tracing::info!(path = %path.display(), imports = ledger.len(), "stylesheet written");
    Ok(WriteOutcome::Written { backup })
}

/// Reads and writes one chrome directory's stylesheet and sidecar together.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    layout: ChromeLayout,
    backups: BackupManager,
}

impl Synchronizer {
    pub fn new(layout: ChromeLayout, max_backups: usize) -> Self {
        let backups = BackupManager::new(layout.backups_dir(), max_backups);
        Self { layout, backups }
    }

    pub fn layout(&self) -> &ChromeLayout {
        &self.layout
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Parse the managed block.
    pub fn read(&self) -> Result<Vec<ImportLine>> {
        read(&self.layout.stylesheet())
    }

    /// Rebuild the ledger from the stylesheet and the sidecar.
    pub fn load(&self) -> Result<Ledger> {
        let parsed = self.read()?;
        let sidecar = LedgerFile::load(&self.layout.ledger_file())?;
        Ok(reconcile(self.layout.mods_dir_name(), &parsed, &sidecar))
    }

    /// Render the stylesheet, then save the sidecar.
    ///
    /// Both files change or neither does: if the sidecar cannot be saved, the
    /// stylesheet is put back to the bytes it had before.
    pub fn persist(&self, ledger: &Ledger) -> Result<WriteOutcome> {
        let stylesheet = self.layout.stylesheet();
        let previous = uc_fs::io::read_bytes_if_exists(&stylesheet)?;
        let outcome = write_over(ledger, &stylesheet, previous.as_deref(), Some(&self.backups))?;

        if let Err(err) = self.save_sidecar(ledger) {
            if outcome.is_written() {
                roll_back(&stylesheet, previous.as_deref());
            }
            return Err(err);
        }
        Ok(outcome)
    }

    fn save_sidecar(&self, ledger: &Ledger) -> Result<()> {
        let sidecar = LedgerFile::from_ledger(ledger);
        let path = self.layout.ledger_file();
        if LedgerFile::load(&path).ok().as_ref() != Some(&sidecar) {
            sidecar.save(&path)?;
        }
        Ok(())
    }
}

/// Put `path` back to `previous`, or remove it if it did not exist.
fn roll_back(path: &Path, previous: Option<&[u8]>) {
    let restored = match previous {
        Some(bytes) => uc_fs::io::write_atomic(path, bytes),
        None => std::fs::remove_file(path).map_err(|e| uc_fs::Error::write(path, e)),
    };
    match restored {
        Ok(()) => tracing::warn!(path = %path.display(), "sidecar save failed, stylesheet rolled back"),
        Err(err) => tracing::error!(
            path = %path.display(),
            error = %err,
            "sidecar save failed and the stylesheet could not be rolled back"
        ),
    }
}
