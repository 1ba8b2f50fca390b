//! Merge the stylesheet's view with sidecar metadata.

use crate::ledger::{ImportEntry, Ledger, LedgerFile};
use std::collections::HashSet;
use uc_blocks::ImportLine;

/// Rebuild a ledger from parsed import lines and sidecar records.
///
/// The stylesheet is authoritative for which entries exist, their order and
/// their enabled state; the sidecar supplies everything else. Lines without a
/// record become untracked local entries. Lines escaping the mods directory
/// are skipped, and records without a line are dropped.
pub fn reconcile(mods_dir: &str, parsed: &[ImportLine], sidecar: &LedgerFile) -> Ledger {
    let mut ledger = Ledger::for_mods_dir(mods_dir);
    let mut seen = HashSet::new();

    for line in parsed {
        let path = match ledger.validate_path(&line.path) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(path = %line.path, error = %err, "skipping import outside the mods directory");
                continue;
            }
        };
        if !seen.insert(path.clone()) {
            tracing::warn!(path = %path, "skipping duplicate import line");
            continue;
        }

        let mut entry = match sidecar.record(&path) {
            Some(record) => record.to_entry(&path, line.enabled),
            None => {
                tracing::warn!(path = %path, "untracked import found in stylesheet");
                ImportEntry::untracked(
                    ImportEntry::derive_id(ledger.mods_dir(), &path),
                    &path,
                    line.enabled,
                )
            }
        };

        if ledger.contains(&entry.id) {
            let fallback = if ledger.contains(&path) {
                ledger.unique_id(&path)
            } else {
                path.clone()
            };
            tracing::debug!(id = %entry.id, fallback = %fallback, "id collision, using path");
            entry.id = fallback;
        }
        ledger.push_unchecked(entry);
    }

    for path in sidecar.mods.keys() {
        if !seen.contains(path) {
            tracing::debug!(path = %path, "dropping sidecar record with no import line");
        }
    }
    ledger
}
