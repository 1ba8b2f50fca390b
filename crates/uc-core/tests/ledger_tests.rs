//! Tests for Import Ledger operations

use pretty_assertions::assert_eq;
use rstest::rstest;
use uc_core::{Error, ImportEntry, Ledger, SourceKind};

fn entry(id: &str) -> ImportEntry {
    ImportEntry::new(
        id,
        format!("mods/{id}.css"),
        SourceKind::LocalFile,
        format!("/home/me/{id}.css"),
    )
}

fn ledger_of(ids: &[&str]) -> Ledger {
    let mut ledger = Ledger::for_mods_dir("mods");
    for id in ids {
        ledger.add(entry(id)).unwrap();
    }
    ledger
}

fn ids(ledger: &Ledger) -> Vec<&str> {
    ledger.ids().collect()
}

#[test]
fn add_preserves_insertion_order() {
    let ledger = ledger_of(&["a", "b", "c"]);
    assert_eq!(ids(&ledger), ["a", "b", "c"]);
    assert_eq!(ledger.len(), 3);
}

#[test]
fn duplicate_id_is_rejected_and_ledger_unchanged() {
    let mut ledger = ledger_of(&["a", "b"]);
    let before = ledger.clone();

    let mut dup = entry("a");
    dup.relative_path = "mods/other.css".into();
    let err = ledger.add(dup).unwrap_err();

    assert!(matches!(err, Error::DuplicateId { ref id } if id == "a"));
    assert_eq!(ledger, before);
}

#[test]
fn duplicate_path_is_rejected() {
    let mut ledger = ledger_of(&["a"]);
    let mut dup = entry("z");
    dup.relative_path = "mods/a.css".into();
    assert!(matches!(ledger.add(dup), Err(Error::DuplicatePath { .. })));
    assert_eq!(ledger.len(), 1);
}

#[rstest]
#[case("../../etc/passwd")]
#[case("/etc/passwd")]
#[case("C:/Windows/system32.css")]
#[case("mods/../../x.css")]
#[case("mods/../userChrome.css")]
#[case("elsewhere/a.css")]
#[case("")]
fn traversal_is_rejected(#[case] path: &str) {
    let mut ledger = ledger_of(&["a"]);
    let before = ledger.clone();

    let mut bad = entry("bad");
    bad.relative_path = path.into();

    assert!(matches!(ledger.add(bad), Err(Error::PathTraversal { .. })));
    assert_eq!(ledger, before);
}

#[test]
fn unrenderable_path_is_rejected() {
    let mut ledger = Ledger::for_mods_dir("mods");
    let mut bad = entry("q");
    bad.relative_path = "mods/a\"b.css".into();
    assert!(matches!(ledger.add(bad), Err(Error::InvalidImportPath { .. })));
}

#[test]
fn remove_returns_entry() {
    let mut ledger = ledger_of(&["a", "b"]);
    let removed = ledger.remove("a").unwrap();
    assert_eq!(removed.id, "a");
    assert_eq!(ids(&ledger), ["b"]);

    assert!(matches!(ledger.remove("a"), Err(Error::NotFound { .. })));
}

#[test]
fn set_enabled_is_idempotent() {
    let mut ledger = ledger_of(&["a"]);
    assert!(ledger.set_enabled("a", false).unwrap());
    assert!(!ledger.set_enabled("a", false).unwrap());
    assert!(!ledger.get("a").unwrap().enabled);

    assert!(matches!(
        ledger.set_enabled("zz", true),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn reorder_changes_only_order() {
    let mut ledger = ledger_of(&["a", "b", "c"]);
    let mut before: Vec<ImportEntry> = ledger.entries().to_vec();

    ledger.reorder("c", 0).unwrap();

    assert_eq!(ids(&ledger), ["c", "a", "b"]);
    let mut after: Vec<ImportEntry> = ledger.entries().to_vec();
    before.sort_by(|x, y| x.id.cmp(&y.id));
    after.sort_by(|x, y| x.id.cmp(&y.id));
    assert_eq!(before, after);
}

#[test]
fn reorder_out_of_range() {
    let mut ledger = ledger_of(&["a", "b"]);
    match ledger.reorder("a", 2) {
        Err(Error::IndexOutOfRange { index, len }) => {
            assert_eq!(index, 2);
            assert_eq!(len, 2);
        }
        other => panic!("expected IndexOutOfRange, got {other:?}"),
    }
    assert_eq!(ids(&ledger), ["a", "b"]);
}

#[test]
fn find_by_source_location_and_set_version() {
    let mut ledger = Ledger::for_mods_dir("mods");
    ledger
        .add(ImportEntry::new(
            "nord",
            "mods/nord/mod.css",
            SourceKind::GithubRepo,
            "https://github.com/someone/nord",
        ))
        .unwrap();

    let found = ledger
        .find_by_source_location("https://github.com/someone/nord")
        .unwrap();
    assert_eq!(found.id, "nord");
    assert!(ledger.find_by_source_location("https://example.com").is_none());

    ledger.set_version("nord", "abc123").unwrap();
    assert_eq!(ledger.get("nord").unwrap().version.as_deref(), Some("abc123"));
    assert!(matches!(
        ledger.set_version("x", "1"),
        Err(Error::NotFound { .. })
    ));
}
