//! Scenario tests across the workspace crates.
//!
//! Each test drives a profile through a realistic sequence of commands and
//! checks both the stylesheet on disk and the ledger read back from it.

use pretty_assertions::assert_eq;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;
use uc_core::{
    AppConfig, ConflictPolicy, Error, InstallKind, Profile, ProfileSession, SessionManager,
    SourceKind,
};
use uc_fetch::{FetchedMod, RemoteKind, SourceFetcher, UpdateChecker, archive, dispatch};
use uc_test_utils::TestProfile;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn session(profile: &TestProfile) -> ProfileSession {
    SessionManager::new(AppConfig::default())
        .open(Profile::from_dir(profile.profile_dir(), InstallKind::Standard).unwrap())
}

/// A GitHub-style archive: everything under `<repo>-<sha>/`.
fn repo_zip(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in files {
        writer
            .start_file(
                format!("theme-0123abc/{name}"),
                zip::write::SimpleFileOptions::default(),
            )
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Stands in for the GitHub fetcher: extracts a fixed archive.
struct ArchiveFetcher {
    archive: Vec<u8>,
    sha: String,
}

impl SourceFetcher for ArchiveFetcher {
    fn kind(&self) -> RemoteKind {
        RemoteKind::GithubRepo
    }

    fn fetch(&self, location: &str, staging: &Path) -> uc_fetch::Result<FetchedMod> {
        let dest = staging.join("theme");
        archive::extract_repository(&self.archive, &dest, None)?;
        Ok(FetchedMod {
            source: RemoteKind::GithubRepo,
            source_location: location.to_string(),
            version: self.sha.clone(),
            path: dest,
            name: "theme".into(),
        })
    }

    fn remote_version(&self, _location: &str) -> uc_fetch::Result<String> {
        Ok(self.sha.clone())
    }
}

fn active_paths(profile: &TestProfile) -> Vec<(String, bool)> {
    let sheet = uc_blocks::parse_stylesheet(&profile.read_stylesheet()).unwrap();
    sheet
        .imports()
        .iter()
        .map(|line| (line.path.clone(), line.enabled))
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

/// A user with a hand-written stylesheet imports, reorders, disables and
/// removes mods; their own rules never change.
#[test]
fn local_mod_lifecycle_keeps_user_rules() {
    let profile = TestProfile::new();
    let user_rules = "/* my tweaks */\n#nav-bar { min-height: 0; }\n";
    profile.write_stylesheet(user_rules);
    let session = session(&profile);

    let tabs = profile.write_source_file("tabs.css", "tab {}");
    let sidebar = profile.write_source_folder(
        "sidebar",
        &[("userChrome.css", "@import \"parts/a.css\";"), ("parts/a.css", "a {}")],
    );
    session.import_file(&tabs, ConflictPolicy::Rename).unwrap();
    session.import_folder(&sidebar, ConflictPolicy::Rename).unwrap();
    session.reorder("sidebar", 0).unwrap();
    session.set_enabled("tabs", false).unwrap();

    assert_eq!(
        active_paths(&profile),
        [
            ("mods/sidebar/mod.css".to_string(), true),
            ("mods/tabs.css".to_string(), false),
        ]
    );
    assert!(profile.read_stylesheet().ends_with(user_rules));

    session.remove_with_artifacts("sidebar").unwrap();
    session.remove_with_artifacts("tabs").unwrap();

    let sheet = uc_blocks::parse_stylesheet(&profile.read_stylesheet()).unwrap();
    assert!(sheet.imports().is_empty());
    assert_eq!(sheet.user_content(), user_rules);
    profile.assert_chrome_file_not_exists("mods/sidebar");
    profile.assert_chrome_file_not_exists("mods/tabs.css");
}

/// A GitHub mod is downloaded on the blocking pool, imported, checked for
/// updates and updated in place.
#[tokio::test]
async fn github_mod_import_and_update() {
    let profile = TestProfile::new();
    let session = session(&profile);
    let location = "https://github.com/someone/theme";

    let v1: Arc<dyn SourceFetcher> = Arc::new(ArchiveFetcher {
        archive: repo_zip(&[("userChrome.css", "v1 {}"), ("icons/a.svg", "<svg/>")]),
        sha: "a".repeat(40),
    });
    let ticket = session.begin_fetch().unwrap();
    let fetched = dispatch::fetch(v1, location.into(), ticket.staging_dir().to_path_buf())
        .await
        .unwrap();
    let entry = session
        .import_fetched(&ticket, &fetched, ConflictPolicy::Rename)
        .unwrap();

    assert_eq!(entry.source, SourceKind::GithubRepo);
    assert_eq!(entry.relative_path, "mods/theme/mod.css");
    profile.assert_chrome_file_exists("mods/theme/icons/a.svg");

    let queries = session.update_queries().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].current.as_deref(), Some("a".repeat(40).as_str()));

    session.set_enabled("theme", false).unwrap();
    let v2: Arc<dyn SourceFetcher> = Arc::new(ArchiveFetcher {
        archive: repo_zip(&[("userChrome.css", "v2 {}")]),
        sha: "b".repeat(40),
    });
    let ticket = session.begin_fetch().unwrap();
    let newer = dispatch::fetch(v2, location.into(), ticket.staging_dir().to_path_buf())
        .await
        .unwrap();
    let updated = session.apply_update(&ticket, "theme", &newer).unwrap();

    assert_eq!(updated.version.as_deref(), Some("b".repeat(40).as_str()));
    assert!(!updated.enabled);
    assert_eq!(
        fs::read_to_string(profile.chrome_dir().join("mods/theme/mod.css")).unwrap(),
        "v2 {}"
    );
    // The old folder was replaced wholesale.
    profile.assert_chrome_file_not_exists("mods/theme/icons/a.svg");
    assert_eq!(active_paths(&profile), [("mods/theme/mod.css".to_string(), false)]);
}

/// Results of a fetch that finishes after the session was closed are dropped.
#[tokio::test]
async fn fetch_finishing_after_close_is_discarded() {
    let profile = TestProfile::new();
    let session = session(&profile);
    let fetcher: Arc<dyn SourceFetcher> = Arc::new(ArchiveFetcher {
        archive: repo_zip(&[("mod.css", "a {}")]),
        sha: "c".repeat(40),
    });

    let ticket = session.begin_fetch().unwrap();
    let pending = dispatch::fetch(
        fetcher,
        "someone/theme".into(),
        ticket.staging_dir().to_path_buf(),
    );
    session.close();
    let fetched = pending.await.unwrap();

    assert!(matches!(
        session.import_fetched(&ticket, &fetched, ConflictPolicy::Rename),
        Err(Error::StaleFetch)
    ));
    profile.assert_chrome_file_not_exists("mods/theme");
    profile.assert_chrome_file_not_exists("userChrome.css");
}

/// An update check with nothing remote makes no requests and reports nothing.
#[tokio::test]
async fn update_check_for_local_imports_is_empty() {
    let profile = TestProfile::new();
    let session = session(&profile);
    let src = profile.write_source_file("a.css", "a {}");
    session.import_file(&src, ConflictPolicy::Rename).unwrap();

    let report = dispatch::check_updates(
        Arc::new(UpdateChecker::default()),
        session.update_queries().unwrap(),
    )
    .await
    .unwrap();

    assert!(report.statuses.is_empty());
    assert!(report.failures.is_empty());
}

/// Lines the user adds to the block by hand are adopted, and the sidecar
/// keeps provenance for the tracked entries across sessions.
#[test]
fn hand_edits_and_sidecar_survive_new_sessions() {
    let profile = TestProfile::new();
    {
        let first = session(&profile);
        let src = profile.write_source_file("a.css", "a {}");
        first.import_file(&src, ConflictPolicy::Rename).unwrap();
    }

    let edited = profile
        .read_stylesheet()
        .replace(
            "/* /ucloader:imports */",
            "/* @import url('mods/extra.css'); */\n/* /ucloader:imports */",
        );
    profile.write_stylesheet(&edited);

    let second = session(&profile);
    let entries = second.entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].source, SourceKind::LocalFile);
    assert!(entries[0].is_tracked());
    assert_eq!(entries[1].id, "extra");
    assert!(!entries[1].enabled);
    assert!(!entries[1].is_tracked());

    second.toggle("extra").unwrap();
    profile.assert_stylesheet_contains("@import \"mods/extra.css\";");
}

/// Restoring a backup brings back the old stylesheet; the ledger follows it.
#[test]
fn restore_rolls_back_ledger() {
    let profile = TestProfile::new();
    let session = session(&profile);
    let a = profile.write_source_file("a.css", "a {}");
    let b = profile.write_source_file("b.css", "b {}");
    session.import_file(&a, ConflictPolicy::Rename).unwrap();
    session.import_file(&b, ConflictPolicy::Rename).unwrap();

    let backups = session.backups().unwrap();
    let before_b = backups.last().unwrap();
    session.restore_backup(&before_b.name).unwrap();

    let ids: Vec<String> = session.entries().unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, ["a"]);
}
