//! Offline checks for the fetchers: location validation, naming and archive
//! extraction. Nothing here touches the network.

use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::{Cursor, Write};
use uc_fetch::direct::file_name_for;
use uc_fetch::{
    DirectUrlFetcher, Error, GithubFetcher, RemoteKind, SourceFetcher, archive,
    http::parse_download_url,
};
use zip::write::SimpleFileOptions;

fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[rstest]
#[case("https://example.com/themes/compact.css", "compact.css")]
#[case("https://example.com/themes/Compact.CSS", "Compact.CSS")]
#[case("https://example.com/", "example.com.css")]
#[case("https://example.com/raw/theme", "example.com.css")]
#[case("https://example.com/.css", "example.com.css")]
fn test_download_file_names(#[case] url: &str, #[case] expected: &str) {
    let parsed = parse_download_url(url).unwrap();
    assert_eq!(file_name_for(&parsed), expected);
}

#[test]
fn test_fetchers_report_their_kind() {
    assert_eq!(DirectUrlFetcher::default().kind(), RemoteKind::DirectUrl);
    assert_eq!(GithubFetcher::default().kind(), RemoteKind::GithubRepo);
}

#[test]
fn test_direct_fetch_rejects_location_before_any_request() {
    let staging = tempfile::tempdir().unwrap();
    let err = DirectUrlFetcher::default()
        .fetch("file:///etc/passwd", staging.path())
        .unwrap_err();

    assert!(matches!(err, Error::InvalidLocation { .. }));
    assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
}

#[test]
fn test_github_fetch_rejects_non_github_location() {
    let staging = tempfile::tempdir().unwrap();
    let err = GithubFetcher::default()
        .fetch("https://gitlab.com/owner/repo", staging.path())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidLocation { .. }));

    let err = GithubFetcher::default()
        .remote_version("owner")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidLocation { .. }));
}

#[test]
fn test_archive_entries_escaping_root_are_skipped() {
    let data = zip_of(&[
        ("theme-abc/userChrome.css", "a {}"),
        ("theme-abc/../../evil.css", "evil {}"),
    ]);
    let root = tempfile::tempdir().unwrap();
    let dest = root.path().join("out");

    let written = archive::extract_repository(&data, &dest, None).unwrap();

    assert_eq!(written, 1);
    assert!(dest.join("userChrome.css").is_file());
    assert!(!root.path().join("evil.css").exists());
}

#[test]
fn test_archive_nested_subdir_is_flattened() {
    let data = zip_of(&[
        ("mods-123/themes/nord/userChrome.css", "nord {}"),
        ("mods-123/themes/nord/img/bg.png", ""),
        ("mods-123/themes/other/userChrome.css", "other {}"),
    ]);
    let dest = tempfile::tempdir().unwrap();

    archive::extract_repository(&data, dest.path(), Some("themes/nord")).unwrap();

    assert_eq!(
        std::fs::read_to_string(dest.path().join("userChrome.css")).unwrap(),
        "nord {}"
    );
    assert!(dest.path().join("img/bg.png").is_file());
    assert!(!dest.path().join("other").exists());
}
