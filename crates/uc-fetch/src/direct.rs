//! Single-stylesheet downloads over HTTP(S).

use crate::http::{HttpClient, MAX_STYLESHEET_SIZE, parse_download_url};
use crate::source::{FetchedMod, RemoteKind, SourceFetcher};
use crate::{Error, Result};
use std::fs;
use std::path::Path;
use uc_fs::checksum::compute_bytes_checksum;

/// Downloads one stylesheet; its version token is the body's `sha256:` checksum.
#[derive(Debug, Clone, Default)]
pub struct DirectUrlFetcher {
    http: HttpClient,
}

impl DirectUrlFetcher {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn download(&self, location: &str) -> Result<(url::Url, Vec<u8>)> {
        let url = parse_download_url(location)?;
        let body = self.http.get_bytes(url.as_str(), MAX_STYLESHEET_SIZE)?;
        check_stylesheet_body(url.as_str(), &body)?;
        Ok((url, body))
    }
}

impl SourceFetcher for DirectUrlFetcher {
    fn kind(&self) -> RemoteKind {
        RemoteKind::DirectUrl
    }

    fn fetch(&self, location: &str, staging: &Path) -> Result<FetchedMod> {
        let (url, body) = self.download(location)?;
        let name = file_name_for(&url);
        let path = staging.join(&name);

        fs::create_dir_all(staging).map_err(|e| Error::io(staging, e))?;
        fs::write(&path, &body).map_err(|e| Error::io(&path, e))?;

        let version = compute_bytes_checksum(&body);
        tracing::info!(url = %url, %version, bytes = body.len(), "downloaded stylesheet");

        Ok(FetchedMod {
            source: RemoteKind::DirectUrl,
            source_location: location.trim().to_string(),
            version,
            path,
            name,
        })
    }

    fn remote_version(&self, location: &str) -> Result<String> {
        let (_, body) = self.download(location)?;
        Ok(compute_bytes_checksum(&body))
    }
}

/// File name for a downloaded stylesheet: the last path segment when it is a
/// `.css` name, otherwise `<host>.css`.
pub fn file_name_for(url: &url::Url) -> String {
    let last = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    if last.to_ascii_lowercase().ends_with(".css") && last.len() > ".css".len() {
        return last.to_string();
    }
    format!("{}.css", url.host_str().unwrap_or("download"))
}

/// Reject bodies that are obviously not a stylesheet, such as an HTML error page.
fn check_stylesheet_body(url: &str, body: &[u8]) -> Result<()> {
    let head: String = String::from_utf8_lossy(&body[..body.len().min(256)])
        .trim_start_matches('\u{feff}')
        .trim_start()
        .to_ascii_lowercase();

    if head.starts_with("<!doctype") || head.starts_with("<html") {
        return Err(Error::MalformedResponse {
            url: url.to_string(),
            message: "expected a stylesheet, got an HTML page".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://raw.githubusercontent.com/u/r/main/chrome/userChrome.css", "userChrome.css")]
    #[case("https://example.com/themes/Nord.CSS", "Nord.CSS")]
    #[case("https://example.com/raw", "example.com.css")]
    #[case("https://example.com/", "example.com.css")]
    #[case("https://example.com/.css", "example.com.css")]
    fn test_file_name_for(#[case] input: &str, #[case] expected: &str) {
        let url = url::Url::parse(input).unwrap();
        assert_eq!(file_name_for(&url), expected);
    }

    #[test]
    fn html_bodies_are_rejected() {
        let err = check_stylesheet_body("https://x", b"\n  <!DOCTYPE html><html></html>").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert!(check_stylesheet_body("https://x", b"#nav-bar { color: red; }").is_ok());
    }
}
