//! Shared HTTP agent: native TLS, one global timeout per request, body limits.

use crate::{Error, Result};
use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

/// Timeout applied when the configured value is zero.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum body size for a single stylesheet download (10 MB).
pub const MAX_STYLESHEET_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum body size for a repository archive (50 MB).
pub const MAX_ARCHIVE_SIZE: u64 = 50 * 1024 * 1024;

/// Maximum body size for API responses (1 MB).
pub const MAX_API_RESPONSE_SIZE: u64 = 1024 * 1024;

const USER_AGENT: &str = concat!("ucloader/", env!("CARGO_PKG_VERSION"));

/// Settings for [`HttpClient`].
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Global timeout for one request, connect through body.
    pub timeout: Option<Duration>,
    /// Token sent to the GitHub API to lift anonymous rate limits.
    pub github_token: Option<String>,
}

/// Blocking HTTP client shared by the fetchers.
#[derive(Clone)]
pub struct HttpClient {
    agent: Agent,
    github_token: Option<String>,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Self {
        let timeout = config
            .timeout
            .filter(|t| !t.is_zero())
            .unwrap_or(DEFAULT_TIMEOUT);

        let tls_config = TlsConfig::builder()
            .provider(TlsProvider::NativeTls)
            .root_certs(RootCerts::PlatformVerifier)
            .build();

        let agent = Agent::config_builder()
            .tls_config(tls_config)
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            github_token: config.github_token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// GET `url` and return at most `limit` bytes of body.
    ///
    /// Non-2xx statuses are errors. Nothing is retried.
    pub fn get_bytes(&self, url: &str, limit: u64) -> Result<Vec<u8>> {
        tracing::debug!(url, "GET");
        self.agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| map_error(url, e, limit))?
            .into_body()
            .with_config()
            .limit(limit)
            .read_to_vec()
            .map_err(|e| map_error(url, e, limit))
    }

    /// GET a GitHub API endpoint and decode the JSON body.
    pub fn get_github_json(&self, url: &str) -> Result<serde_json::Value> {
        tracing::debug!(url, "GET (github api)");
        let mut request = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.github_token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }

        let body = request
            .call()
            .map_err(|e| map_error(url, e, MAX_API_RESPONSE_SIZE))?
            .into_body()
            .with_config()
            .limit(MAX_API_RESPONSE_SIZE)
            .read_to_vec()
            .map_err(|e| map_error(url, e, MAX_API_RESPONSE_SIZE))?;

        serde_json::from_slice(&body).map_err(|e| Error::MalformedResponse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(HttpConfig::default())
    }
}

fn map_error(url: &str, err: ureq::Error, limit: u64) -> Error {
    match err {
        ureq::Error::StatusCode(status) => Error::Status {
            url: url.to_string(),
            status,
        },
        ureq::Error::Timeout(_) => Error::Timeout {
            url: url.to_string(),
        },
        ureq::Error::BodyExceedsLimit(_) => Error::TooLarge {
            url: url.to_string(),
            limit,
        },
        other => Error::Http {
            url: url.to_string(),
            message: other.to_string(),
        },
    }
}

/// Parse a user-supplied download URL. Only `http` and `https` are accepted.
pub fn parse_download_url(location: &str) -> Result<url::Url> {
    let trimmed = location.trim();
    let parsed = url::Url::parse(trimmed).map_err(|e| Error::invalid(trimmed, e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(Error::invalid(
                trimmed,
                format!("unsupported scheme '{scheme}', expected http or https"),
            ));
        }
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(Error::invalid(trimmed, "missing host"));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(parse_download_url("https://example.com/a.css").is_ok());
        assert!(parse_download_url("  http://example.com/a.css ").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        let err = parse_download_url("file:///etc/passwd").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'file'"));
        assert!(parse_download_url("ftp://example.com/a.css").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_download_url("not a url"),
            Err(Error::InvalidLocation { .. })
        ));
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        // Construction must not panic for a zero timeout.
        let _client = HttpClient::new(HttpConfig {
            timeout: Some(Duration::ZERO),
            github_token: Some("  ".into()),
        });
    }
}
