//! Update checks against remote version tokens.

use crate::direct::DirectUrlFetcher;
use crate::github::GithubFetcher;
use crate::http::HttpClient;
use crate::source::{RemoteKind, SourceFetcher};
use crate::{Error, Result};

/// One tracked remote entry to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateQuery {
    pub id: String,
    pub kind: RemoteKind,
    pub location: String,
    /// Version token recorded at import time.
    pub current: Option<String>,
}

/// Outcome of checking one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatus {
    pub id: String,
    pub current: Option<String>,
    pub latest: String,
}

impl UpdateStatus {
    /// True when the remote token differs from the stored one.
    pub fn is_available(&self) -> bool {
        self.current.as_deref() != Some(self.latest.as_str())
    }
}

/// Results of a batch check. One failing entry does not stop the others.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub statuses: Vec<UpdateStatus>,
    pub failures: Vec<(String, Error)>,
}

impl UpdateReport {
    /// Entries with an update available.
    pub fn available(&self) -> impl Iterator<Item = &UpdateStatus> {
        self.statuses.iter().filter(|s| s.is_available())
    }
}

/// Compares stored version tokens against the remote sources.
#[derive(Debug, Clone, Default)]
pub struct UpdateChecker {
    direct: DirectUrlFetcher,
    github: GithubFetcher,
}

impl UpdateChecker {
    pub fn new(http: HttpClient) -> Self {
        Self {
            direct: DirectUrlFetcher::new(http.clone()),
            github: GithubFetcher::new(http),
        }
    }

    /// The fetcher responsible for `kind`.
    pub fn fetcher(&self, kind: RemoteKind) -> &dyn SourceFetcher {
        match kind {
            RemoteKind::DirectUrl => &self.direct,
            RemoteKind::GithubRepo => &self.github,
        }
    }

    pub fn check_one(&self, query: &UpdateQuery) -> Result<UpdateStatus> {
        let latest = self.fetcher(query.kind).remote_version(&query.location)?;
        Ok(UpdateStatus {
            id: query.id.clone(),
            current: query.current.clone(),
            latest,
        })
    }

    /// Check every query in order.
    pub fn check(&self, queries: &[UpdateQuery]) -> UpdateReport {
        let mut report = UpdateReport::default();
        for query in queries {
            match self.check_one(query) {
                Ok(status) => {
                    tracing::debug!(id = %status.id, available = status.is_available(), "checked");
                    report.statuses.push(status);
                }
                Err(err) => {
                    tracing::warn!(id = %query.id, error = %err, "update check failed");
                    report.failures.push((query.id.clone(), err));
                }
            }
        }
        report
    }
}
