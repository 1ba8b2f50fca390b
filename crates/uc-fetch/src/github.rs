//! GitHub repository sources.
//!
//! A location names a repository and optionally a ref and a subdirectory:
//!
//! ```text
//! owner/repo
//! https://github.com/owner/repo(.git)
//! https://github.com/owner/repo/tree/<ref>/<subdir>
//! ```
//!
//! The version token is the commit SHA the ref resolves to, and the archive
//! is downloaded for that exact commit.

use crate::archive::extract_repository;
use crate::http::{HttpClient, MAX_ARCHIVE_SIZE};
use crate::source::{FetchedMod, RemoteKind, SourceFetcher};
use crate::{Error, Result};
use std::fmt;
use std::path::Path;

const API_BASE: &str = "https://api.github.com";
const CODELOAD_BASE: &str = "https://codeload.github.com";

/// A parsed GitHub source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubRepoRef {
    pub owner: String,
    pub repo: String,
    /// Branch, tag or commit. `None` means the default branch.
    pub git_ref: Option<String>,
    /// Directory inside the repository that holds the mod.
    pub subdir: Option<String>,
}

impl GithubRepoRef {
    /// Parse a location string.
    ///
    /// # Example
    /// ```
    /// use uc_fetch::GithubRepoRef;
    ///
    /// let r = GithubRepoRef::parse("https://github.com/rafaelmardojai/firefox-gnome-theme.git").unwrap();
    /// assert_eq!(r.owner, "rafaelmardojai");
    /// assert_eq!(r.repo, "firefox-gnome-theme");
    /// assert_eq!(r.git_ref, None);
    /// ```
    pub fn parse(location: &str) -> Result<Self> {
        let trimmed = location.trim();
        let path = strip_github_prefix(trimmed)
            .ok_or_else(|| Error::invalid(trimmed, "not a github.com repository"))?;

        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let (owner, repo, rest) = match segments.as_slice() {
            [owner, repo, rest @ ..] => (*owner, repo.trim_end_matches(".git"), rest),
            _ => return Err(Error::invalid(trimmed, "expected owner/repo")),
        };
        if !is_valid_name(owner) || !is_valid_name(repo) {
            return Err(Error::invalid(trimmed, "invalid owner or repository name"));
        }

        let (git_ref, subdir) = match rest {
            [] => (None, None),
            ["tree", git_ref, sub @ ..] => {
                if sub.iter().any(|s| *s == "." || *s == "..") {
                    return Err(Error::invalid(trimmed, "subdirectory may not contain '..'"));
                }
                let subdir = (!sub.is_empty()).then(|| sub.join("/"));
                (Some((*git_ref).to_string()), subdir)
            }
            _ => {
                return Err(Error::invalid(
                    trimmed,
                    "expected owner/repo or a /tree/<ref>/<path> link",
                ));
            }
        };

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref,
            subdir,
        })
    }

    /// Name suggested for the installed folder.
    pub fn mod_name(&self) -> &str {
        self.subdir
            .as_deref()
            .and_then(|s| s.rsplit('/').next())
            .unwrap_or(&self.repo)
    }

    fn commit_url(&self) -> String {
        format!(
            "{API_BASE}/repos/{}/{}/commits/{}",
            self.owner,
            self.repo,
            self.git_ref.as_deref().unwrap_or("HEAD")
        )
    }

    fn archive_url(&self, sha: &str) -> String {
        format!("{CODELOAD_BASE}/{}/{}/zip/{sha}", self.owner, self.repo)
    }
}

impl fmt::Display for GithubRepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)?;
        if let Some(git_ref) = &self.git_ref {
            write!(f, "@{git_ref}")?;
        }
        if let Some(subdir) = &self.subdir {
            write!(f, ":{subdir}")?;
        }
        Ok(())
    }
}

fn strip_github_prefix(location: &str) -> Option<&str> {
    for prefix in [
        "https://github.com/",
        "http://github.com/",
        "https://www.github.com/",
        "github.com/",
    ] {
        if let Some(rest) = location.strip_prefix(prefix) {
            return Some(rest);
        }
    }
    if location.contains("://") || location.contains(':') {
        return None;
    }
    Some(location)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Fetches repository archives pinned to a commit.
#[derive(Debug, Clone, Default)]
pub struct GithubFetcher {
    http: HttpClient,
}

impl GithubFetcher {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Resolve the ref of `repo` to a commit SHA.
    pub fn resolve_commit(&self, repo: &GithubRepoRef) -> Result<String> {
        let url = repo.commit_url();
        let body = self.http.get_github_json(&url)?;
        let sha = body
            .get("sha")
            .and_then(|v| v.as_str())
            .filter(|sha| is_commit_sha(sha))
            .ok_or_else(|| Error::MalformedResponse {
                url: url.clone(),
                message: "response has no commit sha".into(),
            })?;
        Ok(sha.to_string())
    }
}

fn is_commit_sha(value: &str) -> bool {
    value.len() == 40 && value.chars().all(|c| c.is_ascii_hexdigit())
}

impl SourceFetcher for GithubFetcher {
    fn kind(&self) -> RemoteKind {
        RemoteKind::GithubRepo
    }

    fn fetch(&self, location: &str, staging: &Path) -> Result<FetchedMod> {
        let repo = GithubRepoRef::parse(location)?;
        let sha = self.resolve_commit(&repo)?;
        let data = self.http.get_bytes(&repo.archive_url(&sha), MAX_ARCHIVE_SIZE)?;

        let dest = staging.join(&repo.repo);
        extract_repository(&data, &dest, repo.subdir.as_deref())?;
        tracing::info!(repo = %repo, commit = %sha, "downloaded repository");

        Ok(FetchedMod {
            source: RemoteKind::GithubRepo,
            source_location: location.trim().to_string(),
            version: sha,
            path: dest,
            name: repo.mod_name().to_string(),
        })
    }

    fn remote_version(&self, location: &str) -> Result<String> {
        let repo = GithubRepoRef::parse(location)?;
        self.resolve_commit(&repo)
    }
}
