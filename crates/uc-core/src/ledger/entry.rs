//! Ledger entries and where they came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uc_blocks::ImportLine;
use uc_fetch::{RemoteKind, UpdateQuery};

/// Where an imported mod came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    LocalFile,
    LocalFolder,
    DirectUrl,
    GithubRepo,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocalFile => "local-file",
            Self::LocalFolder => "local-folder",
            Self::DirectUrl => "direct-url",
            Self::GithubRepo => "github-repo",
        }
    }

    /// The fetcher kind for remote sources; `None` for local ones.
    pub fn remote(&self) -> Option<RemoteKind> {
        match self {
            Self::DirectUrl => Some(RemoteKind::DirectUrl),
            Self::GithubRepo => Some(RemoteKind::GithubRepo),
            Self::LocalFile | Self::LocalFolder => None,
        }
    }
}

impl From<RemoteKind> for SourceKind {
    fn from(kind: RemoteKind) -> Self {
        match kind {
            RemoteKind::DirectUrl => Self::DirectUrl,
            RemoteKind::GithubRepo => Self::GithubRepo,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local-file" => Ok(Self::LocalFile),
            "local-folder" => Ok(Self::LocalFolder),
            "direct-url" => Ok(Self::DirectUrl),
            "github-repo" => Ok(Self::GithubRepo),
            other => Err(format!("unknown source kind: {other}")),
        }
    }
}

/// One imported stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub id: String,
    /// Forward-slash path relative to the chrome directory.
    pub relative_path: String,
    pub source: SourceKind,
    /// URL or local path the mod was imported from; empty when untracked.
    pub source_location: String,
    pub enabled: bool,
    /// Opaque version token: a `sha256:` body checksum or a commit SHA.
    pub version: Option<String>,
    pub imported_at: DateTime<Utc>,
}

impl ImportEntry {
    /// A new, enabled, unversioned entry imported now.
    pub fn new(
        id: impl Into<String>,
        relative_path: impl Into<String>,
        source: SourceKind,
        source_location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            relative_path: relative_path.into(),
            source,
            source_location: source_location.into(),
            enabled: true,
            version: None,
            imported_at: Utc::now(),
        }
    }

    /// An entry found in the stylesheet with no sidecar record.
    pub fn untracked(id: impl Into<String>, relative_path: impl Into<String>, enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::new(id, relative_path, SourceKind::LocalFile, "")
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_tracked(&self) -> bool {
        !self.source_location.is_empty()
    }

    /// What to ask the update checker, for entries with a remote source.
    pub fn update_query(&self) -> Option<UpdateQuery> {
        let kind = self.source.remote()?;
        if self.source_location.is_empty() {
            return None;
        }
        Some(UpdateQuery {
            id: self.id.clone(),
            kind,
            location: self.source_location.clone(),
            current: self.version.clone(),
        })
    }

    /// The line this entry renders to.
    pub fn import_line(&self) -> ImportLine {
        ImportLine::new(self.relative_path.clone(), self.enabled)
    }

    /// Derive an id from a chrome-relative path.
    ///
    /// The mods-dir prefix is dropped; a folder entry stylesheet
    /// (`mod.css` or `userChrome.css`) is named after its folder, and any
    /// other stylesheet after its path without the `.css` extension.
    ///
    /// # Example
    /// ```
    /// use uc_core::ImportEntry;
    ///
    /// assert_eq!(ImportEntry::derive_id("mods", "mods/a.css"), "a");
    /// assert_eq!(ImportEntry::derive_id("mods", "mods/nord/mod.css"), "nord");
    /// assert_eq!(ImportEntry::derive_id("mods", "mods/pack/tabs.css"), "pack/tabs");
    /// ```
    pub fn derive_id(mods_dir: &str, relative_path: &str) -> String {
        let prefix = format!("{}/", mods_dir.trim_matches('/'));
        let rest = relative_path
            .strip_prefix(prefix.as_str())
            .unwrap_or(relative_path);

        if let Some((folder, file)) = rest.rsplit_once('/')
            && (file.eq_ignore_ascii_case("mod.css") || file.eq_ignore_ascii_case("userChrome.css"))
        {
            return folder.to_string();
        }

        let lower = rest.to_ascii_lowercase();
        let stem = if lower.ends_with(".css") && rest.len() > 4 {
            &rest[..rest.len() - 4]
        } else {
            rest
        };
        if stem.is_empty() {
            relative_path.to_string()
        } else {
            stem.to_string()
        }
    }
}
