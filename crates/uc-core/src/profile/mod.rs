//! Browser installations and profiles.
//!
//! An installation is a directory holding `profiles.ini`. Profiles listed
//! there own a `chrome/` directory whose `userChrome.css` the loader
//! manages.

pub mod ini;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uc_fs::{ChromePath, join_relative};

const PROFILES_INI: &str = "profiles.ini";
const FLATPAK_APP_ID: &str = "io.github.zen_browser.zen";

/// How the browser was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallKind {
    Standard,
    Flatpak,
}

impl fmt::Display for InstallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Flatpak => f.write_str("flatpak"),
        }
    }
}

/// A browser data directory holding `profiles.ini`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub kind: InstallKind,
    pub root: PathBuf,
}

impl Installation {
    pub fn new(kind: InstallKind, root: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            root: root.into(),
        }
    }

    pub fn profiles_ini(&self) -> PathBuf {
        self.root.join(PROFILES_INI)
    }

    pub fn exists(&self) -> bool {
        self.profiles_ini().is_file()
    }
}

/// Candidate installation roots for `os` (as in `std::env::consts::OS`).
pub fn installation_candidates(os: &str, home: &Path) -> Vec<Installation> {
    match os {
        "windows" => vec![Installation::new(
            InstallKind::Standard,
            home.join("AppData").join("Roaming").join("zen"),
        )],
        "macos" => vec![
            Installation::new(
                InstallKind::Standard,
                home.join("Library").join("Application Support").join("zen"),
            ),
            Installation::new(InstallKind::Standard, home.join("Library").join("zen")),
        ],
        _ => vec![
            Installation::new(InstallKind::Standard, home.join(".zen")),
            Installation::new(
                InstallKind::Flatpak,
                home.join(".var").join("app").join(FLATPAK_APP_ID).join(".zen"),
            ),
        ],
    }
}

/// Installations on this machine whose `profiles.ini` exists.
pub fn discover_installations(home: &Path) -> Vec<Installation> {
    let found: Vec<Installation> = installation_candidates(std::env::consts::OS, home)
        .into_iter()
        .filter(Installation::exists)
        .collect();
    tracing::debug!(count = found.len(), "discovered installations");
    found
}

/// Pick an installation, preferring `preferred` when it is present.
pub fn choose_installation(
    installations: &[Installation],
    preferred: Option<InstallKind>,
) -> Option<&Installation> {
    preferred
        .and_then(|kind| installations.iter().find(|i| i.kind == kind))
        .or_else(|| installations.first())
}

/// One browser profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// The `Name=` value, or the directory name for ad-hoc profiles
    pub name: String,
    /// Human-facing label
    pub display_name: String,
    pub path: PathBuf,
    pub is_default: bool,
    pub install_kind: InstallKind,
}

impl Profile {
    /// A profile for a directory given directly rather than through `profiles.ini`.
    pub fn from_dir(path: impl Into<PathBuf>, install_kind: InstallKind) -> Result<Self> {
        let path: PathBuf = path.into();
        if !path.is_dir() {
            return Err(Error::ProfileNotFound {
                query: path.display().to_string(),
            });
        }
        let dir_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            display_name: display_name_from_dir(&dir_name),
            name: dir_name,
            path,
            is_default: false,
            install_kind,
        })
    }

    pub fn chrome_dir(&self) -> PathBuf {
        self.path.join(ChromePath::ChromeDir)
    }

    pub fn stylesheet_path(&self) -> PathBuf {
        self.chrome_dir().join(ChromePath::Stylesheet)
    }

    /// Whether the browser currently holds this profile.
    ///
    /// Only the `lock` entry counts. It is usually a dangling symlink, so
    /// the link itself is checked. `.parentlock` is left behind after the
    /// browser exits and says nothing.
    pub fn is_locked(&self) -> bool {
        self.path.join("lock").symlink_metadata().is_ok()
    }

    /// Case-insensitive match on name or display name, or an exact path match.
    pub fn matches(&self, query: &str) -> bool {
        self.name.eq_ignore_ascii_case(query)
            || self.display_name.eq_ignore_ascii_case(query)
            || self.path == Path::new(query)
    }
}

/// `abcd1234.Default (release)` shows as `Default (release)`.
fn display_name_from_dir(dir_name: &str) -> String {
    match dir_name.split_once('.') {
        Some((_, rest)) if !rest.is_empty() => rest.to_string(),
        _ => dir_name.to_string(),
    }
}

/// Read the profiles listed in an installation's `profiles.ini`.
pub fn load_profiles(installation: &Installation) -> Result<Vec<Profile>> {
    let ini_path = installation.profiles_ini();
    let content = uc_fs::io::read_text(&ini_path)?;
    let sections = ini::parse(&content);

    let install_defaults: Vec<&str> = sections
        .iter()
        .filter(|s| s.name.starts_with("Install"))
        .filter_map(|s| s.get("Default"))
        .collect();

    let mut profiles = Vec::new();
    for section in sections.iter().filter(|s| s.name.starts_with("Profile")) {
        let Some(raw_path) = section.get("Path").filter(|p| !p.is_empty()) else {
            tracing::warn!(section = %section.name, "profile section without Path");
            continue;
        };
        let is_relative = section.get_bool("IsRelative").unwrap_or(true);
        let path = if is_relative {
            join_relative(&installation.root, raw_path)
        } else {
            PathBuf::from(raw_path)
        };

        let dir_name = raw_path.rsplit('/').next().unwrap_or(raw_path);
        let (name, display_name) = match section.get("Name").filter(|n| !n.is_empty()) {
            Some(name) => (name.to_string(), name.to_string()),
            None => (dir_name.to_string(), display_name_from_dir(dir_name)),
        };
        let is_default = install_defaults.contains(&raw_path)
            || section.get_bool("Default").unwrap_or(false);

        profiles.push(Profile {
            name,
            display_name,
            path,
            is_default,
            install_kind: installation.kind,
        });
    }

    tracing::debug!(ini = %ini_path.display(), count = profiles.len(), "loaded profiles");
    Ok(profiles)
}

/// Find a profile by name, display name or path.
pub fn find_profile<'a>(profiles: &'a [Profile], query: &str) -> Result<&'a Profile> {
    profiles
        .iter()
        .find(|p| p.matches(query))
        .ok_or_else(|| Error::ProfileNotFound {
            query: query.to_string(),
        })
}
