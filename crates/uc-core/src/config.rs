//! Application configuration.
//!
//! Stored as TOML under the platform config directory:
//!
//! ```toml
//! mods_dir = "mods"
//! http_timeout_secs = 30
//! max_backups = 10
//! installation = "flatpak"
//! last_profile = "/home/me/.zen/abcd.Default (release)"
//! ```

use crate::Result;
use crate::profile::InstallKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use uc_fs::ConfigStore;

/// Default config file name inside the application config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Application directory name under the platform config dir
pub const APP_DIR: &str = "ucloader";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Mods directory relative to a profile's chrome directory
    pub mods_dir: String,
    pub http_timeout_secs: u64,
    /// Stylesheet backups to keep per profile; 0 keeps all
    pub max_backups: usize,
    /// Preferred installation when several are present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installation: Option<InstallKind>,
    /// Profile directory chosen with `select-profile`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_profile: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mods_dir: "mods".into(),
            http_timeout_secs: 30,
            max_backups: 10,
            installation: None,
            last_profile: None,
            github_token: None,
        }
    }
}

impl AppConfig {
    /// `<config dir>/ucloader/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load_or_default(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        Ok(ConfigStore::new().save(path, self)?)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// HTTP settings for the fetchers.
    pub fn http_config(&self) -> uc_fetch::HttpConfig {
        uc_fetch::HttpConfig {
            timeout: Some(self.http_timeout()),
            github_token: self.github_token.clone(),
        }
    }
}
