//! TOML or JSON config files, chosen by extension

use crate::{Error, Result, io};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use std::path::Path;

/// On-disk format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.toml` or `.json`, case-insensitive.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        })
    }
}

/// Loads and saves serde types as config files.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let format = ConfigFormat::from_path(path)?;
        let content = io::read_text(path)?;
        let parsed = match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::Config {
            path: path.to_path_buf(),
            format,
            message,
        })
    }

    /// Like [`load`](Self::load), but a missing file gives `T::default()`.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        if path.exists() {
            self.load(path)
        } else {
            tracing::debug!(path = %path.display(), "config file absent, using defaults");
            Ok(T::default())
        }
    }

    /// Serialize `value` and write it atomically, creating parent directories.
    pub fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let format = ConfigFormat::from_path(path)?;
        let content = match format {
            ConfigFormat::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        }
        .map_err(|message| Error::Config {
            path: path.to_path_buf(),
            format,
            message,
        })?;
        io::write_text(path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/Config.TOML")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")).unwrap(), ConfigFormat::Json);
        assert!(ConfigFormat::from_path(Path::new("profiles.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("noext")).is_err());
    }
}
