//! Command context: configuration, the target profile and the async runtime
//!
//! The profile is resolved in this order:
//! 1. `--profile-dir`
//! 2. the profile remembered by `uc select-profile`
//! 3. the default profile of the preferred installation
//! 4. the first profile of the preferred installation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use tokio::runtime::Runtime;
use uc_core::{
    AppConfig, InstallKind, Installation, Profile, ProfileSession, SessionManager,
    choose_installation, discover_installations, load_profiles,
};
use uc_fetch::{
    DirectUrlFetcher, GithubFetcher, HttpClient, RemoteKind, SourceFetcher, UpdateChecker,
};

use crate::error::{CliError, Result};

/// Everything a command needs, built once from the global flags.
#[derive(Debug)]
pub struct AppContext {
    config_path: PathBuf,
    profile_dir: Option<PathBuf>,
    force: bool,
    manager: SessionManager,
}

impl AppContext {
    pub fn new(config_path: Option<PathBuf>, profile_dir: Option<PathBuf>, force: bool) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => AppConfig::default_path()
                .ok_or_else(|| CliError::user("no config directory on this platform; pass --config"))?,
        };
        let config = AppConfig::load(&config_path)?;
        tracing::debug!(config = %config_path.display(), "configuration loaded");

        Ok(Self {
            config_path,
            profile_dir,
            force,
            manager: SessionManager::new(config),
        })
    }

    pub fn config(&self) -> &AppConfig {
        self.manager.config()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Installations found under the user's home directory.
    pub fn installations(&self) -> Vec<Installation> {
        dirs::home_dir()
            .map(|home| discover_installations(&home))
            .unwrap_or_default()
    }

    /// Every profile of every discovered installation.
    pub fn all_profiles(&self) -> Result<Vec<Profile>> {
        let mut profiles = Vec::new();
        for installation in self.installations() {
            profiles.extend(load_profiles(&installation)?);
        }
        Ok(profiles)
    }

    /// The profile commands operate on.
    pub fn profile(&self) -> Result<Profile> {
        if let Some(dir) = &self.profile_dir {
            return Ok(Profile::from_dir(dir, InstallKind::Standard)?);
        }
        if let Some(last) = &self.config().last_profile {
            if last.is_dir() {
                return Ok(Profile::from_dir(last, InstallKind::Standard)?);
            }
            tracing::warn!(path = %last.display(), "remembered profile no longer exists");
        }

        let installations = self.installations();
        let installation = choose_installation(&installations, self.config().installation)
            .ok_or_else(|| {
                CliError::user("no browser installation found; pass --profile-dir")
            })?;
        let profiles = load_profiles(installation)?;
        profiles
            .iter()
            .find(|p| p.is_default)
            .or_else(|| profiles.first())
            .cloned()
            .ok_or_else(|| {
                CliError::user(format!(
                    "no profiles listed in {}",
                    installation.profiles_ini().display()
                ))
            })
    }

    /// Open a session on the target profile.
    ///
    /// With `mutating`, a profile held by a running browser is refused
    /// unless `--force` was given.
    pub fn session(&self, mutating: bool) -> Result<ProfileSession> {
        let profile = self.profile()?;
        if mutating && profile.is_locked() {
            if !self.force {
                eprintln!(
                    "{} the browser appears to be running with profile '{}'",
                    "warning:".yellow().bold(),
                    profile.display_name
                );
                return Err(CliError::user(
                    "close the browser first, or pass --force to modify the profile anyway",
                ));
            }
            tracing::warn!(profile = %profile.path.display(), "modifying a locked profile");
        }
        Ok(self.manager.select(profile))
    }

    fn http(&self) -> HttpClient {
        HttpClient::new(self.config().http_config())
    }

    /// The fetcher for one kind of remote source.
    pub fn fetcher(&self, kind: RemoteKind) -> Arc<dyn SourceFetcher> {
        match kind {
            RemoteKind::DirectUrl => Arc::new(DirectUrlFetcher::new(self.http())),
            RemoteKind::GithubRepo => Arc::new(GithubFetcher::new(self.http())),
        }
    }

    pub fn update_checker(&self) -> Arc<UpdateChecker> {
        Arc::new(UpdateChecker::new(self.http()))
    }

    /// Single-threaded runtime; fetches run on its blocking pool.
    pub fn runtime(&self) -> Result<Runtime> {
        Ok(tokio::runtime::Builder::new_current_thread().build()?)
    }

    /// Persist `config` and use it from now on.
    pub fn save_config(&mut self, config: AppConfig) -> Result<()> {
        config.save(&self.config_path)?;
        tracing::debug!(config = %self.config_path.display(), "configuration saved");
        self.manager = SessionManager::new(config);
        Ok(())
    }
}
