//! Core layer for UserChrome Loader
//!
//! Owns the model of which CSS mods a browser profile imports and keeps
//! `chrome/userChrome.css` in step with it:
//!
//! - **Import Ledger**: ordered entries with source and version metadata
//! - **Stylesheet Synchronizer**: renders the ledger into the managed block
//!   and reconciles hand edits back into the ledger
//! - **Installer**: copies mod files and folders into the mods directory
//! - **Profiles**: installation discovery and `profiles.ini` parsing
//! - **Sessions**: locking, cancellation and the command API front ends call
//!
//! # Architecture
//!
//! ```text
//!                  uc-cli
//!                    |
//!                 uc-core
//!                    |
//!        +-----------+-----------+
//!        |           |           |
//!      uc-fs     uc-blocks    uc-fetch
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use uc_core::{AppConfig, ConflictPolicy, InstallKind, Profile, SessionManager};
//!
//! fn example() -> uc_core::Result<()> {
//!     let manager = SessionManager::new(AppConfig::default());
//!     let profile = Profile::from_dir("/home/me/.zen/abcd.Default (release)", InstallKind::Standard)?;
//!     let session = manager.select(profile);
//!
//!     let entry = session.import_file(Path::new("compact-tabs.css"), ConflictPolicy::Rename)?;
//!     session.set_enabled(&entry.id, false)?;
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod config;
pub mod error;
pub mod install;
pub mod layout;
pub mod ledger;
pub mod profile;
pub mod session;
pub mod sync;

pub use backup::{BackupInfo, BackupManager};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use install::ConflictPolicy;
pub use layout::ChromeLayout;
pub use ledger::{EntryRecord, ImportEntry, Ledger, LedgerFile, SourceKind};
pub use profile::{
    InstallKind, Installation, Profile, choose_installation, discover_installations,
    find_profile, load_profiles,
};
pub use session::{FetchTicket, ProfileSession, Removal, SessionManager};
pub use sync::{Synchronizer, WriteOutcome, reconcile};
