//! Filesystem abstraction for UserChrome Loader
//!
//! Provides forward-slash path handling, containment checks, and safe
//! (atomic, locked) I/O for the files the loader owns inside a profile.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use constants::ChromePath;
pub use error::{Error, Result};
pub use path::{join_relative, normalize_relative, validate_path_identifier};
