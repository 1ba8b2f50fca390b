//! Shared test utilities for the UserChrome Loader workspace.
//!
//! Dev-dependency only, never published. Paths only: the fixtures do not
//! depend on the crates they test.
//!
//! # Modules
//!
//! - [`profile`]: [`TestProfile`] builder for an installation with one profile

pub mod profile;

pub use profile::{PROFILE_DIR, PROFILE_NAME, TestProfile};
