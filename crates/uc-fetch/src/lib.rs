//! Remote mod sources and update checks for UserChrome Loader.
//!
//! Two fetch strategies produce a materialized file or folder in a staging
//! directory together with a comparable version token:
//!
//! - [`DirectUrlFetcher`]: one stylesheet over HTTP(S); the version is the
//!   `sha256:` checksum of the body.
//! - [`GithubFetcher`]: a repository archive; the version is the commit SHA.
//!
//! [`UpdateChecker`] compares stored versions against the remote ones. No
//! request is ever retried, and every request runs under the agent's global
//! timeout. [`dispatch`] moves blocking work off the caller's thread.

pub mod archive;
pub mod direct;
pub mod dispatch;
pub mod error;
pub mod github;
pub mod http;
pub mod source;
pub mod update;

pub use direct::DirectUrlFetcher;
pub use error::{Error, Result};
pub use github::{GithubFetcher, GithubRepoRef};
pub use http::{HttpClient, HttpConfig};
pub use source::{FetchedMod, RemoteKind, SourceFetcher};
pub use update::{UpdateChecker, UpdateQuery, UpdateReport, UpdateStatus};
