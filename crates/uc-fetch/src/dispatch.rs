//! Runs blocking fetch work on tokio's blocking pool.
//!
//! The futures returned here only wait on the worker; cancellation is the
//! caller's business (a dropped future leaves the download to finish and
//! its result to be discarded).

use crate::source::{FetchedMod, SourceFetcher};
use crate::update::{UpdateChecker, UpdateQuery, UpdateReport};
use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Fetch `location` into `staging` without blocking the async runtime.
pub async fn fetch(
    fetcher: Arc<dyn SourceFetcher>,
    location: String,
    staging: PathBuf,
) -> Result<FetchedMod> {
    tokio::task::spawn_blocking(move || fetcher.fetch(&location, &staging))
        .await
        .map_err(join_error)?
}

/// Check `queries` for updates without blocking the async runtime.
pub async fn check_updates(
    checker: Arc<UpdateChecker>,
    queries: Vec<UpdateQuery>,
) -> Result<UpdateReport> {
    tokio::task::spawn_blocking(move || checker.check(&queries))
        .await
        .map_err(join_error)
}

fn join_error(err: tokio::task::JoinError) -> Error {
    Error::Dispatch {
        message: err.to_string(),
    }
}
