//! Import commands: local files and folders, URLs and GitHub repositories

use std::path::Path;

use colored::Colorize;
use uc_core::{ConflictPolicy, ImportEntry};
use uc_fetch::{RemoteKind, dispatch};

use crate::context::AppContext;
use crate::error::Result;

fn policy(replace: bool) -> ConflictPolicy {
    if replace {
        ConflictPolicy::Replace
    } else {
        ConflictPolicy::Rename
    }
}

fn report(entry: &ImportEntry) {
    println!(
        "{} Imported {} as {}",
        "OK".green().bold(),
        entry.id.cyan(),
        entry.relative_path
    );
}

/// Run the import-file command
pub fn run_import_file(ctx: &AppContext, path: &Path, replace: bool) -> Result<()> {
    println!("{} Importing {}", "=>".blue().bold(), path.display());
    let session = ctx.session(true)?;
    let entry = session.import_file(path, policy(replace))?;
    report(&entry);
    Ok(())
}

/// Run the import-folder command
pub fn run_import_folder(ctx: &AppContext, path: &Path, replace: bool) -> Result<()> {
    println!("{} Importing folder {}", "=>".blue().bold(), path.display());
    let session = ctx.session(true)?;
    let entry = session.import_folder(path, policy(replace))?;
    report(&entry);
    Ok(())
}

/// Run the import-url command
pub fn run_import_url(ctx: &AppContext, url: &str, replace: bool) -> Result<()> {
    import_remote(ctx, RemoteKind::DirectUrl, url, replace)
}

/// Run the import-github command
pub fn run_import_github(ctx: &AppContext, repo: &str, replace: bool) -> Result<()> {
    import_remote(ctx, RemoteKind::GithubRepo, repo, replace)
}

/// Download into a staging directory on the blocking pool, then import
/// the result with a single session call.
fn import_remote(ctx: &AppContext, kind: RemoteKind, location: &str, replace: bool) -> Result<()> {
    println!("{} Downloading {}", "=>".blue().bold(), location.cyan());
    let session = ctx.session(true)?;
    let ticket = session.begin_fetch()?;

    let runtime = ctx.runtime()?;
    let fetched = runtime.block_on(dispatch::fetch(
        ctx.fetcher(kind),
        location.to_string(),
        ticket.staging_dir().to_path_buf(),
    ))?;
    tracing::debug!(name = %fetched.name, version = %fetched.version, "download finished");

    let entry = session.import_fetched(&ticket, &fetched, policy(replace))?;
    report(&entry);
    Ok(())
}
