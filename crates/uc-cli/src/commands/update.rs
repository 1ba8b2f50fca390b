//! Update checks and application for URL and GitHub imports

use colored::Colorize;
use uc_fetch::dispatch;

use crate::commands::list::short_version;
use crate::context::AppContext;
use crate::error::{CliError, Result};
use crate::interactive;

/// Run the check-updates command
pub fn run_check_updates(ctx: &AppContext) -> Result<()> {
    let session = ctx.session(false)?;
    let queries = session.update_queries()?;
    if queries.is_empty() {
        println!(
            "{} No imports from URLs or GitHub to check.",
            "OK".green().bold()
        );
        return Ok(());
    }

    println!(
        "{} Checking {} imports for updates",
        "=>".blue().bold(),
        queries.len()
    );
    let runtime = ctx.runtime()?;
    let report = runtime.block_on(dispatch::check_updates(ctx.update_checker(), queries))?;

    for status in &report.statuses {
        if status.is_available() {
            let current = status.current.as_deref().map_or("unknown", short_version);
            println!(
                "  {} {} {} -> {}",
                "^".yellow().bold(),
                status.id.cyan(),
                current.dimmed(),
                short_version(&status.latest).green()
            );
        } else {
            println!("  {} {} up to date", "=".green(), status.id.cyan());
        }
    }
    for (id, err) in &report.failures {
        eprintln!("  {} {}: {}", "x".red().bold(), id.cyan(), err);
    }

    let available = report.available().count();
    println!();
    if available > 0 {
        println!(
            "{} {} update(s) available. Use {} to install one.",
            "Total:".dimmed(),
            available,
            "uc apply-update <id>".cyan()
        );
    } else {
        println!("{} Everything is up to date.", "OK".green().bold());
    }
    if !report.failures.is_empty() {
        return Err(CliError::user(format!(
            "{} update check(s) failed",
            report.failures.len()
        )));
    }
    Ok(())
}

/// Run the apply-update command
pub fn run_apply_update(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    let session = ctx.session(true)?;
    let ledger = session.ledger()?;
    let entry = ledger
        .get(id)
        .ok_or_else(|| uc_core::Error::NotFound { id: id.to_string() })?;
    let query = entry
        .update_query()
        .ok_or_else(|| uc_core::Error::NotUpdatable { id: id.to_string() })?;

    if !interactive::confirm(
        &format!("Replace the files of '{id}' with the latest download?"),
        yes,
    )? {
        println!("{}", "Cancelled.".dimmed());
        return Ok(());
    }

    println!("{} Downloading {}", "=>".blue().bold(), query.location.cyan());
    let ticket = session.begin_fetch()?;
    let runtime = ctx.runtime()?;
    let fetched = runtime.block_on(dispatch::fetch(
        ctx.fetcher(query.kind),
        query.location.clone(),
        ticket.staging_dir().to_path_buf(),
    ))?;

    if query.current.as_deref() == Some(fetched.version.as_str()) {
        println!("{} {} is already up to date.", "OK".green().bold(), id.cyan());
        return Ok(());
    }

    let updated = session.apply_update(&ticket, id, &fetched)?;
    println!(
        "{} Updated {} to {}.",
        "OK".green().bold(),
        updated.id.cyan(),
        short_version(&fetched.version)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uc_test_utils::TestProfile;

    fn context(profile: &TestProfile) -> AppContext {
        AppContext::new(
            Some(profile.root().join("config.toml")),
            Some(profile.profile_dir()),
            false,
        )
        .unwrap()
    }

    #[test]
    fn check_updates_without_remote_imports_succeeds() {
        let profile = TestProfile::new();
        assert!(run_check_updates(&context(&profile)).is_ok());
    }

    #[test]
    fn local_import_cannot_be_updated() {
        let profile = TestProfile::new();
        let ctx = context(&profile);
        let src = profile.write_source_file("a.css", "a {}");
        ctx.session(true)
            .unwrap()
            .import_file(&src, uc_core::ConflictPolicy::Rename)
            .unwrap();

        let err = run_apply_update(&ctx, "a", true).unwrap_err();
        assert!(matches!(
            err,
            CliError::Core(uc_core::Error::NotUpdatable { .. })
        ));
    }
}
