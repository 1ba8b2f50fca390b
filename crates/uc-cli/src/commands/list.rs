//! List command

use colored::Colorize;
use uc_core::ImportEntry;
use uc_fs::checksum;

use crate::context::AppContext;
use crate::error::Result;

/// Run the list command
pub fn run_list(ctx: &AppContext, json: bool) -> Result<()> {
    let session = ctx.session(false)?;
    let entries = session.entries()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let profile = session.profile();
    println!(
        "{} {}",
        "Imports for".bold(),
        profile.display_name.cyan().bold()
    );
    println!();

    if entries.is_empty() {
        println!(
            "  {} (use {} to add one)",
            "None".dimmed(),
            "uc import-file".cyan()
        );
        return Ok(());
    }

    for (index, entry) in entries.iter().enumerate() {
        print_entry(index, entry);
    }
    println!();
    let disabled = entries.iter().filter(|e| !e.enabled).count();
    println!(
        "{} {} imports, {} disabled.",
        "Total:".dimmed(),
        entries.len(),
        disabled
    );
    Ok(())
}

fn print_entry(index: usize, entry: &ImportEntry) {
    let state = if entry.enabled {
        "on ".green().bold()
    } else {
        "off".red()
    };
    let origin = match &entry.version {
        Some(version) => format!("{} {}", entry.source, short_version(version)),
        None => entry.source.to_string(),
    };
    println!(
        "  {:>2} {} {:<20} {} ({})",
        index,
        state,
        entry.id.cyan(),
        entry.relative_path,
        origin.dimmed()
    );
}

/// Commit SHAs and checksums cut to a readable prefix.
pub(crate) fn short_version(version: &str) -> &str {
    let body = if checksum::is_checksum(version) {
        &version[checksum::CHECKSUM_PREFIX.len()..]
    } else {
        version
    };
    body.get(..10).unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_version_trims_prefix_and_length() {
        let token = checksum::compute_content_checksum("tab {}");
        assert_eq!(short_version(&token), &token[7..17]);
        assert_eq!(
            short_version("9fceb02d0ae598e95dc970b74767f19372d61af8"),
            "9fceb02d0a"
        );
        assert_eq!(short_version("v1"), "v1");
    }
}
