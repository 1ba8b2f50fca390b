//! Commands that change imports already in the ledger

use colored::Colorize;

use crate::context::AppContext;
use crate::error::Result;
use crate::interactive;

/// Run the enable and disable commands
pub fn run_set_enabled(ctx: &AppContext, id: &str, enabled: bool) -> Result<()> {
    let session = ctx.session(true)?;
    let changed = session.set_enabled(id, enabled)?;
    let state = if enabled { "enabled" } else { "disabled" };
    if changed {
        println!("{} Import {} {}.", "OK".green().bold(), id.cyan(), state);
    } else {
        println!("{} Import {} is already {}.", "OK".green().bold(), id.cyan(), state);
    }
    Ok(())
}

/// Run the toggle command
pub fn run_toggle(ctx: &AppContext, id: &str) -> Result<()> {
    let session = ctx.session(true)?;
    let enabled = session.toggle(id)?;
    let state = if enabled { "enabled".green() } else { "disabled".red() };
    println!("{} Import {} {}.", "OK".green().bold(), id.cyan(), state);
    Ok(())
}

/// Run the move command
pub fn run_move(ctx: &AppContext, id: &str, index: usize) -> Result<()> {
    let session = ctx.session(true)?;
    session.reorder(id, index)?;
    println!(
        "{} Moved {} to position {}.",
        "OK".green().bold(),
        id.cyan(),
        index
    );
    Ok(())
}

/// Run the remove command
pub fn run_remove(ctx: &AppContext, id: &str, keep_files: bool, yes: bool) -> Result<()> {
    let session = ctx.session(true)?;
    let prompt = if keep_files {
        format!("Remove import '{id}'?")
    } else {
        format!("Remove import '{id}' and delete its files?")
    };
    if !interactive::confirm(&prompt, yes)? {
        println!("{}", "Cancelled.".dimmed());
        return Ok(());
    }

    if keep_files {
        let entry = session.remove(id)?;
        println!(
            "{} Removed {} ({} kept).",
            "OK".green().bold(),
            entry.id.cyan(),
            entry.relative_path
        );
    } else {
        let removal = session.remove_with_artifacts(id)?;
        println!("{} Removed {}.", "OK".green().bold(), removal.entry.id.cyan());
        for path in &removal.removed {
            println!("   {} {}", "-".red(), path.display());
        }
    }
    Ok(())
}

/// Run the remove-all command
pub fn run_remove_all(ctx: &AppContext, yes: bool) -> Result<()> {
    let session = ctx.session(true)?;
    let count = session.entries()?.len();
    if count == 0 {
        println!("{} Nothing to remove.", "OK".green().bold());
        return Ok(());
    }
    if !interactive::confirm(
        &format!("Remove all {count} imports and delete their files?"),
        yes,
    )? {
        println!("{}", "Cancelled.".dimmed());
        return Ok(());
    }

    let removals = session.remove_all()?;
    for removal in &removals {
        println!("   {} {}", "-".red(), removal.entry.id);
    }
    println!("{} Removed {} imports.", "OK".green().bold(), removals.len());
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

    fn with_imports(names: &[&str]) -> TestProfile {
        let profile = TestProfile::new();
        let ctx = context(&profile);
        let session = ctx.session(true).unwrap();
        for name in names {
            let src = profile.write_source_file(&format!("{name}.css"), "x {}");
            session
                .import_file(&src, uc_core::ConflictPolicy::Rename)
                .unwrap();
        }
        profile
    }

    #[test]
    fn disable_comments_out_import() {
        let profile = with_imports(&["a"]);

        run_set_enabled(&context(&profile), "a", false).unwrap();

        profile.assert_stylesheet_contains("/* @import \"mods/a.css\"; */");
    }

    #[test]
    fn move_reorders_lines() {
        let profile = with_imports(&["a", "b"]);

        run_move(&context(&profile), "b", 0).unwrap();

        let css = profile.read_stylesheet();
        let a = css.find("mods/a.css").unwrap();
        let b = css.find("mods/b.css").unwrap();
        assert!(b < a);
    }

    #[test]
    fn remove_keep_files_leaves_file() {
        let profile = with_imports(&["a"]);

        run_remove(&context(&profile), "a", true, true).unwrap();

        profile.assert_chrome_file_exists("mods/a.css");
        assert!(!profile.read_stylesheet().contains("mods/a.css"));
    }

    #[test]
    fn remove_all_deletes_files() {
        let profile = with_imports(&["a", "b"]);

        run_remove_all(&context(&profile), true).unwrap();

        profile.assert_chrome_file_not_exists("mods/a.css");
        profile.assert_chrome_file_not_exists("mods/b.css");
    }

    #[test]
    fn unknown_id_is_an_error() {
        let profile = with_imports(&[]);
        assert!(run_toggle(&context(&profile), "ghost").is_err());
    }
}
