//! Backup listing and restore

use colored::Colorize;

use crate::context::AppContext;
use crate::error::Result;

/// Run the backups command
pub fn run_backups(ctx: &AppContext) -> Result<()> {
    let session = ctx.session(false)?;
    let backups = session.backups()?;

    println!("{}", "userChrome.css backups".bold());
    println!();
    if backups.is_empty() {
        println!("  {}", "None".dimmed());
        return Ok(());
    }
    for backup in &backups {
        let created = backup
            .created
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        println!(
            "  {:<44} {} {}",
            backup.name.cyan(),
            created.dimmed(),
            format!("{} bytes", backup.size).dimmed()
        );
    }
    println!();
    println!("Use {} to restore one.", "uc restore <name>".cyan());
    Ok(())
}

/// Run the restore command
pub fn run_restore(ctx: &AppContext, name: &str) -> Result<()> {
    let session = ctx.session(true)?;
    session.restore_backup(name)?;
    println!(
        "{} Restored userChrome.css from {}.",
        "OK".green().bold(),
        name.cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uc_test_utils::TestProfile;

    #[test]
    fn restore_unknown_backup_fails() {
        let profile = TestProfile::new();
        let ctx = AppContext::new(
            Some(profile.root().join("config.toml")),
            Some(profile.profile_dir()),
            false,
        )
        .unwrap();

        assert!(run_restore(&ctx, "userChrome-missing.css").is_err());
        assert!(run_backups(&ctx).is_ok());
    }
}
