//! Profile listing and selection

use std::path::Path;

use colored::Colorize;
use uc_core::{AppConfig, InstallKind, Profile, find_profile};

use crate::context::AppContext;
use crate::error::{CliError, Result};
use crate::interactive;

/// Run the profiles command
pub fn run_profiles(ctx: &AppContext) -> Result<()> {
    let installations = ctx.installations();
    if installations.is_empty() {
        println!("{}", "No browser installation found".yellow().bold());
        println!();
        println!("Pass {} to point at a profile directly.", "--profile-dir".cyan());
        return Ok(());
    }

    let selected = ctx.config().last_profile.as_deref();
    for installation in &installations {
        println!(
            "{} ({})",
            installation.root.display().to_string().bold(),
            installation.kind.to_string().dimmed()
        );
        let profiles = uc_core::load_profiles(installation)?;
        if profiles.is_empty() {
            println!("  {}", "No profiles".dimmed());
        }
        for profile in &profiles {
            print_profile(profile, selected);
        }
        println!();
    }
    Ok(())
}

fn print_profile(profile: &Profile, selected: Option<&Path>) {
    let marker = if selected == Some(profile.path.as_path()) {
        "*".green().bold()
    } else {
        " ".normal()
    };
    let mut tags = Vec::new();
    if profile.is_default {
        tags.push("default".cyan().to_string());
    }
    if profile.is_locked() {
        tags.push("in use".yellow().to_string());
    }
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", tags.join(", "))
    };
    println!(
        "{} {:<24}{} {}",
        marker,
        profile.display_name,
        tags,
        profile.path.display().to_string().dimmed()
    );
}

/// Run the select-profile command
///
/// Accepts a profile name, display name or directory. Without a query the
/// user picks from the discovered profiles.
pub fn run_select_profile(ctx: &mut AppContext, query: Option<&str>) -> Result<()> {
    let profile = match query {
        Some(query) if Path::new(query).is_dir() => Profile::from_dir(query, InstallKind::Standard)?,
        Some(query) => {
            let profiles = ctx.all_profiles()?;
            find_profile(&profiles, query)
                .map_err(|_| {
                    CliError::user(format!(
                        "no profile named '{query}'; run 'uc profiles' to list them"
                    ))
                })?
                .clone()
        }
        None => {
            let profiles = ctx.all_profiles()?;
            interactive::select_profile(&profiles)?.clone()
        }
    };

    let config = AppConfig {
        last_profile: Some(profile.path.clone()),
        ..ctx.config().clone()
    };
    ctx.save_config(config)?;

    println!(
        "{} Selected profile {} ({})",
        "OK".green().bold(),
        profile.display_name.cyan(),
        profile.path.display()
    );
    tracing::debug!(config = %ctx.config_path().display(), "profile remembered");
    Ok(())
}
