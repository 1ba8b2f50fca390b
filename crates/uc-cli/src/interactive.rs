//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based confirmation and selection.

use dialoguer::{Confirm, Select};
use uc_core::Profile;

use crate::error::{CliError, Result};

/// Ask before a destructive change. `assume_yes` skips the prompt.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Let the user pick one of `profiles`.
pub fn select_profile(profiles: &[Profile]) -> Result<&Profile> {
    if profiles.is_empty() {
        return Err(CliError::user("no browser profiles found"));
    }
    let items: Vec<String> = profiles
        .iter()
        .map(|p| {
            if p.is_default {
                format!("{} (default)", p.display_name)
            } else {
                p.display_name.clone()
            }
        })
        .collect();
    let default = profiles.iter().position(|p| p.is_default).unwrap_or(0);

    let index = Select::new()
        .with_prompt("Profile")
        .items(&items)
        .default(default)
        .interact()?;
    Ok(&profiles[index])
}
