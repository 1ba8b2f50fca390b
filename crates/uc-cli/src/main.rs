//! UserChrome Loader CLI
//!
//! The command-line front end for managing CSS mods imported into a browser
//! profile's `userChrome.css`.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::AppContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        if e.is_network() {
            eprintln!("{} nothing was changed; retry when the source is reachable", "note:".dimmed());
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        // No command provided - show help hint
        println!("{} UserChrome Loader", "uc".green().bold());
        println!();
        println!("Run {} for available commands.", "uc --help".cyan());
        return Ok(());
    };

    let mut ctx = AppContext::new(cli.config, cli.profile_dir, cli.force)?;
    tracing::debug!(?command, mutating = command.mutates_profile(), "running command");
    execute_command(&mut ctx, command)
}

/// `RUST_LOG` wins when set; otherwise `-v` selects debug and the default is warn.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(ctx: &mut AppContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Profiles => commands::run_profiles(ctx),
        Commands::SelectProfile { profile } => {
            commands::run_select_profile(ctx, profile.as_deref())
        }
        Commands::List { json } => commands::run_list(ctx, json),
        Commands::ImportFile { path, replace } => commands::run_import_file(ctx, &path, replace),
        Commands::ImportFolder { path, replace } => {
            commands::run_import_folder(ctx, &path, replace)
        }
        Commands::ImportUrl { url, replace } => commands::run_import_url(ctx, &url, replace),
        Commands::ImportGithub { repo, replace } => {
            commands::run_import_github(ctx, &repo, replace)
        }
        Commands::Enable { id } => commands::run_set_enabled(ctx, &id, true),
        Commands::Disable { id } => commands::run_set_enabled(ctx, &id, false),
        Commands::Toggle { id } => commands::run_toggle(ctx, &id),
        Commands::Move { id, index } => commands::run_move(ctx, &id, index),
        Commands::Remove {
            id,
            keep_files,
            yes,
        } => commands::run_remove(ctx, &id, keep_files, yes),
        Commands::RemoveAll { yes } => commands::run_remove_all(ctx, yes),
        Commands::CheckUpdates => commands::run_check_updates(ctx),
        Commands::ApplyUpdate { id, yes } => commands::run_apply_update(ctx, &id, yes),
        Commands::Backups => commands::run_backups(ctx),
        Commands::Restore { name } => commands::run_restore(ctx, &name),
    }
}
