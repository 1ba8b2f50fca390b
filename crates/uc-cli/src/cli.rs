//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// UserChrome Loader - Manage CSS mods imported into a browser profile's userChrome.css
#[derive(Parser, Debug)]
#[command(name = "uc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of the platform default
    #[arg(long, global = true, env = "UCLOADER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Operate on this profile directory, skipping discovery
    #[arg(long, global = true, value_name = "DIR")]
    pub profile_dir: Option<PathBuf>,

    /// Modify the profile even while the browser holds it
    #[arg(long, global = true)]
    pub force: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List discovered browser profiles
    Profiles,

    /// Remember a profile for later commands
    ///
    /// Without an argument, prompts for one of the discovered profiles.
    ///
    /// Examples:
    ///   uc select-profile "Default (release)"
    ///   uc select-profile ~/.zen/abcd1234.work
    SelectProfile {
        /// Profile name or directory
        profile: Option<String>,
    },

    /// List imported mods in stylesheet order
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Copy a stylesheet into the mods directory and import it
    ImportFile {
        /// Path to a .css file
        path: PathBuf,

        /// Overwrite an existing file of the same name
        #[arg(long)]
        replace: bool,
    },

    /// Copy a mod folder into the mods directory and import its entry stylesheet
    ImportFolder {
        /// Folder holding userChrome.css, mod.css or a single .css file
        path: PathBuf,

        /// Overwrite an existing folder of the same name
        #[arg(long)]
        replace: bool,
    },

    /// Download a stylesheet and import it
    ImportUrl {
        /// http(s) URL of a .css file
        url: String,

        /// Overwrite an existing file of the same name
        #[arg(long)]
        replace: bool,
    },

    /// Download a GitHub repository and import it as a mod folder
    ///
    /// Examples:
    ///   uc import-github owner/repo
    ///   uc import-github https://github.com/owner/repo/tree/main/theme
    ImportGithub {
        /// owner/repo or a github.com URL
        repo: String,

        /// Overwrite an existing folder of the same name
        #[arg(long)]
        replace: bool,
    },

    /// Enable an import
    Enable {
        /// Import id (see 'uc list')
        id: String,
    },

    /// Disable an import, keeping it in the stylesheet as a comment
    Disable {
        /// Import id (see 'uc list')
        id: String,
    },

    /// Flip an import between enabled and disabled
    Toggle {
        /// Import id (see 'uc list')
        id: String,
    },

    /// Move an import to a new position (0-based)
    Move {
        /// Import id (see 'uc list')
        id: String,

        /// Target position
        index: usize,
    },

    /// Remove an import and delete its files
    Remove {
        /// Import id (see 'uc list')
        id: String,

        /// Leave the installed files in place
        #[arg(long)]
        keep_files: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove every import and delete their files
    RemoveAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Check imported URL and GitHub mods for newer versions
    CheckUpdates,

    /// Download the latest version of an imported mod
    ApplyUpdate {
        /// Import id (see 'uc list')
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List userChrome.css backups
    Backups,

    /// Restore userChrome.css from a backup
    Restore {
        /// Backup file name (see 'uc backups')
        name: String,
    },
}

impl Commands {
    /// Whether the command writes to the profile.
    pub fn mutates_profile(&self) -> bool {
        !matches!(
            self,
            Commands::Profiles
                | Commands::SelectProfile { .. }
                | Commands::List { .. }
                | Commands::CheckUpdates
                | Commands::Backups
        )
    }
}
