//! Command implementations for uc-cli

pub mod backup;
pub mod import;
pub mod list;
pub mod manage;
pub mod profiles;
pub mod update;

pub use backup::{run_backups, run_restore};
pub use import::{run_import_file, run_import_folder, run_import_github, run_import_url};
pub use list::run_list;
pub use manage::{run_move, run_remove, run_remove_all, run_set_enabled, run_toggle};
pub use profiles::{run_profiles, run_select_profile};
pub use update::{run_apply_update, run_check_updates};
