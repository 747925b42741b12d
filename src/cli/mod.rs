mod commands;
mod init;
mod list;
mod prompter;
mod sync;

pub use commands::{Commands, SyncArgs};
pub use init::run_init;
pub use list::run_list;
pub use prompter::TerminalPrompter;
pub use sync::run_sync;

use std::path::Path;

use crate::config::Settings;
use crate::store::{SqliteStore, Store};

/// Load settings from the config file, with a hint when it is missing.
pub fn load_settings(config: &Path) -> anyhow::Result<Settings> {
    if !config.exists() {
        anyhow::bail!(
            "Config file not found at {}. Pass --config or set TMPLSYNC_CONFIG.",
            config.display()
        );
    }
    Settings::load(config).map_err(Into::into)
}

/// Open the configured template database, checking it was initialized.
pub fn init_store(settings: &Settings) -> anyhow::Result<SqliteStore> {
    if !settings.database.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'tmplsync init' first.",
            settings.database.display()
        );
    }

    let store = SqliteStore::new(&settings.database)?;
    if !store.is_initialized()? {
        anyhow::bail!(
            "Database at {} has no template tables. Run 'tmplsync init' first.",
            settings.database.display()
        );
    }
    Ok(store)
}
