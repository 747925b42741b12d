use clap::{Args, Subcommand};

use crate::sync::OverwriteMode;

#[derive(Subcommand)]
pub enum Commands {
    /// Create the template database and the configured site
    Init {
        /// Domain for the site if it does not exist yet
        #[arg(long, default_value = "example.com")]
        domain: String,
    },

    /// Sync file system templates with the database bidirectionally
    Sync(SyncArgs),

    /// List the templates of the configured site
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct SyncArgs {
    /// Extension of the files to sync with the database
    #[arg(short, long = "ext", default_value = "html")]
    pub extension: String,

    /// Create missing database templates without asking
    #[arg(short, long)]
    pub force: bool,

    /// 0 - always ask, 1 - overwrite database templates from template files,
    /// 2 - overwrite template files from database templates
    #[arg(short, long, default_value = "0")]
    pub overwrite: OverwriteMode,

    /// Look for templates in application directories before project templates
    #[arg(short, long)]
    pub app_first: bool,

    /// Delete the losing copy after syncing
    #[arg(short, long)]
    pub delete: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}
