use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tmplsync::cli::{Commands, run_init, run_list, run_sync};
use tmplsync::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "tmplsync")]
#[command(about = "Sync template files with a template database", long_about = None)]
struct Cli {
    /// Path to the settings file
    #[arg(long, global = true, env = "TMPLSYNC_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tmplsync=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { domain } => run_init(&cli.config, domain)?,
        Commands::Sync(args) => run_sync(&cli.config, args)?,
        Commands::List { json } => run_list(&cli.config, json)?,
    }

    Ok(())
}
