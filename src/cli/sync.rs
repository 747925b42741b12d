use std::path::Path;

use crate::sync::{SyncOptions, TemplateSyncer};
use crate::types::SyncReport;

use super::commands::SyncArgs;
use super::prompter::TerminalPrompter;
use super::{init_store, load_settings};

pub fn run_sync(config: &Path, args: SyncArgs) -> anyhow::Result<()> {
    let settings = load_settings(config)?;
    let store = init_store(&settings)?;

    let options = SyncOptions {
        extension: args.extension,
        force: args.force,
        overwrite: args.overwrite,
        app_first: args.app_first,
        delete: args.delete,
    };

    let report = TemplateSyncer::new(&store, &settings, TerminalPrompter, options).run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &SyncReport) {
    println!();
    println!("Template Sync Summary");
    println!("{}", "─".repeat(21));
    println!("Created:           {}", report.created);
    println!("Files → database:  {}", report.files_to_database);
    println!("Database → files:  {}", report.database_to_files);
    println!("Skipped:           {}", report.skipped);
    println!("Files deleted:     {}", report.files_deleted);
    println!("Records deleted:   {}", report.records_deleted);
    println!("Orphans written:   {}", report.orphans_written);
    println!();
}
