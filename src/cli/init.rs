use std::fs;
use std::path::Path;

use tracing::info;

use crate::store::{SqliteStore, Store};
use crate::types::Site;

use super::load_settings;

pub fn run_init(config: &Path, domain: String) -> anyhow::Result<()> {
    let settings = load_settings(config)?;

    if let Some(parent) = settings.database.parent() {
        fs::create_dir_all(parent)?;
    }

    let store = SqliteStore::new(&settings.database)?;
    store.initialize()?;
    info!("Initialized template database at {}", settings.database.display());

    println!();
    match store.get_site(settings.site_id)? {
        Some(site) => {
            println!("Site {} ({}) already exists", site.id, site.domain);
        }
        None => {
            store.create_site(&Site {
                id: settings.site_id,
                domain: domain.clone(),
                name: domain.clone(),
            })?;
            println!("Created site {} ({})", settings.site_id, domain);
        }
    }
    println!("Database: {}", settings.database.display());
    println!();

    Ok(())
}
