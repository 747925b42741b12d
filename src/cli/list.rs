use std::path::Path;

use serde::Serialize;

use crate::store::Store;

use super::{init_store, load_settings};

#[derive(Serialize)]
struct TemplateOutput {
    id: i64,
    name: String,
    size_bytes: usize,
    created_at: String,
    last_changed: String,
}

pub fn run_list(config: &Path, json: bool) -> anyhow::Result<()> {
    let settings = load_settings(config)?;
    let store = init_store(&settings)?;

    let site = store
        .get_site(settings.site_id)?
        .ok_or_else(|| anyhow::anyhow!("Site {} does not exist. Run 'tmplsync init' first.", settings.site_id))?;

    let outputs: Vec<TemplateOutput> = store
        .list_templates(site.id)?
        .into_iter()
        .map(|t| TemplateOutput {
            id: t.id,
            size_bytes: t.content.len(),
            name: t.name,
            created_at: t.created_at.to_rfc3339(),
            last_changed: t.last_changed.to_rfc3339(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    if outputs.is_empty() {
        println!("No templates found for {}.", site.domain);
        return Ok(());
    }

    println!();
    println!("Templates for {}", site.domain);
    println!("{}", "─".repeat(14 + site.domain.len()));
    for t in &outputs {
        println!("{:<48} {:>8} bytes  changed {}", t.name, t.size_bytes, t.last_changed);
    }
    println!();

    Ok(())
}
