use std::fs;
use std::io::Write;
use std::path::{Component, Path};

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::dirs::{TemplateDirs, resolve_template_dirs};
use super::discover::{TemplateFile, discover_templates, normalize_extension};
use super::prompt::{OverwriteChoice, OverwriteMode, Prompter};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{NewTemplate, Site, SyncReport, Template};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// File extension to sync, with or without the leading dot.
    pub extension: String,
    /// Create missing database templates without asking.
    pub force: bool,
    pub overwrite: OverwriteMode,
    /// Walk application template directories before configured ones.
    pub app_first: bool,
    /// Delete the losing copy after syncing a matched pair.
    pub delete: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            extension: "html".to_string(),
            force: false,
            overwrite: OverwriteMode::Ask,
            app_first: false,
            delete: false,
        }
    }
}

pub struct TemplateSyncer<'a, S: Store + ?Sized, P: Prompter> {
    store: &'a S,
    settings: &'a Settings,
    prompter: P,
    options: SyncOptions,
    extension: String,
}

impl<'a, S: Store + ?Sized, P: Prompter> TemplateSyncer<'a, S, P> {
    pub fn new(store: &'a S, settings: &'a Settings, prompter: P, options: SyncOptions) -> Self {
        let extension = normalize_extension(&options.extension);
        Self {
            store,
            settings,
            prompter,
            options,
            extension,
        }
    }

    /// Reconcile every template file with the database, then write out the
    /// database templates that no file matched.
    pub fn run(&mut self) -> Result<SyncReport> {
        let site = self
            .store
            .get_site(self.settings.site_id)?
            .ok_or(Error::SiteUnavailable(self.settings.site_id))?;

        let dirs = resolve_template_dirs(self.settings, self.options.app_first);
        info!(
            "Syncing '{}' templates for site {} across {} directories",
            self.extension,
            site.domain,
            dirs.search.len()
        );

        let mut report = SyncReport::default();
        let mut handled: Vec<String> = Vec::new();

        for dir in &dirs.search {
            debug!("Scanning {}", dir.display());
            for file in discover_templates(dir, &self.extension)? {
                self.sync_file(&site, &file, &mut handled, &mut report)?;
            }
        }

        self.write_orphans(&dirs, &handled, &mut report)?;

        Ok(report)
    }

    fn sync_file(
        &mut self,
        site: &Site,
        file: &TemplateFile,
        handled: &mut Vec<String>,
        report: &mut SyncReport,
    ) -> Result<()> {
        let Some(template) = self.store.find_by_name(&file.name, site.id)? else {
            if !self.options.force && !self.prompter.confirm_create(&file.name, &file.path)? {
                debug!("Not creating template '{}'", file.name);
                report.skipped += 1;
                return Ok(());
            }

            let content = fs::read_to_string(&file.path)?;
            self.store.create_template(
                &NewTemplate {
                    name: file.name.clone(),
                    content,
                },
                site.id,
            )?;
            handled.push(file.name.clone());
            info!("Created template '{}' from {}", file.name, file.path.display());
            report.created += 1;
            return Ok(());
        };

        handled.push(file.name.clone());

        match self.resolve_choice(&template, &file.path)? {
            OverwriteChoice::Skip => {
                debug!("Skipped template '{}'", file.name);
                report.skipped += 1;
            }
            OverwriteChoice::FilesToDatabase => self.files_win(site, template, file, report)?,
            OverwriteChoice::DatabaseToFiles => self.database_wins(&template, file, report)?,
        }

        Ok(())
    }

    fn resolve_choice(&mut self, template: &Template, path: &Path) -> Result<OverwriteChoice> {
        if let Some(choice) = self.options.overwrite.fixed_choice() {
            return Ok(choice);
        }

        loop {
            let answer = self.prompter.ask_overwrite(template, path)?;
            match OverwriteChoice::parse(&answer) {
                Some(choice) => return Ok(choice),
                None => debug!("Unrecognized answer '{}', asking again", answer.trim()),
            }
        }
    }

    fn files_win(
        &self,
        site: &Site,
        template: Template,
        file: &TemplateFile,
        report: &mut SyncReport,
    ) -> Result<()> {
        let content = fs::read_to_string(&file.path)?;
        let updated = Template {
            content,
            last_changed: Utc::now(),
            ..template.clone()
        };
        self.store.update_template(&updated, site.id)?;

        if self.options.delete {
            if let Err(source) = fs::remove_file(&file.path) {
                warn!(
                    "Restoring template '{}' after failing to delete {}",
                    template.name,
                    file.path.display()
                );
                self.store.update_template(&template, site.id)?;
                return Err(Error::DeleteFailed {
                    path: file.path.clone(),
                    source,
                });
            }
            report.files_deleted += 1;
        }

        info!("Updated template '{}' from {}", template.name, file.path.display());
        report.files_to_database += 1;
        Ok(())
    }

    fn database_wins(
        &self,
        template: &Template,
        file: &TemplateFile,
        report: &mut SyncReport,
    ) -> Result<()> {
        let previous = if self.options.delete {
            Some(fs::read(&file.path)?)
        } else {
            None
        };

        replace_file(&file.path, template.content.as_bytes())?;

        if let Some(previous) = previous {
            if let Err(e) = self.store.delete_template(template.id) {
                warn!(
                    "Restoring {} after failing to delete template '{}'",
                    file.path.display(),
                    template.name
                );
                replace_file(&file.path, &previous)?;
                return Err(e);
            }
            report.records_deleted += 1;
        }

        info!("Wrote template '{}' to {}", template.name, file.path.display());
        report.database_to_files += 1;
        Ok(())
    }

    fn write_orphans(
        &self,
        dirs: &TemplateDirs,
        handled: &[String],
        report: &mut SyncReport,
    ) -> Result<()> {
        let orphans = self.store.list_unmatched(handled, &self.extension)?;
        if orphans.is_empty() {
            return Ok(());
        }

        let folder = dirs.fallback.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "{} database templates have no file, but no application template directory exists under {}",
                orphans.len(),
                self.settings.base_dir.display()
            ))
        })?;

        for template in orphans {
            if !is_relative_name(&template.name) {
                warn!("Not writing template with unsafe name '{}'", template.name);
                continue;
            }

            let path = folder.join(&template.name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, template.content.as_bytes())?;

            info!("Wrote database-only template '{}' to {}", template.name, path.display());
            report.orphans_written += 1;
        }

        Ok(())
    }
}

/// Replace the contents of an existing file through a sibling temp file,
/// keeping the original permissions. Symlinks are followed so the link
/// target is updated and the link itself stays in place.
fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    let target = fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(&target)?.permissions();

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

fn is_relative_name(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}
