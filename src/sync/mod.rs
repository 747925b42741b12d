//! Reconciliation of on-disk template files with the template store.
//!
//! A run resolves the template directories ([`resolve_template_dirs`]), walks
//! each one for matching files ([`discover_templates`]), reconciles every file
//! against its database record and finally writes out site templates that no
//! file matched. All operator interaction goes through a [`Prompter`].

mod dirs;
mod discover;
mod prompt;
mod syncer;

pub use dirs::{TemplateDirs, app_template_dirs, resolve_template_dirs};
pub use discover::{TemplateFile, discover_templates, normalize_extension};
pub use prompt::{OverwriteChoice, OverwriteMode, Prompter};
pub use syncer::{SyncOptions, TemplateSyncer};
