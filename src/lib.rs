//! # tmplsync
//!
//! Keeps template files on disk and template rows in a SQLite database in
//! step, usable both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use tmplsync::config::Settings;
//! use tmplsync::store::SqliteStore;
//! use tmplsync::sync::{SyncOptions, TemplateSyncer};
//!
//! let settings = Settings::load("tmplsync.toml")?;
//! let store = SqliteStore::new(&settings.database)?;
//! let report = TemplateSyncer::new(&store, &settings, my_prompter, SyncOptions::default()).run()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the CLI module and terminal prompts. Disable with
//!   `default-features = false`.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod store;
pub mod sync;
pub mod types;
