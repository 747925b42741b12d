use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "tmplsync.toml";

const DEFAULT_DATABASE: &str = "templates.db";
const DEFAULT_SITE_ID: i64 = 1;

/// Settings as written in the config file, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    base_dir: Option<PathBuf>,
    database: Option<PathBuf>,
    site_id: Option<i64>,
    template_dirs: Option<toml::Value>,
    #[serde(default)]
    apps: Vec<PathBuf>,
}

/// Resolved settings. All paths are absolute.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_dir: PathBuf,
    pub database: PathBuf,
    pub site_id: i64,
    /// Explicitly configured template directories, in configured order.
    pub template_dirs: Vec<PathBuf>,
    /// Application directories; each may own a `templates/` subdirectory.
    pub apps: Vec<PathBuf>,
}

impl Settings {
    /// Load settings from a TOML file. A relative `base_dir` is resolved
    /// against the directory containing the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("could not read {}: {e}", path.display()))
        })?;
        let config_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&content, config_dir)
    }

    pub fn from_toml_str(content: &str, config_dir: &Path) -> Result<Self> {
        let raw: RawSettings =
            toml::from_str(content).map_err(|e| Error::Config(e.message().to_string()))?;

        let base_dir = std::path::absolute(resolve(
            config_dir,
            raw.base_dir.unwrap_or_else(|| PathBuf::from(".")),
        ))?;

        let template_dirs = match raw.template_dirs {
            None => Vec::new(),
            Some(value) => parse_template_dirs(value)?
                .into_iter()
                .map(|dir| resolve(&base_dir, dir))
                .collect(),
        };

        let apps = raw
            .apps
            .into_iter()
            .map(|app| resolve(&base_dir, app))
            .collect();

        Ok(Self {
            database: resolve(
                &base_dir,
                raw.database
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
            ),
            site_id: raw.site_id.unwrap_or(DEFAULT_SITE_ID),
            base_dir,
            template_dirs,
            apps,
        })
    }
}

fn parse_template_dirs(value: toml::Value) -> Result<Vec<PathBuf>> {
    let toml::Value::Array(items) = value else {
        return Err(Error::Config(
            "template_dirs must be a list of directory paths".to_string(),
        ));
    };

    items
        .into_iter()
        .map(|item| match item {
            toml::Value::String(s) => Ok(PathBuf::from(s)),
            other => Err(Error::Config(format!(
                "template_dirs entries must be strings, found {}",
                other.type_str()
            ))),
        })
        .collect()
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::from_toml_str("", temp.path()).unwrap();

        assert_eq!(settings.base_dir, temp.path());
        assert_eq!(settings.database, settings.base_dir.join("templates.db"));
        assert_eq!(settings.site_id, 1);
        assert!(settings.template_dirs.is_empty());
        assert!(settings.apps.is_empty());
    }

    #[test]
    fn test_paths_resolved_against_base_dir() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::from_toml_str(
            r#"
            base_dir = "project"
            database = "db/templates.db"
            site_id = 3
            template_dirs = ["templates", "/srv/shared/templates"]
            apps = ["blog"]
            "#,
            temp.path(),
        )
        .unwrap();

        let base = temp.path().join("project");
        assert_eq!(settings.base_dir, base);
        assert_eq!(settings.database, base.join("db/templates.db"));
        assert_eq!(settings.site_id, 3);
        assert_eq!(
            settings.template_dirs,
            vec![
                base.join("templates"),
                PathBuf::from("/srv/shared/templates")
            ]
        );
        assert_eq!(settings.apps, vec![base.join("blog")]);
    }

    #[test]
    fn test_template_dirs_must_be_a_list() {
        let temp = TempDir::new().unwrap();
        let result = Settings::from_toml_str(r#"template_dirs = "templates""#, temp.path());
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("must be a list")));
    }

    #[test]
    fn test_template_dirs_entries_must_be_strings() {
        let temp = TempDir::new().unwrap();
        let result = Settings::from_toml_str("template_dirs = [1, 2]", temp.path());
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("integer")));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let temp = TempDir::new().unwrap();
        let result = Settings::from_toml_str("templates = []", temp.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = Settings::load(temp.path().join("missing.toml"));
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("could not read")));
    }
}
