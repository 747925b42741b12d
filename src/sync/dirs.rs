use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::config::Settings;

/// Template directories for one run.
#[derive(Debug, Clone, Default)]
pub struct TemplateDirs {
    /// Existing directories to walk, in order, without duplicates.
    pub search: Vec<PathBuf>,
    /// First application template directory under the base directory.
    /// Templates with no file on disk are written here.
    pub fallback: Option<PathBuf>,
}

/// Existing `templates/` subdirectories of the configured applications,
/// in application order.
pub fn app_template_dirs(settings: &Settings) -> Vec<PathBuf> {
    settings
        .apps
        .iter()
        .map(|app| app.join("templates"))
        .filter(|dir| dir.is_dir())
        .collect()
}

pub fn resolve_template_dirs(settings: &Settings, app_first: bool) -> TemplateDirs {
    let app_dirs = app_template_dirs(settings);

    let ordered: Vec<&PathBuf> = if app_first {
        app_dirs.iter().chain(&settings.template_dirs).collect()
    } else {
        settings.template_dirs.iter().chain(&app_dirs).collect()
    };

    let mut search: Vec<PathBuf> = Vec::with_capacity(ordered.len());
    for dir in ordered {
        if !dir.is_dir() {
            debug!("Skipping missing template directory {}", dir.display());
            continue;
        }
        if search.iter().any(|seen| seen == dir) {
            continue;
        }
        search.push(dir.clone());
    }

    let fallback = fallback_dir(&app_dirs, &settings.base_dir).map(Path::to_path_buf);

    TemplateDirs { search, fallback }
}

fn fallback_dir<'a>(app_dirs: &'a [PathBuf], base_dir: &Path) -> Option<&'a Path> {
    let base_dir = normalize(base_dir);
    app_dirs
        .iter()
        .find(|dir| normalize(dir).starts_with(&base_dir))
        .map(PathBuf::as_path)
}

/// Absolute form of `path` with `.` and `..` resolved lexically.
fn normalize(path: &Path) -> PathBuf {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
