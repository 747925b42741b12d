use std::path::{Component, Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::Result;

/// A template file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the owning template directory, `/`-separated.
    pub name: String,
    pub path: PathBuf,
}

/// Prefix the extension with a dot if it lacks one (`html` -> `.html`).
pub fn normalize_extension(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}

/// Recursively list the files under `dir` whose name ends with `extension`
/// and is not hidden. Entries are visited in file-name order.
pub fn discover_templates(dir: &Path, extension: &str) -> Result<Vec<TemplateFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {e}", dir.display());
                continue;
            }
        };

        let Some(file_name) = entry.file_name().to_str() else {
            warn!("Skipping non UTF-8 path {}", entry.path().display());
            continue;
        };
        if !file_name.ends_with(extension) || file_name.starts_with('.') {
            continue;
        }
        if !entry.path().is_file() {
            continue;
        }

        let Some(name) = logical_name(dir, entry.path()) else {
            warn!("Skipping non UTF-8 path {}", entry.path().display());
            continue;
        };

        files.push(TemplateFile {
            name,
            path: entry.into_path(),
        });
    }

    Ok(files)
}

fn logical_name(dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(dir).ok()?;
    let segments = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("/"))
}
