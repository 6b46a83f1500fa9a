//! Locating and loading descriptor files in repository trees.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::descriptor::{self, Descriptor};
use crate::error::{ModwireError, Result};

/// A decoded descriptor together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedDescriptor {
    /// Module path assigned to the descriptor's top-level module
    pub path: String,
    /// File the descriptor was read from
    pub file: PathBuf,
    pub descriptor: Descriptor,
}

/// Find descriptor files below `root`, ordered by path.
pub fn find_descriptors<S: AsRef<str>>(root: &Path, names: &[S]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| ModwireError::WalkError {
            root: root.display().to_string(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .map_or(false, |f| names.iter().any(|n| n.as_ref() == f));
        if matches {
            debug!(file = %entry.path().display(), "found descriptor");
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Module path for a descriptor file: the repository's directory name
/// followed by the descriptor's directory relative to the repository, joined
/// with `/`.
pub fn module_path(root: &Path, file: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(name) = root.file_name() {
        parts.push(name.to_string_lossy().into_owned());
    }
    let dir = file.parent().unwrap_or(file);
    if let Ok(relative) = dir.strip_prefix(root) {
        for component in relative.components() {
            if let Component::Normal(part) = component {
                parts.push(part.to_string_lossy().into_owned());
            }
        }
    }
    parts.join("/")
}

/// Discover and decode descriptors in every repository.
///
/// Files that fail to read or decode are reported and skipped; the returned
/// errors list them.
pub fn load_repositories<P: AsRef<Path>, S: AsRef<str>>(
    roots: &[P],
    names: &[S],
) -> (Vec<LoadedDescriptor>, Vec<ModwireError>) {
    let mut loaded = Vec::new();
    let mut errors = Vec::new();

    for root in roots {
        let root = root.as_ref();
        let files = match find_descriptors(root, names) {
            Ok(files) => files,
            Err(e) => {
                warn!("{}", e);
                errors.push(e);
                continue;
            }
        };
        for file in files {
            match descriptor::load_file(&file) {
                Ok(descriptor) => loaded.push(LoadedDescriptor {
                    path: module_path(root, &file),
                    file,
                    descriptor,
                }),
                Err(e) => {
                    warn!("{}", e);
                    errors.push(e);
                }
            }
        }
    }

    (loaded, errors)
}
