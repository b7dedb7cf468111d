// Path Utilities
// Helper functions for path manipulation

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                components.pop();
            }
            Component::CurDir => {}
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Resolve a path relative to a base directory
pub fn resolve_path(base: &Path, relative: &str) -> PathBuf {
    if Path::new(relative).is_absolute() {
        normalize_path(Path::new(relative))
    } else {
        normalize_path(&base.join(relative))
    }
}

/// Express `path` relative to `base`, if it lives underneath it
pub fn relative_to(base: &Path, path: &Path) -> Option<PathBuf> {
    let base = normalize_path(base);
    let path = normalize_path(path);

    path.strip_prefix(&base).ok().map(Path::to_path_buf)
}

/// Sibling path used to hold a copy of `path` (`test.xlsx` -> `test_tmp.xlsx`)
pub fn scratch_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.file_stem().unwrap_or_default());
    name.push(suffix);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}
