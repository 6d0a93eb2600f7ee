//! Path utility functions for normalization and separator handling.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by processing `.` and `..` components lexically.
/// This does not access the filesystem and does not follow symlinks.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Pop the last component if possible
                if !result.pop() {
                    // If we can't pop (e.g., at root), keep the `..`
                    result.push(component);
                }
            }
            _ => {
                result.push(component);
            }
        }
    }
    result
}

/// Rewrite every `/` and `\` in `raw` to `separator`.
///
/// Link manifests are often written on one platform and read on another, so
/// either separator may appear in a declared folder.
pub fn normalize_separators(raw: &str, separator: char) -> String {
    raw.chars()
        .map(|c| if c == '/' || c == '\\' { separator } else { c })
        .collect()
}
