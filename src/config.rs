use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::runtime::{normalize_path, normalize_separators};

/// Well-known name of the link manifest at the root of a discovery directory.
pub const LINKS_FILE: &str = ".links";

/// Well-known name of the manifest inside each package folder.
pub const PACKAGE_MANIFEST_FILE: &str = ".package-manifest";

/// File-naming and path rules shared by the loaders and the manifest reader.
///
/// Passed in at construction so tests can use other manifest names or
/// simulate the separator of a foreign platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConventions {
    pub link_file: String,
    pub manifest_file: String,
    pub separator: char,
}

impl Default for PathConventions {
    fn default() -> Self {
        Self {
            link_file: LINKS_FILE.to_string(),
            manifest_file: PACKAGE_MANIFEST_FILE.to_string(),
            separator: MAIN_SEPARATOR,
        }
    }
}

impl PathConventions {
    pub fn with_link_file(mut self, name: impl Into<String>) -> Self {
        self.link_file = name.into();
        self
    }

    pub fn with_manifest_file(mut self, name: impl Into<String>) -> Self {
        self.manifest_file = name.into();
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn link_file_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.link_file)
    }

    pub fn manifest_file_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.manifest_file)
    }

    /// Resolve a folder declared in a link manifest against `base`.
    ///
    /// Separators are rewritten first; absolute declarations replace `base`.
    /// The result is lexically normalized.
    pub fn resolve_declared(&self, base: &Path, declared: &str) -> PathBuf {
        let folder = normalize_separators(declared, self.separator);
        normalize_path(&base.join(folder))
    }
}
