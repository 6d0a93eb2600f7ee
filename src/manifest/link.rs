use anyhow::{Context, Result};
use std::path::Path;

use crate::runtime::Runtime;

/// Folders declared in a link manifest, in file order.
///
/// The format is plain text with one folder per line. Blank lines and lines
/// starting with `#` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkManifest {
    pub linked_folders: Vec<String>,
}

impl LinkManifest {
    pub fn parse(content: &str) -> Self {
        // Editors on Windows often prepend a byte-order mark
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let linked_folders = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Self { linked_folders }
    }

    /// Load the manifest at `path`.
    ///
    /// Returns `Ok(None)` when no file exists there.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime + ?Sized>(runtime: &R, path: &Path) -> Result<Option<Self>> {
        if !runtime.is_file(path) {
            return Ok(None);
        }
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read link manifest {}", path.display()))?;
        Ok(Some(Self::parse(&content)))
    }

    pub fn is_empty(&self) -> bool {
        self.linked_folders.is_empty()
    }
}
