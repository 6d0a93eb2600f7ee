use anyhow::Result;
use std::path::PathBuf;

use super::PackageLoader;
use crate::config::PathConventions;
use crate::diagnostics::{Description, PackageLog};
use crate::package::{ContentFolderResolver, PackageInfo, PackageManifestReader};
use crate::runtime::{Runtime, full_path};

/// Loads every package folder directly inside one directory.
///
/// Subdirectories are visited in name order so results do not depend on how
/// the platform enumerates them. Subdirectories without a package manifest
/// are skipped.
pub struct PackageFolderLoader<'a, R: Runtime> {
    runtime: &'a R,
    packages_dir: PathBuf,
    conventions: PathConventions,
    reader: PackageManifestReader<'a, R>,
}

impl<'a, R: Runtime> PackageFolderLoader<'a, R> {
    pub fn new(
        runtime: &'a R,
        packages_dir: impl Into<PathBuf>,
        content_folder: ContentFolderResolver,
        conventions: PathConventions,
    ) -> Self {
        Self {
            runtime,
            packages_dir: packages_dir.into(),
            reader: PackageManifestReader::new(runtime, conventions.clone(), content_folder),
            conventions,
        }
    }
}

impl<R: Runtime> PackageLoader for PackageFolderLoader<'_, R> {
    #[tracing::instrument(skip(self, log), fields(dir = %self.packages_dir.display()))]
    fn load(&self, log: &PackageLog) -> Result<Vec<PackageInfo>> {
        let dir = full_path(self.runtime, &self.packages_dir)?;
        if !self.runtime.is_dir(&dir) {
            log.trace(format_args!("No package folder found at {}", dir.display()));
            return Ok(Vec::new());
        }

        log.trace(format_args!("Looking for package folders in {}", dir.display()));
        let mut entries = self.runtime.read_dir(&dir)?;
        entries.sort();

        let mut packages = Vec::new();
        for entry in entries {
            if !self.runtime.is_dir(&entry) {
                continue;
            }
            if !self
                .runtime
                .is_file(&self.conventions.manifest_file_in(&entry))
            {
                log.trace(format_args!(
                    "  - skipping {} (no {})",
                    entry.display(),
                    self.conventions.manifest_file
                ));
                continue;
            }
            log.trace(format_args!("  - loading package folder {}", entry.display()));
            packages.push(self.reader.load_from_folder(&entry)?);
        }

        if packages.is_empty() {
            log.trace(format_args!("No packages found in {}", dir.display()));
        }
        Ok(packages)
    }

    fn describe(&self) -> Description {
        Description::new(
            "Package Folder",
            format!("Packages in {}", self.packages_dir.display()),
        )
    }
}
