use anyhow::{Context, Result, bail};
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{AssemblyFile, FolderKind, PackageInfo};
use crate::config::PathConventions;
use crate::manifest::PackageManifest;
use crate::runtime::{Runtime, full_path};

/// Maps an absolute package folder to its content folder.
///
/// Hosts lay content out differently; this is where they say how.
pub type ContentFolderResolver = Arc<dyn Fn(&Path) -> PathBuf + Send + Sync>;

/// Resolver for hosts that keep content in a fixed subfolder of each package.
pub fn content_subfolder(name: impl Into<String>) -> ContentFolderResolver {
    let name = name.into();
    Arc::new(move |package_folder: &Path| package_folder.join(&name))
}

const DATA_FOLDER: &str = "data";
const CONFIG_FOLDER: &str = "config";
const BIN_FOLDER: &str = "bin";
const ASSEMBLY_EXTENSIONS: [&str; 2] = ["dll", "exe"];

/// Turns a package folder into a [`PackageInfo`].
///
/// Unlike the loaders, the reader treats every problem as an error: the
/// folder was declared, so a missing or broken package there is a
/// misconfiguration the host has to see.
pub struct PackageManifestReader<'a, R: Runtime> {
    runtime: &'a R,
    conventions: PathConventions,
    content_folder: ContentFolderResolver,
}

impl<'a, R: Runtime> PackageManifestReader<'a, R> {
    pub fn new(
        runtime: &'a R,
        conventions: PathConventions,
        content_folder: ContentFolderResolver,
    ) -> Self {
        Self {
            runtime,
            conventions,
            content_folder,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn load_from_folder(&self, folder: &Path) -> Result<PackageInfo> {
        let folder = full_path(self.runtime, folder)?;
        if !self.runtime.is_dir(&folder) {
            bail!("Package folder {} does not exist", folder.display());
        }

        let manifest_path = self.conventions.manifest_file_in(&folder);
        if !self.runtime.is_file(&manifest_path) {
            bail!(
                "No package manifest ({}) found in {}",
                self.conventions.manifest_file,
                folder.display()
            );
        }
        let manifest = PackageManifest::load(self.runtime, &manifest_path)?;

        let name = match manifest.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => folder
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .with_context(|| {
                    format!("Cannot derive a package name from {}", folder.display())
                })?,
        };
        debug!("Read package {} from {:?}", name, folder);

        let mut folders = BTreeMap::new();
        folders.insert(FolderKind::Content, (self.content_folder)(&folder));
        folders.insert(FolderKind::Data, folder.join(DATA_FOLDER));
        folders.insert(FolderKind::Config, folder.join(CONFIG_FOLDER));

        let assemblies = self.find_assemblies(&folder, &manifest.assemblies);

        Ok(PackageInfo {
            description: format!("{} ({})", name, folder.display()),
            name,
            role: manifest.role,
            version: manifest.version,
            root: folder,
            folders,
            assemblies,
            dependencies: manifest.dependencies,
            requirements: manifest.requirements,
        })
    }

    fn find_assemblies(&self, folder: &Path, names: &[String]) -> Vec<AssemblyFile> {
        let bin = folder.join(BIN_FOLDER);
        names
            .iter()
            .filter_map(|name| {
                let found = ASSEMBLY_EXTENSIONS
                    .iter()
                    .map(|ext| bin.join(format!("{}.{}", name, ext)))
                    .find(|candidate| self.runtime.is_file(candidate));
                if found.is_none() {
                    debug!("Assembly {} not found in {:?}", name, bin);
                }
                found.map(|path| AssemblyFile {
                    name: name.clone(),
                    path,
                })
            })
            .collect()
    }
}
