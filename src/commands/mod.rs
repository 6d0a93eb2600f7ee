//! Host-side commands behind the `bottles` binary.
//!
//! The binary plays the part of a host application: it builds the configured
//! loaders, runs them in order, and reports packages and the trace.

mod check;
mod discover;
mod links;
mod verify;

use anyhow::Result;
use std::path::PathBuf;

use crate::config::PathConventions;
use crate::diagnostics::PackageLog;
use crate::loader::{LinkedFolderLoader, PackageFolderLoader, PackageLoader, ZipPackageLoader};
use crate::package::{PackageInfo, content_subfolder};
use crate::runtime::Runtime;

pub use check::check;
pub use discover::{DiscoverOutput, discover, run_discovery};
pub use links::{links, resolve_links};
pub use verify::{PackageReport, verify, verify_packages};

/// Default exploded-archive folder name, created under the archive folder.
pub const EXPLODED_FOLDER: &str = "exploded";

/// Where and how a discovery pass looks for packages.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub app_dir: PathBuf,
    pub packages_dir: Option<PathBuf>,
    pub archives_dir: Option<PathBuf>,
    pub exploded_dir: Option<PathBuf>,
    pub content_folder: String,
    pub conventions: PathConventions,
    pub fail_fast: bool,
}

impl DiscoveryOptions {
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
            packages_dir: None,
            archives_dir: None,
            exploded_dir: None,
            content_folder: "content".to_string(),
            conventions: PathConventions::default(),
            fail_fast: false,
        }
    }

    /// Build the loaders in the order they run: linked folders, then the
    /// packages directory, then zip archives.
    pub fn loaders<'a, R: Runtime>(&self, runtime: &'a R) -> Vec<Box<dyn PackageLoader + 'a>> {
        let resolver = content_subfolder(self.content_folder.clone());
        let mut loaders: Vec<Box<dyn PackageLoader + 'a>> = vec![Box::new(
            LinkedFolderLoader::with_conventions(
                runtime,
                self.app_dir.clone(),
                resolver.clone(),
                self.conventions.clone(),
            ),
        )];

        if let Some(dir) = &self.packages_dir {
            loaders.push(Box::new(PackageFolderLoader::new(
                runtime,
                dir.clone(),
                resolver.clone(),
                self.conventions.clone(),
            )));
        }

        if let Some(dir) = &self.archives_dir {
            let exploded = self
                .exploded_dir
                .clone()
                .unwrap_or_else(|| dir.join(EXPLODED_FOLDER));
            loaders.push(Box::new(ZipPackageLoader::new(
                runtime,
                dir.clone(),
                exploded,
                resolver,
                self.conventions.clone(),
            )));
        }

        loaders
    }
}

/// Run `loaders` in order and concatenate what they find.
///
/// A failing loader is recorded in `log` and skipped, unless `fail_fast`
/// is set, in which case its error is returned.
pub fn run_loaders<'a>(
    loaders: &[Box<dyn PackageLoader + 'a>],
    log: &PackageLog,
    fail_fast: bool,
) -> Result<Vec<PackageInfo>> {
    let mut packages = Vec::new();

    for loader in loaders {
        let description = loader.describe();
        log.trace(format_args!("Running loader {}", description));

        match loader.load(log) {
            Ok(mut found) => {
                log.trace(format_args!(
                    "{} found {} package(s)",
                    description.title,
                    found.len()
                ));
                packages.append(&mut found);
            }
            Err(e) => {
                let e = e.context(format!("Loader '{}' failed", description));
                if fail_fast {
                    return Err(e);
                }
                log.mark_failure(&e);
            }
        }
    }

    Ok(packages)
}
