use anyhow::Result;
use std::path::PathBuf;

use super::DiscoveryOptions;
use crate::diagnostics::PackageLog;
use crate::loader::LinkedFolderLoader;
use crate::package::content_subfolder;
use crate::runtime::Runtime;

/// Resolve the folders an application links to.
pub fn resolve_links<R: Runtime>(
    runtime: &R,
    options: &DiscoveryOptions,
    log: &PackageLog,
) -> Result<Vec<PathBuf>> {
    let loader = LinkedFolderLoader::with_conventions(
        runtime,
        options.app_dir.clone(),
        content_subfolder(options.content_folder.clone()),
        options.conventions.clone(),
    );
    loader.linked_folders(log)
}

/// Print the linked folders of an application, marking the missing ones.
pub fn links<R: Runtime>(runtime: R, options: &DiscoveryOptions) -> Result<()> {
    let log = PackageLog::new();
    let folders = resolve_links(&runtime, options, &log)?;

    if folders.is_empty() {
        println!("No linked folders.");
        for entry in log.entries() {
            eprintln!("{}", entry);
        }
        return Ok(());
    }

    for folder in folders {
        if runtime.is_dir(&folder) {
            println!("{}", folder.display());
        } else {
            println!("{} (missing)", folder.display());
        }
    }
    Ok(())
}
