//! Test utilities for cross-platform paths and package fixtures.

use std::fs;
use std::path::{Path, PathBuf};

/// Returns the test application directory based on the platform.
/// - Unix: `/srv/app`
/// - Windows: `C:\srv\app`
pub fn test_app_dir() -> PathBuf {
    #[cfg(not(windows))]
    {
        PathBuf::from("/srv/app")
    }
    #[cfg(windows)]
    {
        PathBuf::from(r"C:\srv\app")
    }
}

/// Create `<parent>/<folder>` holding a package manifest with `manifest` as
/// its JSON body. Returns the package folder.
pub fn write_package(parent: &Path, folder: &str, manifest: &str) -> PathBuf {
    let dir = parent.join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(".package-manifest"), manifest).unwrap();
    dir
}

/// Create a package whose manifest only carries its name.
pub fn write_named_package(parent: &Path, folder: &str, name: &str) -> PathBuf {
    write_package(parent, folder, &format!(r#"{{"name": "{}"}}"#, name))
}
