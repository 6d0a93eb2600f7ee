//! Runtime abstraction for file-system access.
//!
//! Loaders and the manifest reader never touch `std::fs` directly; they go
//! through [`Runtime`] so discovery logic can be exercised against a mock.
//!
//! # Structure
//!
//! - `path` - Path utility functions (normalize, full_path, separator rewriting)
//! - `fs` - File system operations (read, enumerate, extract targets)

mod fs;
pub mod path;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use path::{normalize_path, normalize_separators};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Reading
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;

    /// List the entries of a directory. Order is whatever the platform
    /// returns; callers that need determinism sort the result.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    // Writing (archive explosion)
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;

    // Process
    fn current_dir(&self) -> Result<PathBuf>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>> {
        self.open_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.is_file_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.remove_dir_all_impl(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        self.set_permissions_impl(path, mode)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }
}

/// Turn `path` into an absolute, lexically normalized path, resolving
/// relative paths against the runtime's current directory.
pub fn full_path<R: Runtime + ?Sized>(runtime: &R, path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize_path(path));
    }
    let base = runtime.current_dir()?;
    Ok(normalize_path(&base.join(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_app_dir;

    #[test]
    fn test_full_path_keeps_absolute() {
        let runtime = MockRuntime::new();
        let dir = test_app_dir().join("sub").join("..").join("other");

        let resolved = full_path(&runtime, &dir).unwrap();
        assert_eq!(resolved, test_app_dir().join("other"));
    }

    #[test]
    fn test_full_path_resolves_relative_against_current_dir() {
        let mut runtime = MockRuntime::new();
        runtime.expect_current_dir().returning(|| Ok(test_app_dir()));

        let resolved = full_path(&runtime, Path::new("./packages/pak1")).unwrap();
        assert_eq!(resolved, test_app_dir().join("packages").join("pak1"));
    }
}
