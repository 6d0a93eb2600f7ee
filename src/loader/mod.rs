//! Package discovery strategies.
//!
//! Each strategy implements [`PackageLoader`]. A loader never fails because
//! its input is absent (no link file, no packages directory); it says so in
//! the [`PackageLog`] and returns nothing. A package that was found or
//! declared but cannot be read is an error and propagates.
//!
//! - [`LinkedFolderLoader`] - folders declared in a `.links` file
//! - [`PackageFolderLoader`] - every package folder inside one directory
//! - [`ZipPackageLoader`] - zip archives exploded into a working directory

mod folder;
mod linked;
mod zip;

use anyhow::Result;

use crate::diagnostics::{Description, PackageLog};
use crate::package::PackageInfo;

pub use folder::PackageFolderLoader;
pub use linked::LinkedFolderLoader;
pub use self::zip::ZipPackageLoader;

#[cfg_attr(test, mockall::automock)]
pub trait PackageLoader {
    /// Discover packages, in a stable order, tracing every decision to `log`.
    fn load(&self, log: &PackageLog) -> Result<Vec<PackageInfo>>;

    /// Label for host diagnostics. Does not touch the file system.
    fn describe(&self) -> Description;
}
