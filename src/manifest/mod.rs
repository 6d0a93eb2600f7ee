//! On-disk declaration formats.
//!
//! - [`LinkManifest`]: the `.links` file listing extra package folders
//! - [`PackageManifest`]: the per-package `.package-manifest` JSON file

mod link;
mod package;

pub use link::LinkManifest;
pub use package::{PackageDependency, PackageManifest, PackageRole};
