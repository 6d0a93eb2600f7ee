//! Package ("bottle") discovery for host applications.
//!
//! Loaders find package folders (through a `.links` file, a packages
//! directory, or zip archives), read each folder's manifest into a
//! [`package::PackageInfo`], and trace what they did into a
//! [`diagnostics::PackageLog`]. [`assembly`] decides whether an available
//! runtime component satisfies a package's declared minimum version.

pub mod archive;
pub mod assembly;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod loader;
pub mod manifest;
pub mod package;
pub mod runtime;

#[cfg(test)]
pub mod test_utils;
