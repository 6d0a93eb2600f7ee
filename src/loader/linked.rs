use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::PackageLoader;
use crate::config::PathConventions;
use crate::diagnostics::{Description, PackageLog};
use crate::manifest::LinkManifest;
use crate::package::{ContentFolderResolver, PackageInfo, PackageManifestReader};
use crate::runtime::{Runtime, full_path};

/// Loads the packages an application links to through its `.links` file.
///
/// Entries are resolved relative to the application directory and read in
/// file order. A missing or empty link file is a normal, traced, empty
/// result; a linked folder that cannot be read fails the whole load.
pub struct LinkedFolderLoader<'a, R: Runtime> {
    runtime: &'a R,
    application_dir: PathBuf,
    conventions: PathConventions,
    reader: PackageManifestReader<'a, R>,
}

impl<'a, R: Runtime> LinkedFolderLoader<'a, R> {
    pub fn new(
        runtime: &'a R,
        application_dir: impl Into<PathBuf>,
        content_folder: ContentFolderResolver,
    ) -> Self {
        Self::with_conventions(
            runtime,
            application_dir,
            content_folder,
            PathConventions::default(),
        )
    }

    pub fn with_conventions(
        runtime: &'a R,
        application_dir: impl Into<PathBuf>,
        content_folder: ContentFolderResolver,
        conventions: PathConventions,
    ) -> Self {
        Self {
            runtime,
            application_dir: application_dir.into(),
            reader: PackageManifestReader::new(runtime, conventions.clone(), content_folder),
            conventions,
        }
    }

    pub fn application_dir(&self) -> &Path {
        &self.application_dir
    }

    /// Resolve the folders declared in the link file to full paths, in
    /// declaration order, without reading them.
    #[tracing::instrument(skip(self, log))]
    pub fn linked_folders(&self, log: &PackageLog) -> Result<Vec<PathBuf>> {
        let app_dir = full_path(self.runtime, &self.application_dir)?;
        let manifest_file = self.conventions.link_file_in(&app_dir);

        let manifest = match LinkManifest::load(self.runtime, &manifest_file) {
            Ok(Some(manifest)) => manifest,
            Ok(None) => {
                log.trace(format_args!(
                    "No package manifest found at {}",
                    manifest_file.display()
                ));
                return Ok(Vec::new());
            }
            Err(e) => {
                log.trace(format_args!(
                    "Unable to read the package manifest at {}: {:#}",
                    manifest_file.display(),
                    e
                ));
                return Ok(Vec::new());
            }
        };

        if manifest.is_empty() {
            log.trace(format_args!(
                "No linked folders found in the package manifest file at {}",
                app_dir.display()
            ));
            return Ok(Vec::new());
        }

        log.trace(format_args!(
            "Loading linked folders via the package manifest at {}",
            app_dir.display()
        ));
        Ok(manifest
            .linked_folders
            .iter()
            .map(|declared| self.conventions.resolve_declared(&app_dir, declared))
            .collect())
    }
}

impl<R: Runtime> PackageLoader for LinkedFolderLoader<'_, R> {
    #[tracing::instrument(skip(self, log), fields(dir = %self.application_dir.display()))]
    fn load(&self, log: &PackageLog) -> Result<Vec<PackageInfo>> {
        let folders = self.linked_folders(log)?;
        let mut packages = Vec::with_capacity(folders.len());

        for folder in folders {
            log.trace(format_args!("  - linking folder {}", folder.display()));
            let package = self
                .reader
                .load_from_folder(&folder)
                .with_context(|| format!("Failed to load linked folder {}", folder.display()))?;
            packages.push(package);
        }

        Ok(packages)
    }

    fn describe(&self) -> Description {
        Description::new(
            "Linked Folder",
            format!("Link to {}", self.application_dir.display()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LogLevel;
    use crate::package::content_subfolder;
    use crate::runtime::{MockRuntime, RealRuntime};
    use crate::test_utils::{test_app_dir, write_named_package};
    use mockall::predicate::eq;
    use std::fs;
    use tempfile::tempdir;

    fn messages(log: &PackageLog) -> Vec<String> {
        log.entries().into_iter().map(|e| e.message).collect()
    }

    fn loader_for<'a, R: Runtime>(runtime: &'a R, dir: &Path) -> LinkedFolderLoader<'a, R> {
        LinkedFolderLoader::new(runtime, dir, content_subfolder("content"))
    }

    #[test]
    fn test_load_without_link_file() {
        let mut runtime = MockRuntime::new();

        // --- Setup Paths ---
        let app = test_app_dir();
        let links = app.join(".links");

        // --- Link file is absent ---
        runtime
            .expect_is_file()
            .with(eq(links.clone()))
            .returning(|_| false);

        // --- Execute & Verify ---
        let log = PackageLog::new();
        let packages = loader_for(&runtime, &app).load(&log).unwrap();

        assert!(packages.is_empty());
        assert_eq!(
            messages(&log),
            vec![format!("No package manifest found at {}", links.display())]
        );
        assert_eq!(log.entries()[0].level, LogLevel::Trace);
    }

    #[test]
    fn test_load_with_empty_link_file() {
        let mut runtime = MockRuntime::new();
        let app = test_app_dir();

        runtime.expect_is_file().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("# nothing linked yet\n\n".into()));

        let log = PackageLog::new();
        let packages = loader_for(&runtime, &app).load(&log).unwrap();

        assert!(packages.is_empty());
        assert_eq!(
            messages(&log),
            vec![format!(
                "No linked folders found in the package manifest file at {}",
                app.display()
            )]
        );
    }

    #[test]
    fn test_load_with_unreadable_link_file_is_soft() {
        let mut runtime = MockRuntime::new();
        let app = test_app_dir();

        runtime.expect_is_file().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Err(anyhow::anyhow!("permission denied")));

        let log = PackageLog::new();
        let packages = loader_for(&runtime, &app).load(&log).unwrap();

        assert!(packages.is_empty());
        assert_eq!(log.len(), 1);
        assert!(messages(&log)[0].starts_with("Unable to read the package manifest"));
        assert!(messages(&log)[0].contains("permission denied"));
        assert!(log.success());
    }

    #[test]
    fn test_linked_folders_resolve_relative_application_dir() {
        let mut runtime = MockRuntime::new();
        let cwd = test_app_dir();
        let app = cwd.join("site");

        runtime.expect_current_dir().returning(move || Ok(test_app_dir()));
        runtime
            .expect_is_file()
            .with(eq(app.join(".links")))
            .returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(app.join(".links")))
            .returning(|_| Ok("../shared/pak1\nlocal/pak2\n".into()));

        let loader = loader_for(&runtime, Path::new("site"));
        let folders = loader.linked_folders(&PackageLog::new()).unwrap();

        assert_eq!(
            folders,
            vec![
                cwd.join("shared").join("pak1"),
                app.join("local").join("pak2"),
            ]
        );
    }

    #[test_log::test]
    fn test_load_preserves_declaration_order() {
        let root = tempdir().unwrap();
        let app = root.path().join("app");
        fs::create_dir_all(&app).unwrap();
        let linked = root.path().join("linked");
        write_named_package(&linked, "a", "pak-a");
        write_named_package(&linked, "b", "pak-b");
        write_named_package(&linked, "c", "pak-c");
        fs::write(app.join(".links"), "../linked/c\n../linked/a\n../linked/b\n").unwrap();

        let log = PackageLog::new();
        let packages = loader_for(&RealRuntime, &app).load(&log).unwrap();

        let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["pak-c", "pak-a", "pak-b"]);
        assert_eq!(packages[0].root, linked.join("c"));

        let messages = messages(&log);
        assert_eq!(messages.len(), 4);
        assert_eq!(
            messages[0],
            format!(
                "Loading linked folders via the package manifest at {}",
                app.display()
            )
        );
        assert_eq!(
            messages[1],
            format!("  - linking folder {}", linked.join("c").display())
        );
    }

    #[test]
    fn test_load_is_idempotent() {
        let root = tempdir().unwrap();
        let app = root.path().join("app");
        fs::create_dir_all(&app).unwrap();
        write_named_package(&app, "one", "one");
        write_named_package(&app, "two", "two");
        fs::write(app.join(".links"), "two\none\n").unwrap();

        let loader = loader_for(&RealRuntime, &app);
        let first = loader.load(&PackageLog::new()).unwrap();
        let second = loader.load(&PackageLog::new()).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_normalizes_foreign_separators() {
        let root = tempdir().unwrap();
        let app = root.path().join("app");
        fs::create_dir_all(&app).unwrap();
        write_named_package(&app.join("packages"), "pak1", "pak1");

        fs::write(app.join(".links"), "packages\\pak1\npackages/pak1\n").unwrap();

        let packages = loader_for(&RealRuntime, &app)
            .load(&PackageLog::new())
            .unwrap();

        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0], packages[1]);
        assert_eq!(packages[0].root, app.join("packages").join("pak1"));
    }

    #[test]
    fn test_load_propagates_reader_error_and_stops() {
        let root = tempdir().unwrap();
        let app = root.path().join("app");
        fs::create_dir_all(&app).unwrap();
        write_named_package(&app, "good", "good");
        write_named_package(&app, "later", "later");
        fs::write(app.join(".links"), "good\nmissing\nlater\n").unwrap();

        let log = PackageLog::new();
        let err = loader_for(&RealRuntime, &app).load(&log).unwrap_err();

        assert!(format!("{:#}", err).contains("does not exist"));
        let messages = messages(&log);
        // Manifest trace + "good" + "missing"; "later" is never visited
        assert_eq!(messages.len(), 3);
        assert!(messages[2].ends_with("missing"));
    }

    #[test]
    fn test_load_with_custom_link_file_name() {
        let root = tempdir().unwrap();
        let app = root.path().join("app");
        fs::create_dir_all(&app).unwrap();
        write_named_package(&app, "pak", "pak");
        fs::write(app.join(".links"), "ignored\n").unwrap();
        fs::write(app.join("bottles.links"), "pak\n").unwrap();

        let loader = LinkedFolderLoader::with_conventions(
            &RealRuntime,
            &app,
            content_subfolder("content"),
            PathConventions::default().with_link_file("bottles.links"),
        );
        let packages = loader.load(&PackageLog::new()).unwrap();

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "pak");
    }

    #[test]
    fn test_describe() {
        let runtime = MockRuntime::new();
        let app = test_app_dir();
        let description = loader_for(&runtime, &app).describe();

        assert_eq!(description.title, "Linked Folder");
        assert_eq!(
            description.short_description,
            format!("Link to {}", app.display())
        );
    }
}
