use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::PackageLoader;
use crate::archive::ZipExtractor;
use crate::config::PathConventions;
use crate::diagnostics::{Description, PackageLog};
use crate::package::{ContentFolderResolver, PackageInfo, PackageManifestReader};
use crate::runtime::{Runtime, full_path};

/// Loads packages shipped as `.zip` archives.
///
/// Each archive is exploded into `<exploded_dir>/<archive stem>`, replacing
/// whatever a previous pass left there, and the exploded folder is read like
/// any other package folder.
pub struct ZipPackageLoader<'a, R: Runtime> {
    runtime: &'a R,
    archive_dir: PathBuf,
    exploded_dir: PathBuf,
    extractor: ZipExtractor,
    reader: PackageManifestReader<'a, R>,
}

impl<'a, R: Runtime> ZipPackageLoader<'a, R> {
    pub fn new(
        runtime: &'a R,
        archive_dir: impl Into<PathBuf>,
        exploded_dir: impl Into<PathBuf>,
        content_folder: ContentFolderResolver,
        conventions: PathConventions,
    ) -> Self {
        Self {
            runtime,
            archive_dir: archive_dir.into(),
            exploded_dir: exploded_dir.into(),
            extractor: ZipExtractor,
            reader: PackageManifestReader::new(runtime, conventions, content_folder),
        }
    }
}

impl<R: Runtime> PackageLoader for ZipPackageLoader<'_, R> {
    #[tracing::instrument(skip(self, log), fields(dir = %self.archive_dir.display()))]
    fn load(&self, log: &PackageLog) -> Result<Vec<PackageInfo>> {
        let archive_dir = full_path(self.runtime, &self.archive_dir)?;
        if !self.runtime.is_dir(&archive_dir) {
            log.trace(format_args!(
                "No archive folder found at {}",
                archive_dir.display()
            ));
            return Ok(Vec::new());
        }

        let mut archives: Vec<PathBuf> = self
            .runtime
            .read_dir(&archive_dir)?
            .into_iter()
            .filter(|path| self.extractor.can_handle(path) && self.runtime.is_file(path))
            .collect();
        archives.sort();

        if archives.is_empty() {
            log.trace(format_args!(
                "No zip packages found in {}",
                archive_dir.display()
            ));
            return Ok(Vec::new());
        }

        let exploded_dir = full_path(self.runtime, &self.exploded_dir)?;
        log.trace(format_args!(
            "Exploding {} zip package(s) from {} into {}",
            archives.len(),
            archive_dir.display(),
            exploded_dir.display()
        ));

        // Colliding targets must fail before anything is extracted
        let mut targets: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
        let mut plan = Vec::with_capacity(archives.len());
        for archive in archives {
            let stem = archive
                .file_stem()
                .with_context(|| format!("Archive {} has no file name", archive.display()))?;
            let target = exploded_dir.join(stem);
            if let Some(previous) = targets.insert(target.clone(), archive.clone()) {
                bail!(
                    "Archives {} and {} would both explode into {}",
                    previous.display(),
                    archive.display(),
                    target.display()
                );
            }
            plan.push((archive, target));
        }

        let mut packages = Vec::with_capacity(plan.len());
        for (archive, target) in plan {
            if self.runtime.exists(&target) {
                self.runtime.remove_dir_all(&target).with_context(|| {
                    format!("Failed to clear previous explosion at {}", target.display())
                })?;
            }

            log.trace(format_args!(
                "  - exploding {} to {}",
                archive.display(),
                target.display()
            ));
            self.extractor
                .extract(self.runtime, &archive, &target)
                .with_context(|| format!("Failed to explode {}", archive.display()))?;
            packages.push(self.reader.load_from_folder(&target)?);
        }

        Ok(packages)
    }

    fn describe(&self) -> Description {
        Description::new(
            "Zip Archive",
            format!("Zip packages in {}", self.archive_dir.display()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::content_subfolder;
    use crate::runtime::{MockRuntime, RealRuntime};
    use crate::test_utils::test_app_dir;
    use mockall::predicate::eq;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    fn write_zip(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<()> = FileOptions::default();
        for (name, content) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn loader_for<R: Runtime>(runtime: &R, archives: PathBuf, exploded: PathBuf) -> ZipPackageLoader<'_, R> {
        ZipPackageLoader::new(
            runtime,
            archives,
            exploded,
            content_subfolder("content"),
            PathConventions::default(),
        )
    }

    #[test]
    fn test_load_missing_archive_dir() {
        let mut runtime = MockRuntime::new();
        let archives = test_app_dir().join("bottles");

        runtime
            .expect_is_dir()
            .with(eq(archives.clone()))
            .returning(|_| false);

        let log = PackageLog::new();
        let packages = loader_for(&runtime, archives, test_app_dir().join("exploded"))
            .load(&log)
            .unwrap();

        assert!(packages.is_empty());
        assert_eq!(log.len(), 1);
        assert!(log.entries()[0].message.starts_with("No archive folder found at"));
    }

    #[test_log::test]
    fn test_load_explodes_archives_in_name_order() {
        let root = tempdir().unwrap();
        let archives = root.path().join("bottles");
        let exploded = root.path().join("exploded");
        fs::create_dir_all(&archives).unwrap();

        write_zip(
            &archives.join("web.zip"),
            &[(".package-manifest", r#"{"name": "web", "version": "2.1"}"#)],
        );
        write_zip(
            &archives.join("core.ZIP"),
            &[
                (".package-manifest", r#"{"name": "core"}"#),
                ("content/app.js", "alert(1)"),
            ],
        );
        fs::write(archives.join("notes.txt"), "not an archive").unwrap();

        let log = PackageLog::new();
        let packages = loader_for(&RealRuntime, archives.clone(), exploded.clone())
            .load(&log)
            .unwrap();

        let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["core", "web"]);
        assert_eq!(packages[0].root, exploded.join("core"));
        assert!(exploded.join("core").join("content").join("app.js").exists());
        assert_eq!(
            packages[1].version,
            Some(crate::assembly::Version::new(2, 1))
        );
    }

    #[test]
    fn test_load_replaces_previous_explosion() {
        let root = tempdir().unwrap();
        let archives = root.path().join("bottles");
        let exploded = root.path().join("exploded");
        fs::create_dir_all(&archives).unwrap();
        fs::create_dir_all(exploded.join("pak")).unwrap();
        fs::write(exploded.join("pak").join("stale.txt"), "old").unwrap();

        write_zip(
            &archives.join("pak.zip"),
            &[(".package-manifest", r#"{"name": "pak"}"#)],
        );

        let loader = loader_for(&RealRuntime, archives, exploded.clone());
        let first = loader.load(&PackageLog::new()).unwrap();
        let second = loader.load(&PackageLog::new()).unwrap();

        assert!(!exploded.join("pak").join("stale.txt").exists());
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_rejects_archives_sharing_a_stem() {
        let root = tempdir().unwrap();
        let archives = root.path().join("bottles");
        let exploded = root.path().join("exploded");
        fs::create_dir_all(&archives).unwrap();

        write_zip(
            &archives.join("pak.ZIP"),
            &[(".package-manifest", r#"{"name": "first"}"#)],
        );
        write_zip(
            &archives.join("pak.zip"),
            &[(".package-manifest", r#"{"name": "second"}"#)],
        );

        let err = loader_for(&RealRuntime, archives.clone(), exploded.clone())
            .load(&PackageLog::new())
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains(&archives.join("pak.ZIP").display().to_string()));
        assert!(message.contains(&archives.join("pak.zip").display().to_string()));
        assert!(message.contains(&exploded.join("pak").display().to_string()));
        assert!(!exploded.join("pak").exists());
    }

    #[test]
    fn test_load_empty_archive_dir() {
        let root = tempdir().unwrap();

        let log = PackageLog::new();
        let packages = loader_for(&RealRuntime, root.path().to_path_buf(), root.path().join("x"))
            .load(&log)
            .unwrap();

        assert!(packages.is_empty());
        assert!(log.entries()[0].message.starts_with("No zip packages found in"));
    }

    #[test]
    fn test_load_corrupt_archive_fails() {
        let root = tempdir().unwrap();
        let archives = root.path().join("bottles");
        fs::create_dir_all(&archives).unwrap();
        fs::write(archives.join("broken.zip"), "garbage").unwrap();

        let result = loader_for(&RealRuntime, archives, root.path().join("exploded"))
            .load(&PackageLog::new());

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to explode"));
    }

    #[test]
    fn test_describe() {
        let runtime = MockRuntime::new();
        let archives = test_app_dir().join("bottles");
        let description = loader_for(&runtime, archives.clone(), test_app_dir()).describe();
        assert_eq!(description.title, "Zip Archive");
        assert_eq!(
            description.short_description,
            format!("Zip packages in {}", archives.display())
        );
    }
}
