//! Archive pipeline - finds built frameworks and packages them into one zip
//!
//! For every platform the pipeline looks for
//! `<build_root>/<platform>/<name>.framework` relative to its working
//! directory. The copies that exist are handed to a [`Packager`] in platform
//! order, so the archive contents never depend on directory listing order.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ArchiveError, Result};
use crate::packager::Packager;
use crate::platform::{Platform, DEFAULT_BUILD_ROOT};

/// Extension of a framework bundle
pub const FRAMEWORK_EXTENSION: &str = "framework";

/// Receives progress notifications while archiving
pub trait ArchiveReporter {
    /// A built framework was found
    fn found(&mut self, path: &Path);

    /// The archive was written
    fn created(&mut self, path: &Path);
}

/// Discards all notifications
impl ArchiveReporter for () {
    fn found(&mut self, _path: &Path) {}

    fn created(&mut self, _path: &Path) {}
}

/// A framework copy that was included in the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedArtifact {
    pub platform: Platform,
    pub path: PathBuf,
}

/// Result of a successful archive run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveOutcome {
    /// Path of the written archive
    pub output: PathBuf,
    /// Archived frameworks, in platform order
    pub artifacts: Vec<ArchivedArtifact>,
}

impl ArchiveOutcome {
    /// Paths of the archived frameworks, in platform order
    pub fn paths(&self) -> Vec<PathBuf> {
        self.artifacts.iter().map(|a| a.path.clone()).collect()
    }
}

/// Where a platform's copy of a framework is expected, relative to the project root
pub fn candidate_path(build_root: &Path, platform: Platform, framework_name: &str) -> PathBuf {
    platform
        .relative_path(build_root)
        .join(format!("{}.{}", framework_name, FRAMEWORK_EXTENSION))
}

/// The archive path to write: `output_path` if given, else `<name>.framework.zip`
pub fn resolve_output_path(framework_name: &str, output_path: &str) -> PathBuf {
    if output_path.is_empty() {
        PathBuf::from(format!("{}.{}.zip", framework_name, FRAMEWORK_EXTENSION))
    } else {
        PathBuf::from(output_path)
    }
}

/// Finds built frameworks and packages them
#[derive(Debug, Clone)]
pub struct ArchivePipeline {
    working_dir: PathBuf,
    build_root: PathBuf,
}

impl ArchivePipeline {
    /// Create a pipeline rooted at the project directory
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            build_root: PathBuf::from(DEFAULT_BUILD_ROOT),
        }
    }

    /// Set the directory, relative to the project root, holding per-platform builds
    pub fn with_build_root(mut self, build_root: impl Into<PathBuf>) -> Self {
        self.build_root = build_root.into();
        self
    }

    /// Existing copies of the framework, in platform order.
    ///
    /// `reporter.found` is called for each copy as it is found.
    pub fn discover(
        &self,
        framework_name: &str,
        platforms: &[Platform],
        reporter: &mut dyn ArchiveReporter,
    ) -> Vec<ArchivedArtifact> {
        let mut found = Vec::new();

        for &platform in platforms {
            let path = candidate_path(&self.build_root, platform, framework_name);
            if !self.working_dir.join(&path).exists() {
                debug!(platform = %platform, path = %path.display(), "framework not built");
                continue;
            }

            info!(platform = %platform, path = %path.display(), "found framework");
            reporter.found(&path);
            found.push(ArchivedArtifact { platform, path });
        }

        found
    }

    /// Package every built copy of `framework_name` into a single archive.
    ///
    /// Fails with [`ArchiveError::InvalidArgument`] before packaging if no
    /// platform has a built copy. Packaging failures are returned unchanged
    /// as [`ArchiveError::Packaging`].
    pub fn archive(
        &self,
        framework_name: &str,
        output_path: &str,
        platforms: &[Platform],
        packager: &dyn Packager,
        reporter: &mut dyn ArchiveReporter,
    ) -> Result<ArchiveOutcome> {
        let artifacts = self.discover(framework_name, platforms, reporter);

        if artifacts.is_empty() {
            warn!(framework = framework_name, "no built copies found");
            return Err(ArchiveError::invalid_argument(format!(
                "Could not find any copies of {}.{}. Make sure you're in the project's root and that the framework has already been built.",
                framework_name, FRAMEWORK_EXTENSION
            )));
        }

        let output = resolve_output_path(framework_name, output_path);
        let inputs: Vec<PathBuf> = artifacts.iter().map(|a| a.path.clone()).collect();

        info!(
            output = %output.display(),
            packager = packager.name(),
            count = inputs.len(),
            "creating archive"
        );
        packager.create_archive(&output, &inputs)?;
        reporter.created(&output);

        Ok(ArchiveOutcome { output, artifacts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PackagingError;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingPackager {
        calls: RefCell<Vec<(PathBuf, Vec<PathBuf>)>>,
        fail: bool,
    }

    impl Packager for RecordingPackager {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn create_archive(
            &self,
            destination: &Path,
            inputs: &[PathBuf],
        ) -> std::result::Result<(), PackagingError> {
            self.calls
                .borrow_mut()
                .push((destination.to_path_buf(), inputs.to_vec()));
            if self.fail {
                return Err(PackagingError::CommandFailed {
                    command: "zip".to_string(),
                    exit_code: Some(15),
                    stderr: "disk full".to_string(),
                });
            }
            Ok(())
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct RecordingReporter {
        events: Vec<String>,
    }

    impl ArchiveReporter for RecordingReporter {
        fn found(&mut self, path: &Path) {
            self.events.push(format!("found {}", path.display()));
        }

        fn created(&mut self, path: &Path) {
            self.events.push(format!("created {}", path.display()));
        }
    }

    fn build(root: &Path, relative: &str) {
        std::fs::create_dir_all(root.join(relative)).unwrap();
    }

    #[test]
    fn test_candidate_path_is_stable() {
        let first = candidate_path(Path::new("build"), Platform::Mac, "Foo");
        let second = candidate_path(Path::new("build"), Platform::Mac, "Foo");
        assert_eq!(first, PathBuf::from("build/Mac/Foo.framework"));
        assert_eq!(first.as_os_str(), second.as_os_str());
    }

    #[test]
    fn test_resolve_output_path() {
        assert_eq!(resolve_output_path("Foo", ""), PathBuf::from("Foo.framework.zip"));
        assert_eq!(
            resolve_output_path("Foo", "/tmp/out.zip"),
            PathBuf::from("/tmp/out.zip")
        );
    }

    #[test]
    fn test_archives_only_existing_platforms() {
        let temp = TempDir::new().unwrap();
        build(temp.path(), "build/Mac/Foo.framework");

        let pipeline = ArchivePipeline::new(temp.path()).with_build_root("build");
        let packager = RecordingPackager::default();
        let mut reporter = RecordingReporter::default();

        let outcome = pipeline
            .archive("Foo", "", &[Platform::Mac, Platform::Ios], &packager, &mut reporter)
            .unwrap();

        assert_eq!(
            packager.calls.into_inner(),
            vec![(
                PathBuf::from("Foo.framework.zip"),
                vec![PathBuf::from("build/Mac/Foo.framework")]
            )]
        );
        assert_eq!(outcome.output, PathBuf::from("Foo.framework.zip"));
        assert_eq!(
            reporter.events,
            vec![
                "found build/Mac/Foo.framework".to_string(),
                "created Foo.framework.zip".to_string()
            ]
        );
    }

    #[test]
    fn test_no_copies_is_invalid_argument() {
        let temp = TempDir::new().unwrap();
        let pipeline = ArchivePipeline::new(temp.path()).with_build_root("build");
        let packager = RecordingPackager::default();
        let mut reporter = RecordingReporter::default();

        let err = pipeline
            .archive("Foo", "", &[Platform::Mac, Platform::Ios], &packager, &mut reporter)
            .unwrap_err();

        match err {
            ArchiveError::InvalidArgument { description } => {
                assert!(description.contains("Foo.framework"));
                assert!(description.contains("already been built"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(packager.calls.borrow().is_empty());
        assert!(reporter.events.is_empty());
    }

    #[test]
    fn test_empty_platform_list_is_invalid_argument() {
        let temp = TempDir::new().unwrap();
        build(temp.path(), "Carthage/Build/Mac/Foo.framework");
        let packager = RecordingPackager::default();

        let err = ArchivePipeline::new(temp.path())
            .archive("Foo", "", &[], &packager, &mut ())
            .unwrap_err();

        assert!(matches!(err, ArchiveError::InvalidArgument { .. }));
        assert!(packager.calls.borrow().is_empty());
    }

    #[test]
    fn test_artifacts_follow_platform_order() {
        let temp = TempDir::new().unwrap();
        // Created in reverse so directory order differs from platform order
        build(temp.path(), "Carthage/Build/tvOS/Foo.framework");
        build(temp.path(), "Carthage/Build/iOS/Foo.framework");
        build(temp.path(), "Carthage/Build/Mac/Foo.framework");

        let packager = RecordingPackager::default();
        let outcome = ArchivePipeline::new(temp.path())
            .archive("Foo", "out.zip", &Platform::ALL, &packager, &mut ())
            .unwrap();

        let expected = vec![
            PathBuf::from("Carthage/Build/Mac/Foo.framework"),
            PathBuf::from("Carthage/Build/iOS/Foo.framework"),
            PathBuf::from("Carthage/Build/tvOS/Foo.framework"),
        ];
        assert_eq!(outcome.paths(), expected);
        assert_eq!(packager.calls.borrow()[0].1, expected);
        assert_eq!(packager.calls.borrow()[0].0, PathBuf::from("out.zip"));
        assert_eq!(
            outcome.artifacts.iter().map(|a| a.platform).collect::<Vec<_>>(),
            vec![Platform::Mac, Platform::Ios, Platform::TvOs]
        );
    }

    #[test]
    fn test_plain_file_counts_as_existing() {
        let temp = TempDir::new().unwrap();
        build(temp.path(), "build/iOS");
        std::fs::write(temp.path().join("build/iOS/Foo.framework"), b"").unwrap();

        let found = ArchivePipeline::new(temp.path())
            .with_build_root("build")
            .discover("Foo", &[Platform::Ios], &mut ());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_packaging_error_passes_through() {
        let temp = TempDir::new().unwrap();
        build(temp.path(), "build/Mac/Foo.framework");
        let packager = RecordingPackager {
            fail: true,
            ..Default::default()
        };
        let mut reporter = RecordingReporter::default();

        let err = ArchivePipeline::new(temp.path())
            .with_build_root("build")
            .archive("Foo", "", &[Platform::Mac], &packager, &mut reporter)
            .unwrap_err();

        assert!(matches!(
            err,
            ArchiveError::Packaging(PackagingError::CommandFailed {
                exit_code: Some(15),
                ..
            })
        ));
        assert_eq!(reporter.events, vec!["found build/Mac/Foo.framework".to_string()]);
    }
}
