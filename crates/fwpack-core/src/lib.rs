//! fwpack Core - Framework discovery and archiving
//!
//! This crate provides the pieces behind the `fwpack archive` command:
//! locating previously built framework bundles for each supported platform,
//! packaging them into a single zip archive, and probing the terminal to
//! decide how results are presented.

pub mod archive;
pub mod config;
pub mod environment;
pub mod error;
pub mod formatting;
pub mod packager;
pub mod platform;

pub use archive::{
    candidate_path, resolve_output_path, ArchiveOutcome, ArchivePipeline, ArchiveReporter,
    ArchivedArtifact,
};
pub use environment::{get_environment_variable, Environment, ProcessEnvironment, Terminal};
pub use error::{ArchiveError, ConfigError, PackagingError, Result};
pub use formatting::{ColorOption, Formatting};
pub use packager::{BuiltinZipPackager, Packager, PackagerKind, SystemZipPackager};
pub use platform::Platform;
