//! Packaging engines that write zip archives

mod builtin;
mod system;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PackagingError;

pub use builtin::{BuiltinZipPackager, DEFAULT_COMPRESSION_LEVEL};
pub use system::SystemZipPackager;

/// Writes a single archive from a list of inputs.
///
/// Relative inputs and destinations are resolved against the packager's
/// working directory. Each input is stored under the relative path it was
/// given, recursively. Whether an existing destination is overwritten is up
/// to the implementation.
pub trait Packager {
    /// Short name used in logs and output
    fn name(&self) -> &'static str;

    /// Create an archive at `destination` containing every input
    fn create_archive(&self, destination: &Path, inputs: &[PathBuf])
        -> Result<(), PackagingError>;
}

/// Which packaging engine to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagerKind {
    /// The system `zip` tool when installed, otherwise the builtin writer
    #[default]
    Auto,
    /// The system `zip` tool
    System,
    /// The in-process zip writer
    Builtin,
}

impl PackagerKind {
    /// Build the packager this kind selects
    pub fn create(
        self,
        working_dir: &Path,
        compression_level: u8,
    ) -> Result<Box<dyn Packager>, PackagingError> {
        match self {
            Self::System => Ok(Box::new(SystemZipPackager::locate(working_dir)?)),
            Self::Builtin => Ok(Box::new(
                BuiltinZipPackager::new(working_dir).with_compression_level(compression_level),
            )),
            Self::Auto => match SystemZipPackager::locate(working_dir) {
                Ok(packager) => Ok(Box::new(packager)),
                Err(e) => {
                    debug!(error = %e, "falling back to builtin zip writer");
                    Ok(Box::new(
                        BuiltinZipPackager::new(working_dir)
                            .with_compression_level(compression_level),
                    ))
                }
            },
        }
    }
}

/// Resolve a path against a working directory, leaving absolute paths alone
pub(crate) fn resolve(working_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}
