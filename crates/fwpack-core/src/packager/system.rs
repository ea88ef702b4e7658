//! Packaging with the system `zip` tool

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::Packager;
use crate::error::PackagingError;

/// Runs `zip -q -r --symlinks <destination> <inputs...>`
#[derive(Debug, Clone)]
pub struct SystemZipPackager {
    zip_path: PathBuf,
    working_dir: PathBuf,
}

impl SystemZipPackager {
    /// Create a packager running the `zip` binary at `zip_path`
    pub fn new(zip_path: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            zip_path: zip_path.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Find `zip` on `PATH`
    pub fn locate(working_dir: &Path) -> Result<Self, PackagingError> {
        let zip_path = which::which("zip").map_err(|_| PackagingError::ToolNotFound {
            tool: "zip".to_string(),
        })?;
        debug!(path = %zip_path.display(), "found zip tool");
        Ok(Self::new(zip_path, working_dir))
    }

    fn arguments(destination: &Path, inputs: &[PathBuf]) -> Vec<String> {
        let mut args = vec![
            "-q".to_string(),
            "-r".to_string(),
            "--symlinks".to_string(),
            destination.to_string_lossy().to_string(),
        ];
        args.extend(inputs.iter().map(|p| p.to_string_lossy().to_string()));
        args
    }
}

impl Packager for SystemZipPackager {
    fn name(&self) -> &'static str {
        "system"
    }

    fn create_archive(
        &self,
        destination: &Path,
        inputs: &[PathBuf],
    ) -> Result<(), PackagingError> {
        let args = Self::arguments(destination, inputs);
        info!(
            destination = %destination.display(),
            inputs = inputs.len(),
            "running zip"
        );

        let output = Command::new(&self.zip_path)
            .args(&args)
            .current_dir(&self.working_dir)
            .output()?;

        if !output.status.success() {
            return Err(PackagingError::CommandFailed {
                command: format!("{} {}", self.zip_path.display(), args.join(" ")),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        debug!(destination = %destination.display(), "zip finished");
        Ok(())
    }
}
