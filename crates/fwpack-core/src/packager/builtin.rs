//! In-process zip writer

use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, trace};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{resolve, Packager};
use crate::error::PackagingError;

/// Default deflate level
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

/// Writes archives with the `zip` crate.
///
/// Directories, regular files and symbolic links are stored as they are on
/// disk; links are never followed. The archive is written to a temporary
/// file next to the destination and only moved into place once complete.
#[derive(Debug, Clone)]
pub struct BuiltinZipPackager {
    working_dir: PathBuf,
    compression_level: u8,
}

impl BuiltinZipPackager {
    /// Create a packager resolving paths against `working_dir`
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Set the deflate level; `0` stores entries uncompressed
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level.min(9);
        self
    }

    fn base_options(&self) -> SimpleFileOptions {
        if self.compression_level == 0 {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        } else {
            SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(i64::from(self.compression_level)))
        }
    }

    fn add_input<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        input: &Path,
        skip: &[&Path],
    ) -> Result<usize, PackagingError> {
        let root = resolve(&self.working_dir, input);
        let base_name = entry_name(input)?;
        let mut entries = 0;

        // The archive being written may live inside an input bundle
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !skip.contains(&e.path()));
        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            let relative = entry
                .path()
                .strip_prefix(&root)
                .map_err(|e| PackagingError::InvalidInput {
                    path: entry.path().to_path_buf(),
                    reason: e.to_string(),
                })?;
            let name = if relative.as_os_str().is_empty() {
                base_name.clone()
            } else {
                format!("{}/{}", base_name, entry_name(relative)?)
            };

            let metadata = entry.metadata().map_err(io::Error::from)?;
            let mut options = self.base_options();
            if let Some(mode) = unix_mode(&metadata) {
                options = options.unix_permissions(mode);
            }

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                let target = fs::read_link(entry.path())?;
                trace!(name = %name, target = %target.display(), "adding symlink");
                zip.add_symlink(name, target.to_string_lossy().to_string(), options)?;
            } else if file_type.is_dir() {
                trace!(name = %name, "adding directory");
                zip.add_directory(name, options)?;
            } else {
                trace!(name = %name, "adding file");
                zip.start_file(name, options)?;
                let mut file = File::open(entry.path())?;
                io::copy(&mut file, zip)?;
            }
            entries += 1;
        }

        Ok(entries)
    }
}

impl Packager for BuiltinZipPackager {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn create_archive(
        &self,
        destination: &Path,
        inputs: &[PathBuf],
    ) -> Result<(), PackagingError> {
        let destination = resolve(&self.working_dir, destination);
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(&self.working_dir);

        info!(
            destination = %destination.display(),
            inputs = inputs.len(),
            level = self.compression_level,
            "writing zip archive"
        );

        let temp = tempfile::Builder::new()
            .prefix(".fwpack-")
            .suffix(".zip.tmp")
            .tempfile_in(parent)?;
        let temp_path = temp.path().to_path_buf();
        let skip = [temp_path.as_path(), destination.as_path()];
        let mut zip = ZipWriter::new(temp);

        let mut entries = 0;
        for input in inputs {
            entries += self.add_input(&mut zip, input, &skip)?;
        }

        let temp = zip.finish()?;
        temp.persist(&destination)?;

        debug!(destination = %destination.display(), entries, "zip archive written");
        Ok(())
    }
}

/// Archive entry name for a relative path, always `/`-separated
fn entry_name(path: &Path) -> Result<String, PackagingError> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| PackagingError::InvalidInput {
                    path: path.to_path_buf(),
                    reason: "path is not valid UTF-8".to_string(),
                })?;
                parts.push(part);
            }
            Component::ParentDir => {
                return Err(PackagingError::InvalidInput {
                    path: path.to_path_buf(),
                    reason: "path must not contain '..'".to_string(),
                });
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if parts.is_empty() {
        return Err(PackagingError::InvalidInput {
            path: path.to_path_buf(),
            reason: "path has no name".to_string(),
        });
    }
    Ok(parts.join("/"))
}

#[cfg(unix)]
fn unix_mode(metadata: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn unix_mode(_metadata: &fs::Metadata) -> Option<u32> {
    None
}
