//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::packager::{PackagerKind, DEFAULT_COMPRESSION_LEVEL};
use crate::platform::{Platform, DEFAULT_BUILD_ROOT};

/// Main configuration for fwpack
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Archive configuration
    pub archive: ArchiveConfig,
}

/// Settings for the `archive` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Directory holding one subdirectory per platform, relative to the project root
    pub build_root: PathBuf,

    /// Platforms to look for, in archive order
    pub platforms: Vec<Platform>,

    /// Packaging engine
    pub packager: PackagerKind,

    /// Deflate level (0-9) used by the builtin packager
    pub compression_level: u8,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            build_root: PathBuf::from(DEFAULT_BUILD_ROOT),
            platforms: Platform::ALL.to_vec(),
            packager: PackagerKind::Auto,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}
