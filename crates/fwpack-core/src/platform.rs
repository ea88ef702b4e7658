//! Supported build platforms and where their frameworks are built to

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default directory that contains one subdirectory per platform
pub const DEFAULT_BUILD_ROOT: &str = "Carthage/Build";

/// A platform a framework can be built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// macOS
    #[serde(rename = "Mac")]
    Mac,
    /// iOS (iPhone, iPad)
    #[serde(rename = "iOS")]
    Ios,
    /// watchOS
    #[serde(rename = "watchOS")]
    WatchOs,
    /// tvOS
    #[serde(rename = "tvOS")]
    TvOs,
}

impl Platform {
    /// All supported platforms, in the order their artifacts are archived
    pub const ALL: [Platform; 4] = [Self::Mac, Self::Ios, Self::WatchOs, Self::TvOs];

    /// Name of the directory this platform's builds are written to
    pub fn directory_name(&self) -> &'static str {
        match self {
            Self::Mac => "Mac",
            Self::Ios => "iOS",
            Self::WatchOs => "watchOS",
            Self::TvOs => "tvOS",
        }
    }

    /// Directory containing built frameworks for this platform
    pub fn relative_path(&self, build_root: &Path) -> PathBuf {
        build_root.join(self.directory_name())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directory_name())
    }
}
