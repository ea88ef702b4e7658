//! Configuration validation

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    let archive = &config.archive;

    if archive.build_root.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "archive.build_root".to_string(),
            message: "build root cannot be empty".to_string(),
        }
        .into());
    }

    if archive.compression_level > 9 {
        return Err(ConfigError::InvalidValue {
            field: "archive.compression_level".to_string(),
            message: "must be between 0 and 9".to_string(),
        }
        .into());
    }

    let mut seen = HashSet::new();
    for (i, platform) in archive.platforms.iter().enumerate() {
        if !seen.insert(platform) {
            return Err(ConfigError::InvalidValue {
                field: format!("archive.platforms[{}]", i),
                message: format!("{} is listed more than once", platform),
            }
            .into());
        }
    }

    if archive.platforms.is_empty() {
        warn!("no platforms configured, nothing can be archived");
    }

    debug!("configuration validation passed");
    Ok(())
}
