//! Platforms command - Show where each platform's builds are expected

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use fwpack_core::config::load_config_or_default;
use fwpack_core::Platform;

use crate::cli::{output, Cli, OutputFormat};

/// List supported platforms and their build directories
#[derive(Debug, Args)]
pub struct PlatformsCommand {
    /// Directory holding one build directory per platform
    #[arg(long, env = "FWPACK_BUILD_ROOT")]
    pub build_root: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PlatformEntry {
    name: &'static str,
    directory: PathBuf,
    enabled: bool,
}

impl PlatformsCommand {
    /// Execute the platforms command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing platforms command");
        let cwd = std::env::current_dir()?;
        let (config, _) = load_config_or_default(&cwd)?;

        let build_root = self
            .build_root
            .clone()
            .unwrap_or_else(|| config.archive.build_root.clone());
        let entries = Self::entries(&build_root, &config.archive.platforms);

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Text => {
                println!("{}", style("Platforms").bold());
                for entry in &entries {
                    let directory = entry.directory.display().to_string();
                    let value = if entry.enabled {
                        style(directory).cyan().to_string()
                    } else {
                        format!("{} {}", style(directory).dim(), style("(disabled)").dim())
                    };
                    println!("{}", output::key_value(entry.name, &value));
                }
            }
        }

        Ok(())
    }

    fn entries(build_root: &std::path::Path, enabled: &[Platform]) -> Vec<PlatformEntry> {
        Platform::ALL
            .iter()
            .map(|platform| PlatformEntry {
                name: platform.directory_name(),
                directory: platform.relative_path(build_root),
                enabled: enabled.contains(platform),
            })
            .collect()
    }
}
