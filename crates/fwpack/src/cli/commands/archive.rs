//! Archive command - Package every built copy of a framework into one zip

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use tracing::{debug, info};

use fwpack_core::config::load_config_or_default;
use fwpack_core::{
    ArchiveError, ArchiveOutcome, ArchivePipeline, ArchiveReporter, ColorOption, Formatting,
    PackagerKind, Platform, Terminal,
};

use crate::cli::{output, Cli, OutputFormat};

/// Archive a built framework into a zip
#[derive(Debug, Args)]
pub struct ArchiveCommand {
    /// Name of the built framework to archive (without any extension)
    #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub framework_name: String,

    /// Path at which to create the zip file (or blank to infer it from the framework name)
    #[arg(short, long, default_value = "")]
    pub output: String,

    /// When to colorize output
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorArg,

    /// Directory holding one build directory per platform
    #[arg(long, env = "FWPACK_BUILD_ROOT")]
    pub build_root: Option<PathBuf>,

    /// Only look for builds of these platforms
    #[arg(short, long = "platform", value_enum)]
    pub platforms: Vec<PlatformArg>,

    /// Packaging engine
    #[arg(long, value_enum)]
    pub packager: Option<PackagerArg>,
}

/// Color preference argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorArg {
    /// Colorize when writing to a capable terminal
    Auto,
    /// Always colorize
    Always,
    /// Never colorize
    Never,
}

impl From<ColorArg> for ColorOption {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorOption::Auto,
            ColorArg::Always => ColorOption::Always,
            ColorArg::Never => ColorOption::Never,
        }
    }
}

/// Target platform argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    /// macOS
    Mac,
    /// iOS
    #[value(name = "ios")]
    Ios,
    /// watchOS
    #[value(name = "watchos")]
    WatchOs,
    /// tvOS
    #[value(name = "tvos")]
    TvOs,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Mac => Platform::Mac,
            PlatformArg::Ios => Platform::Ios,
            PlatformArg::WatchOs => Platform::WatchOs,
            PlatformArg::TvOs => Platform::TvOs,
        }
    }
}

/// Packaging engine argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PackagerArg {
    /// System zip tool when installed, builtin writer otherwise
    Auto,
    /// System zip tool
    System,
    /// Builtin zip writer
    Builtin,
}

impl From<PackagerArg> for PackagerKind {
    fn from(arg: PackagerArg) -> Self {
        match arg {
            PackagerArg::Auto => PackagerKind::Auto,
            PackagerArg::System => PackagerKind::System,
            PackagerArg::Builtin => PackagerKind::Builtin,
        }
    }
}

/// Prints progress lines as the pipeline reports them
struct ConsoleReporter {
    formatting: Formatting,
    enabled: bool,
}

impl ArchiveReporter for ConsoleReporter {
    fn found(&mut self, path: &Path) {
        if self.enabled {
            println!(
                "{}Found {}",
                self.formatting.bullets(),
                self.formatting.path(&path.display().to_string())
            );
        }
    }

    fn created(&mut self, path: &Path) {
        if self.enabled {
            println!(
                "{}Created {}",
                self.formatting.bullets(),
                self.formatting.path(&path.display().to_string())
            );
        }
    }
}

impl ArchiveCommand {
    /// Execute the archive command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(framework = %self.framework_name, output = %self.output, "executing archive command");
        let cwd = std::env::current_dir()?;
        let formatting = Formatting::resolve(self.color.into(), &Terminal::process());

        let outcome = self.run(cli, &cwd, formatting)?;

        if cli.format == OutputFormat::Json {
            let json = serde_json::json!({
                "framework": self.framework_name,
                "output": outcome.output,
                "artifacts": outcome.artifacts,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }

        Ok(())
    }

    /// Archive the framework found under `cwd`
    fn run(&self, cli: &Cli, cwd: &Path, formatting: Formatting) -> anyhow::Result<ArchiveOutcome> {
        let (config, config_path) = load_config_or_default(cwd)?;
        if let Some(path) = &config_path {
            debug!(path = %path.display(), "using config file");
        }
        let archive_config = config.archive;

        let build_root = self
            .build_root
            .clone()
            .unwrap_or(archive_config.build_root);
        let platforms = self.selected_platforms(archive_config.platforms);
        if platforms.is_empty() && cli.format == OutputFormat::Text && !cli.quiet {
            output::warning("No platforms selected; nothing can be found to archive");
        }

        let packager = self
            .packager
            .map(PackagerKind::from)
            .unwrap_or(archive_config.packager)
            .create(cwd, archive_config.compression_level)
            .map_err(ArchiveError::from)?;
        debug!(packager = packager.name(), build_root = %build_root.display(), "archive settings resolved");

        let mut reporter = ConsoleReporter {
            formatting,
            enabled: cli.format == OutputFormat::Text && !cli.quiet,
        };

        let outcome = ArchivePipeline::new(cwd)
            .with_build_root(build_root)
            .archive(
                &self.framework_name,
                &self.output,
                &platforms,
                packager.as_ref(),
                &mut reporter,
            )?;

        Ok(outcome)
    }

    /// Platforms to search, always in platform order.
    ///
    /// `--platform` flags replace the configured list when given.
    fn selected_platforms(&self, configured: Vec<Platform>) -> Vec<Platform> {
        let wanted: Vec<Platform> = if self.platforms.is_empty() {
            configured
        } else {
            self.platforms.iter().map(|&p| p.into()).collect()
        };

        Platform::ALL
            .into_iter()
            .filter(|p| wanted.contains(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use clap::Parser;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["fwpack"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn archive_command(cli: &Cli) -> &ArchiveCommand {
        match cli.command {
            Commands::Archive(ref cmd) => cmd,
            ref other => panic!("unexpected command: {other:?}"),
        }
    }

    fn build(root: &Path, relative: &str) {
        let framework = root.join(relative);
        std::fs::create_dir_all(&framework).unwrap();
        std::fs::write(framework.join("Info.plist"), b"<plist/>").unwrap();
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Platform::from(PlatformArg::WatchOs), Platform::WatchOs);
        assert_eq!(ColorOption::from(ColorArg::Never), ColorOption::Never);
        assert_eq!(PackagerKind::from(PackagerArg::Builtin), PackagerKind::Builtin);
    }

    #[test]
    fn test_empty_framework_name_is_rejected() {
        assert!(Cli::try_parse_from(["fwpack", "archive", ""]).is_err());
    }

    #[test]
    fn test_selected_platforms_keep_platform_order() {
        let cli = parse(&["archive", "Foo", "-p", "tvos", "-p", "mac"]);
        let cmd = archive_command(&cli);
        assert_eq!(
            cmd.selected_platforms(Platform::ALL.to_vec()),
            vec![Platform::Mac, Platform::TvOs]
        );
    }

    #[test]
    fn test_selected_platforms_default_to_config() {
        let cli = parse(&["archive", "Foo"]);
        let cmd = archive_command(&cli);
        assert_eq!(
            cmd.selected_platforms(vec![Platform::Ios]),
            vec![Platform::Ios]
        );
        assert_eq!(
            cmd.selected_platforms(vec![Platform::TvOs, Platform::Ios]),
            vec![Platform::Ios, Platform::TvOs]
        );
    }

    #[test]
    fn test_run_writes_default_archive() {
        let temp = TempDir::new().unwrap();
        build(temp.path(), "Carthage/Build/iOS/Foo.framework");

        let cli = parse(&["-q", "archive", "Foo", "--packager", "builtin"]);
        let outcome = archive_command(&cli)
            .run(&cli, temp.path(), Formatting::plain())
            .unwrap();

        assert_eq!(outcome.output, PathBuf::from("Foo.framework.zip"));
        assert_eq!(
            outcome.paths(),
            vec![PathBuf::from("Carthage/Build/iOS/Foo.framework")]
        );
        assert!(temp.path().join("Foo.framework.zip").is_file());
    }

    #[test]
    fn test_run_uses_config_file() {
        let temp = TempDir::new().unwrap();
        build(temp.path(), "build/Mac/Foo.framework");
        std::fs::write(
            temp.path().join("fwpack.toml"),
            "[archive]\nbuild_root = \"build\"\npackager = \"builtin\"\n",
        )
        .unwrap();

        let cli = parse(&["-q", "archive", "Foo", "--output", "dist.zip"]);
        let outcome = archive_command(&cli)
            .run(&cli, temp.path(), Formatting::plain())
            .unwrap();

        assert_eq!(outcome.output, PathBuf::from("dist.zip"));
        assert!(temp.path().join("dist.zip").is_file());
    }

    #[test]
    fn test_run_orders_configured_platforms() {
        let temp = TempDir::new().unwrap();
        build(temp.path(), "Carthage/Build/iOS/Foo.framework");
        build(temp.path(), "Carthage/Build/Mac/Foo.framework");
        std::fs::write(
            temp.path().join("fwpack.toml"),
            "[archive]\nplatforms = [\"iOS\", \"Mac\"]\npackager = \"builtin\"\n",
        )
        .unwrap();

        let cli = parse(&["-q", "archive", "Foo"]);
        let outcome = archive_command(&cli)
            .run(&cli, temp.path(), Formatting::plain())
            .unwrap();

        assert_eq!(
            outcome.paths(),
            vec![
                PathBuf::from("Carthage/Build/Mac/Foo.framework"),
                PathBuf::from("Carthage/Build/iOS/Foo.framework"),
            ]
        );
    }

    #[test]
    fn test_run_ignores_config_in_parent_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("fwpack.toml"),
            "[archive]\nbuild_root = \"build\"\nplatforms = [\"tvOS\"]\n",
        )
        .unwrap();
        let project = temp.path().join("App");
        build(&project, "Carthage/Build/Mac/Foo.framework");

        let cli = parse(&["-q", "archive", "Foo", "--packager", "builtin"]);
        let outcome = archive_command(&cli)
            .run(&cli, &project, Formatting::plain())
            .unwrap();

        assert_eq!(
            outcome.paths(),
            vec![PathBuf::from("Carthage/Build/Mac/Foo.framework")]
        );
        assert!(project.join("Foo.framework.zip").is_file());
    }

    #[test]
    fn test_run_without_builds_exits_with_invalid_argument() {
        let temp = TempDir::new().unwrap();

        let cli = parse(&["-q", "archive", "Foo", "--packager", "builtin"]);
        let err = archive_command(&cli)
            .run(&cli, temp.path(), Formatting::plain())
            .unwrap_err();

        assert!(err.to_string().contains("Foo.framework"));
        assert_eq!(crate::exit_codes::for_error(&err), 2);
        assert!(!temp.path().join("Foo.framework.zip").exists());
    }
}
