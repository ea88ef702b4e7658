//! `fwpack completions` - print a completion script for a shell

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::Shell;
use tracing::debug;

use crate::cli::{output, Cli};

/// Print a shell completion script
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate the script for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        debug!(shell = %self.shell, output = ?self.output, "generating completions");

        let Some(path) = &self.output else {
            return self.write_script(&mut io::stdout().lock());
        };

        self.write_script(&mut File::create(path)?)?;
        if !cli.quiet {
            output::success(&format!("Completions written to {}", path.display()));
        }
        Ok(())
    }

    fn write_script(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let mut command = Cli::command();
        let bin_name = command.get_name().to_string();
        clap_complete::generate(self.shell, &mut command, bin_name, out);
        out.flush()?;
        Ok(())
    }
}
