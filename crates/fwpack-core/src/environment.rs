//! Process environment access and terminal capability detection

use tracing::debug;

use crate::error::{ArchiveError, Result};

/// Read-only view of the process environment
pub trait Environment {
    /// Value of an environment variable, or `None` if it is not set
    fn var(&self, name: &str) -> Option<String>;

    /// Whether standard output is attached to a terminal device
    fn stdout_is_terminal(&self) -> bool;
}

/// The environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        // A value that is not valid Unicode is still set
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }

    fn stdout_is_terminal(&self) -> bool {
        console::Term::stdout().is_term()
    }
}

/// Look up an environment variable.
///
/// A variable set to the empty string is returned as `""`; only an unset
/// variable produces [`ArchiveError::MissingEnvironmentVariable`].
pub fn get_environment_variable<E>(env: &E, variable: &str) -> Result<String>
where
    E: Environment + ?Sized,
{
    env.var(variable)
        .ok_or_else(|| ArchiveError::MissingEnvironmentVariable {
            variable: variable.to_string(),
        })
}

/// Information about the terminal the process is attached to
#[derive(Debug, Clone, Default)]
pub struct Terminal<E = ProcessEnvironment> {
    env: E,
}

impl Terminal<ProcessEnvironment> {
    /// Terminal of the running process
    pub fn process() -> Self {
        Self::new(ProcessEnvironment)
    }
}

impl<E: Environment> Terminal<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    /// Terminal type from the `TERM` environment variable
    pub fn terminal_type(&self) -> Option<String> {
        match get_environment_variable(&self.env, "TERM") {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(error = %e, "terminal type unknown");
                None
            }
        }
    }

    /// Whether the terminal type is `dumb`. An unset `TERM` is not dumb.
    pub fn is_dumb(&self) -> bool {
        self.terminal_type()
            .is_some_and(|term| term.eq_ignore_ascii_case("dumb"))
    }

    /// Whether standard output is a TTY
    pub fn is_tty(&self) -> bool {
        self.env.stdout_is_terminal()
    }
}
