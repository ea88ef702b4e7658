//! Styling of user-facing output

use console::Style;

use crate::environment::{Environment, Terminal};

/// When to colorize output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorOption {
    /// Colorize when writing to a capable terminal
    #[default]
    Auto,
    /// Always colorize
    Always,
    /// Never colorize
    Never,
}

impl ColorOption {
    /// Decide whether to colorize for the given terminal
    pub fn should_colorize<E: Environment>(&self, terminal: &Terminal<E>) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => !terminal.is_dumb() && terminal.is_tty(),
        }
    }
}

/// Formatting applied to command output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatting {
    enabled: bool,
}

impl Formatting {
    /// Formatting with styling turned on or off
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Resolve formatting from a color option and the terminal
    pub fn resolve<E: Environment>(option: ColorOption, terminal: &Terminal<E>) -> Self {
        Self::new(option.should_colorize(terminal))
    }

    /// Plain text formatting
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Leading bullets for a status line, including the trailing space
    pub fn bullets(&self) -> String {
        format!("{} ", self.apply(Style::new().blue().bold(), "***"))
    }

    /// Style a filesystem path
    pub fn path(&self, path: &str) -> String {
        self.apply(Style::new().cyan(), path)
    }

    fn apply(&self, style: Style, text: &str) -> String {
        style.force_styling(self.enabled).apply_to(text).to_string()
    }
}
