//! Error types for fwpack

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ArchiveError
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Main error type for fwpack operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A requested environment variable is not set
    #[error("Environment variable {variable} has not been set")]
    MissingEnvironmentVariable { variable: String },

    /// The arguments did not describe anything that can be archived
    #[error("{description}")]
    InvalidArgument { description: String },

    /// Packaging engine failure, passed through unchanged
    #[error(transparent)]
    Packaging(#[from] PackagingError),

    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by a packaging engine
#[derive(Debug, Error)]
pub enum PackagingError {
    /// Archiving tool not installed
    #[error("Required tool '{tool}' not found on PATH")]
    ToolNotFound { tool: String },

    /// Archiving tool exited unsuccessfully
    #[error("Command failed: {command} (exit code {}){}", format_exit_code(.exit_code), format_stderr(.stderr))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// An input path cannot be stored in an archive
    #[error("Cannot archive {path}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    /// Zip writer error
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to move the finished archive into place
    #[error("Failed to write archive: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_exit_code(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl ArchiveError {
    /// Create an invalid argument error with a user-facing description
    pub fn invalid_argument(description: impl Into<String>) -> Self {
        Self::InvalidArgument {
            description: description.into(),
        }
    }

    /// Get exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            Self::Packaging(_) => 3,
            Self::Config(_) => 4,
            Self::MissingEnvironmentVariable { .. } => 5,
            Self::Io(_) => 1,
        }
    }
}
