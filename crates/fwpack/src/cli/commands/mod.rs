//! CLI commands

mod archive;
mod completions;
mod platforms;

pub use archive::ArchiveCommand;
pub use completions::CompletionsCommand;
pub use platforms::PlatformsCommand;
