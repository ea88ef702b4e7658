//! Exit codes for the CLI

use fwpack_core::ArchiveError;

/// General error
pub const ERROR: i32 = 1;

/// Exit code for an error returned by a command
pub fn for_error(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ArchiveError>())
        .map_or(ERROR, ArchiveError::exit_code)
}
