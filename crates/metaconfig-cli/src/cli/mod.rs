//! CLI module for metaconfig
//!
//! Command definitions, output rendering and exit codes.

pub mod commands;
pub mod output;

pub use commands::{MetaconfigCli, MetaconfigCommands, SourceArgs};
pub use output::{OutputFormat, Render};

use crate::error::Result;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution
    Success = 0,
    /// A service mapping lookup found nothing
    NotMapped = 1,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// Schema document not found or unreadable
    FileError = 4,
    /// Schema document is not a valid schema
    SchemaError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from a mapping lookup
    pub fn from_lookup(found: bool) -> Self {
        if found {
            ExitCode::Success
        } else {
            ExitCode::NotMapped
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
///
/// With `--quiet` the command still runs but its result is discarded, so
/// only the exit code and errors remain.
pub fn run(cli: MetaconfigCli) -> Result<ExitCode> {
    if cli.quiet {
        commands::execute_to(cli.command, &mut std::io::sink())
    } else {
        commands::execute(cli.command)
    }
}
