//! Metaconfig CLI
//!
//! Command-line front end for `metaconfig-core`: loads a versioned schema
//! document from a search path and prints the meta-model, the service list,
//! or service mapping lookups as a table, JSON or YAML.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Print the whole meta-model of schema version 6.1
//! metaconfig describe --schema-version 6.1 --path /opt/ospl/etc/config
//!
//! # List services and their command tokens as JSON
//! metaconfig services --format json
//!
//! # Mapping lookups; exit code 1 when nothing is mapped
//! metaconfig command-for networking
//! metaconfig service-for durability
//!
//! # Size literal conversion
//! metaconfig size 64K
//! ```
//!
//! Without `--path` or `--settings`, the search path and version come from
//! `METACONFIG_PATH` and `METACONFIG_VERSION`.

pub mod cli;
pub mod error;

pub use cli::{ExitCode, MetaconfigCli, MetaconfigCommands, OutputFormat};
pub use error::{CliError, Result};

/// Run the CLI and map errors to exit codes
///
/// ```rust,no_run
/// use clap::Parser;
/// use metaconfig_cli::{run_cli, MetaconfigCli};
///
/// let cli = MetaconfigCli::parse();
/// let exit_code = run_cli(cli);
/// std::process::exit(exit_code.into());
/// ```
pub fn run_cli(cli: MetaconfigCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                CliError::InvalidInput(_) => ExitCode::InvalidInput,
                CliError::FileError(_) => ExitCode::FileError,
                CliError::SchemaError(_) => ExitCode::SchemaError,
                CliError::SerializationError(_) | CliError::InternalError(_) => {
                    ExitCode::InternalError
                }
            }
        }
    }
}
