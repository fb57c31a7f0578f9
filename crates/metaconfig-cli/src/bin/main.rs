//! Metaconfig CLI
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Mapping lookup found nothing
//! - 3: Invalid input or arguments
//! - 4: Schema document not found or unreadable
//! - 5: Schema document is not a valid schema
//! - 10: Internal error

use clap::Parser;
use metaconfig_cli::{run_cli, MetaconfigCli};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = MetaconfigCli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
