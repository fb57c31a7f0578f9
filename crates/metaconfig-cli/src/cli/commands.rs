//! CLI command definitions for metaconfig
//!
//! Clap-based commands for loading a schema document and inspecting the
//! resulting meta-model, its services and its service mapping.

use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use metaconfig_core::{to_bytes, LoaderSettings, MetaConfiguration};

use super::output::{
    LookupOutput, OutputFormat, Render, ServiceOutput, ServicesOutput, SizeOutput,
};
use super::ExitCode;
use crate::error::{CliError, Result};

/// Metaconfig CLI
///
/// Load versioned configuration schema documents and inspect the
/// elements, attributes and services they declare.
#[derive(Parser, Debug)]
#[command(name = "metaconfig")]
#[command(about = "Inspect configuration schema documents", long_about = None)]
#[command(version)]
pub struct MetaconfigCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: MetaconfigCommands,
}

/// Where the schema document comes from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Schema version to load (defaults to METACONFIG_VERSION or the latest)
    #[arg(short = 's', long = "schema-version")]
    pub schema_version: Option<f64>,

    /// Directory to search for schema documents; repeatable, searched in order
    #[arg(short, long = "path")]
    pub paths: Vec<PathBuf>,

    /// TOML settings file with `search-path` and `version`
    #[arg(long, env = "METACONFIG_SETTINGS")]
    pub settings: Option<PathBuf>,
}

impl SourceArgs {
    /// Settings file or environment first, then command-line overrides
    pub fn loader_settings(&self) -> Result<LoaderSettings> {
        let mut settings = match &self.settings {
            Some(path) => LoaderSettings::from_file(path)?,
            None => LoaderSettings::from_env(),
        };
        if !self.paths.is_empty() {
            settings.search_path = self.paths.clone();
        }
        if let Some(version) = self.schema_version {
            settings.version = version;
        }
        settings.validate()?;
        Ok(settings)
    }

    fn load(&self) -> Result<MetaConfiguration> {
        let settings = self.loader_settings()?;
        tracing::debug!(
            version = settings.version,
            dirs = settings.search_path.len(),
            "Loading meta configuration"
        );
        Ok(settings.load()?)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum MetaconfigCommands {
    /// Load a schema document and print the meta-model
    Describe {
        #[command(flatten)]
        source: SourceArgs,

        /// Print only the named service element
        #[arg(long)]
        service: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List service elements with their mapped command tokens
    Services {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Convert a size literal such as 64K, 1M or 2G to bytes
    Size {
        /// The literal to convert
        literal: String,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Look up the command token of a service
    CommandFor {
        /// Service name
        service: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Look up the service that runs under a command token
    ServiceFor {
        /// Command token
        command: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Execute the describe command
pub fn execute_describe(
    source: &SourceArgs,
    service: Option<&str>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let config = source.load()?;
    match service {
        Some(name) => {
            let element = config.service(name).ok_or_else(|| {
                CliError::invalid_input(format!(
                    "No service '{}' in meta configuration version {}",
                    name,
                    config.version()
                ))
            })?;
            ServiceOutput {
                command: config.command_for_service(name),
                element: element.as_ref(),
            }
            .render(format, out)?;
        }
        None => config.render(format, out)?,
    }
    Ok(ExitCode::Success)
}

/// Execute the services command
pub fn execute_services(
    source: &SourceArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let config = source.load()?;
    ServicesOutput::from_configuration(&config).render(format, out)?;
    Ok(ExitCode::Success)
}

/// Execute the size command
pub fn execute_size(literal: &str, format: OutputFormat, out: &mut dyn Write) -> Result<ExitCode> {
    let bytes = to_bytes(literal).map_err(|e| CliError::invalid_input(e.to_string()))?;
    SizeOutput {
        literal: literal.to_string(),
        bytes,
    }
    .render(format, out)?;
    Ok(ExitCode::Success)
}

/// Execute the command-for command
pub fn execute_command_for(
    service: &str,
    source: &SourceArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let config = source.load()?;
    let output = LookupOutput {
        key: service.to_string(),
        value: config.command_for_service(service).map(str::to_string),
    };
    output.render(format, out)?;
    Ok(ExitCode::from_lookup(output.found()))
}

/// Execute the service-for command
pub fn execute_service_for(
    command: &str,
    source: &SourceArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let config = source.load()?;
    let output = LookupOutput {
        key: command.to_string(),
        value: config.service_for_command(command).map(str::to_string),
    };
    output.render(format, out)?;
    Ok(ExitCode::from_lookup(output.found()))
}

/// Run a command against standard output
pub fn execute(command: MetaconfigCommands) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute_to(command, &mut out)
}

/// Run a command against any writer
pub fn execute_to(command: MetaconfigCommands, out: &mut dyn Write) -> Result<ExitCode> {
    match command {
        MetaconfigCommands::Describe {
            source,
            service,
            format,
        } => execute_describe(&source, service.as_deref(), format, out),
        MetaconfigCommands::Services { source, format } => execute_services(&source, format, out),
        MetaconfigCommands::Size { literal, format } => execute_size(&literal, format, out),
        MetaconfigCommands::CommandFor {
            service,
            source,
            format,
        } => execute_command_for(&service, &source, format, out),
        MetaconfigCommands::ServiceFor {
            command,
            source,
            format,
        } => execute_service_for(&command, &source, format, out),
    }
}
