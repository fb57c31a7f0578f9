//! Output formatting for the metaconfig CLI
//!
//! Every command result renders as JSON, YAML, or a colored human-readable
//! table. Rendering writes into any [`Write`] so results can be captured.

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use metaconfig_core::{MetaConfiguration, MetaElement};

use crate::error::Result;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// A result that knows how to print itself as a table
pub trait Render: Serialize {
    fn render_table(&self, out: &mut dyn Write) -> Result<()>;

    /// Render in the requested format
    fn render(&self, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
        match format {
            OutputFormat::Json => {
                writeln!(out, "{}", serde_json::to_string_pretty(self)?)?;
            }
            OutputFormat::Yaml => {
                write!(out, "{}", serde_yaml::to_string(self)?)?;
            }
            OutputFormat::Table => self.render_table(out)?,
        }
        Ok(())
    }
}

impl Render for MetaConfiguration {
    fn render_table(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out)?;
        writeln!(
            out,
            "{} {}",
            "Meta Configuration".cyan().bold(),
            format!("v{}", self.version()).dimmed()
        )?;
        writeln!(out, "{}", "=".repeat(60))?;
        write!(out, "{}", self)?;
        Ok(())
    }
}

/// One service element as listed by `describe --service`
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOutput<'a> {
    pub command: Option<&'a str>,
    pub element: &'a MetaElement,
}

impl Render for ServiceOutput<'_> {
    fn render_table(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", format!("Service {}", self.element.name()).cyan().bold())?;
        writeln!(out, "{}", "=".repeat(60))?;
        if let Some(command) = self.command {
            writeln!(out, "Command: {}", command.green())?;
        }
        write!(out, "{}", self.element)?;
        Ok(())
    }
}

/// A row of the `services` listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRow {
    pub name: String,
    pub min_occurrences: u32,
    pub max_occurrences: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// Service listing with mapped command tokens
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicesOutput {
    pub version: f64,
    pub services: Vec<ServiceRow>,
}

impl ServicesOutput {
    /// Rows for every service element, in document order
    pub fn from_configuration(config: &MetaConfiguration) -> Self {
        let services = config
            .services()
            .iter()
            .map(|service| ServiceRow {
                name: service.name().to_string(),
                min_occurrences: service.min_occurrences(),
                max_occurrences: service.max_occurrences().to_string(),
                command: config
                    .command_for_service(service.name())
                    .map(str::to_string),
            })
            .collect();
        Self {
            version: config.version(),
            services,
        }
    }
}

impl Render for ServicesOutput {
    fn render_table(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out)?;
        writeln!(
            out,
            "{} {}",
            "Services".cyan().bold(),
            format!("({} total)", self.services.len()).dimmed()
        )?;
        writeln!(out, "{}", "-".repeat(60))?;
        writeln!(
            out,
            "{:<32} {:<14} {}",
            "NAME".bold(),
            "OCCURRENCES".bold(),
            "COMMAND".bold()
        )?;
        for row in &self.services {
            let occurrences = format!("{}..{}", row.min_occurrences, row.max_occurrences);
            let command = match &row.command {
                Some(command) => command.green().to_string(),
                None => "-".dimmed().to_string(),
            };
            writeln!(out, "{:<32} {:<14} {}", row.name, occurrences, command)?;
        }
        Ok(())
    }
}

/// Byte count of a size literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeOutput {
    pub literal: String,
    pub bytes: i64,
}

impl Render for SizeOutput {
    fn render_table(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{} = {} bytes", self.literal, self.bytes.to_string().green())?;
        Ok(())
    }
}

/// Result of a service mapping lookup in either direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOutput {
    pub key: String,
    pub value: Option<String>,
}

impl LookupOutput {
    pub fn found(&self) -> bool {
        self.value.is_some()
    }
}

impl Render for LookupOutput {
    fn render_table(&self, out: &mut dyn Write) -> Result<()> {
        match &self.value {
            Some(value) => writeln!(out, "{} -> {}", self.key, value.green())?,
            None => writeln!(out, "{} -> {}", self.key, "not mapped".yellow())?,
        }
        Ok(())
    }
}
