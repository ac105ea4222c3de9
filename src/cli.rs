//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Paths left unset here fall back to the
//! configuration file and then to built-in defaults.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CheeseTally - descriptive counts over the cheese directory CSV
///
/// Counts pasteurized and raw milk cheeses, organic cheeses with high
/// moisture, and the most common milk type, then writes a short report.
///
/// Examples:
///   cheesetally
///   cheesetally --input data/cheese_data.csv --output counts.txt
///   cheesetally --format json --output counts.json
///   cheesetally --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV file to read
    ///
    /// Defaults to ../cheese_data.csv, or the value in .cheesetally.toml.
    #[arg(short, long, value_name = "FILE", env = "CHEESETALLY_INPUT")]
    pub input: Option<PathBuf>,

    /// Report file to write (overwritten if it exists)
    ///
    /// Defaults to output.txt, or the value in .cheesetally.toml.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .cheesetally.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no progress)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .cheesetally.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Four-line text report (default)
    #[default]
    Text,
    /// JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let (Some(input), Some(output)) = (&self.input, &self.output) {
            if input == output {
                return Err(format!(
                    "Input and output must differ: {}",
                    input.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
