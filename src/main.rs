//! CheeseTally - descriptive counts over the cheese directory CSV
//!
//! Reads the dataset in a single pass, counts pasteurized and raw milk
//! cheeses, organic cheeses above 41% moisture, and cheeses per milk
//! type, then writes a short report.
//!
//! Exit codes:
//!   0 - Normal termination. Failures to read the CSV or write the report
//!       are reported on stderr and do not change the exit status.
//!   1 - Invalid arguments or an unreadable --config file

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod reader;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{Report, ReportMetadata, Summary};
use reader::ReadOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Config decides the default verbosity, so it is loaded before logging
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.log_level(config.general.verbose));

    info!("CheeseTally v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    let options = ReadOptions {
        show_progress: !args.quiet,
    };
    match run_tally(&config, &options) {
        RunOutcome::Written(path) => println!("Done. Wrote results to {}", path.display()),
        outcome => debug!("Run finished without a report: {:?}", outcome),
    }
}

/// Handle --init-config: generate a default .cheesetally.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging. Logs go to stderr; stdout carries only the result line.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// How a run ended. Every variant is a normal termination.
#[derive(Debug, PartialEq, Eq)]
enum RunOutcome {
    /// The report was written to this absolute path.
    Written(PathBuf),
    /// The CSV could not be read; no report was written.
    ReadFailed,
    /// The tally completed but the report could not be written.
    WriteFailed,
}

/// Run the read, aggregate, and write phases.
fn run_tally(config: &Config, options: &ReadOptions) -> RunOutcome {
    let input = &config.general.input;
    let output = &config.general.output;

    // Step 1: Single pass over the CSV
    let tally = match reader::tally_file(input, options) {
        Ok(tally) => tally,
        Err(e) => {
            debug!("Read phase failed: {:?}", e);
            eprintln!("Failed to read CSV: {}", e);
            return RunOutcome::ReadFailed;
        }
    };

    // Step 2: Post-pass aggregation
    let summary = tally.summarize();
    info!(
        "Rows: {} | Pasteurized: {} | Raw: {} | Organic >41% moisture: {}",
        summary.rows, summary.pasteurized, summary.raw, summary.organic_high_moisture
    );
    for (milk_type, count) in summary.milk_types.iter() {
        debug!("Milk type {}: {}", milk_type, count);
    }

    // Step 3: Render and write the report
    let written = render(&summary, config.report.format, input)
        .and_then(|content| report::write_report(&content, output));

    match written {
        Ok(()) => RunOutcome::Written(absolute(output)),
        Err(e) => {
            eprintln!("Failed to write {}: {:#}", output.display(), e);
            RunOutcome::WriteFailed
        }
    }
}

/// Render the summary in the configured format.
fn render(summary: &Summary, format: OutputFormat, input: &Path) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report::generate_text_report(summary)),
        OutputFormat::Json => {
            let report = Report {
                metadata: ReportMetadata {
                    input: input.display().to_string(),
                    generated_at: Utc::now(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                summary: summary.clone(),
            };
            report::generate_json_report(&report)
        }
    }
}

/// Absolute form of a path, without resolving symlinks.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Where the effective configuration came from.
enum ConfigSource {
    Explicit(PathBuf),
    Default,
    Builtin,
    /// The default file exists but could not be loaded.
    Invalid(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::Default => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Invalid(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::Default)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Invalid(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "MilkTreatmentTypeEn,Organic,MoisturePercent,MilkTypeEn\n\
                       Raw,1,50,Goat\n\
                       Pasteurized,0,30,Cow\n\
                       pasteurized milk,1,45,Ewe's milk\n";

    fn make_config(input: PathBuf, output: PathBuf) -> Config {
        let mut config = Config::default();
        config.general.input = input;
        config.general.output = output;
        config
    }

    #[test]
    fn test_run_tally_writes_report() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("cheese_data.csv");
        let output = temp_dir.path().join("output.txt");
        std::fs::write(&input, CSV).unwrap();

        let outcome = run_tally(&make_config(input, output.clone()), &ReadOptions::default());

        assert_eq!(outcome, RunOutcome::Written(absolute(&output)));
        let text = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Pasteurized milk cheeses: 2",
                "Raw milk cheeses: 1",
                "Organic cheeses with moisture > 41.0%: 2",
                "Most common milk type: cow (1)",
            ]
        );
    }

    #[test]
    fn test_run_tally_json_format() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("cheese_data.csv");
        let output = temp_dir.path().join("output.json");
        std::fs::write(&input, CSV).unwrap();

        let mut config = make_config(input, output.clone());
        config.report.format = OutputFormat::Json;
        let outcome = run_tally(&config, &ReadOptions::default());

        assert!(matches!(outcome, RunOutcome::Written(_)));
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["summary"]["rows"], 3);
        assert_eq!(json["summary"]["most_common"]["milk_type"], "cow");
    }

    #[test]
    fn test_run_tally_missing_input_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("missing.csv");
        let output = temp_dir.path().join("output.txt");

        let outcome = run_tally(&make_config(input, output.clone()), &ReadOptions::default());

        assert_eq!(outcome, RunOutcome::ReadFailed);
        assert!(!output.exists());
    }

    #[test]
    fn test_run_tally_unwritable_output_completes() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("cheese_data.csv");
        let output = temp_dir.path().join("missing").join("output.txt");
        std::fs::write(&input, CSV).unwrap();

        let outcome = run_tally(&make_config(input, output.clone()), &ReadOptions::default());

        assert_eq!(outcome, RunOutcome::WriteFailed);
        assert!(!output.exists());
    }
}
