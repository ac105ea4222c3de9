//! Report generation.
//!
//! This module renders the tally summary as the four-line text report
//! or as JSON, and writes the result to disk.

use crate::models::{MostCommon, Report, Summary};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Label printed when there is no most common milk type.
const UNKNOWN_MILK_TYPE: &str = "unknown";

/// Format an integer with a comma between each group of three digits.
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

fn format_u64(n: u64) -> String {
    format_count(i64::try_from(n).unwrap_or(i64::MAX))
}

/// Render the most common milk type as `name (count)`.
fn format_most_common(most_common: Option<MostCommon>) -> String {
    match most_common {
        Some(m) => format!("{} ({})", m.milk_type, format_u64(m.count)),
        None => format!("{} ({})", UNKNOWN_MILK_TYPE, format_count(-1)),
    }
}

/// Generate the four-line text report.
pub fn generate_text_report(summary: &Summary) -> String {
    let lines = [
        format!("Pasteurized milk cheeses: {}", format_u64(summary.pasteurized)),
        format!("Raw milk cheeses: {}", format_u64(summary.raw)),
        format!(
            "Organic cheeses with moisture > 41.0%: {}",
            format_u64(summary.organic_high_moisture)
        ),
        format!(
            "Most common milk type: {}",
            format_most_common(summary.most_common)
        ),
    ];

    let mut output = String::new();
    for line in lines {
        output.push_str(&line);
        output.push_str(LINE_ENDING);
    }

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to a file, replacing any existing file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
