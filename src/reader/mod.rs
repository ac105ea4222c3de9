//! CSV input and the single tallying pass.
//!
//! The dataset is read with a header row; columns are looked up by name,
//! fields are trimmed, and blank lines are skipped. Records are read as
//! raw bytes and only the looked-up fields are decoded, with invalid
//! UTF-8 replaced by U+FFFD. Any other CSV-level error aborts the pass.

use crate::error::{Result, TallyError};
use crate::models::{CheeseRecord, Tally};
use csv::{ByteRecord, ReaderBuilder, Trim};
use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Header name of the milk treatment column.
pub const TREATMENT_COLUMN: &str = "MilkTreatmentTypeEn";
/// Header name of the organic flag column.
pub const ORGANIC_COLUMN: &str = "Organic";
/// Header name of the moisture percentage column.
pub const MOISTURE_COLUMN: &str = "MoisturePercent";
/// Header name of the milk type column.
pub const MILK_TYPE_COLUMN: &str = "MilkTypeEn";

/// Rows between progress updates.
const PROGRESS_INTERVAL: u64 = 500;

/// Positions of the columns the tally reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Columns {
    treatment: Option<usize>,
    organic: Option<usize>,
    moisture: Option<usize>,
    milk_type: Option<usize>,
}

impl Columns {
    /// Resolve column positions from the header row.
    ///
    /// Columns that are not in the header are logged and left unresolved;
    /// their fields then read as missing for every record.
    pub fn from_headers(headers: &ByteRecord) -> Self {
        let find = |name: &str| {
            let position = headers.iter().position(|h| h == name.as_bytes());
            if position.is_none() {
                warn!("Column {} not found in header; treating it as missing", name);
            }
            position
        };

        Self {
            treatment: find(TREATMENT_COLUMN),
            organic: find(ORGANIC_COLUMN),
            moisture: find(MOISTURE_COLUMN),
            milk_type: find(MILK_TYPE_COLUMN),
        }
    }

    /// Decode the relevant fields out of a record.
    pub fn extract<'r>(&self, record: &'r ByteRecord) -> CheeseRecord<'r> {
        let field = |index: Option<usize>| index.and_then(|i| record.get(i)).map(decode_field);

        CheeseRecord {
            treatment: field(self.treatment),
            organic: field(self.organic),
            moisture: field(self.moisture),
            milk_type: field(self.milk_type),
        }
    }
}

/// Decode a field as UTF-8, replacing invalid sequences.
fn decode_field(bytes: &[u8]) -> Cow<'_, str> {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        debug!("Replaced invalid UTF-8 in field {:?}", text);
    }
    text
}

/// Options for a tallying pass.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Show a row-count spinner on stderr.
    pub show_progress: bool,
}

/// Open a CSV file and tally every record in it.
pub fn tally_file(path: &Path, options: &ReadOptions) -> Result<Tally> {
    info!("Reading {}", path.display());

    let file = File::open(path).map_err(|source| TallyError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let tally = tally_reader(file, options)?;
    info!("Read {} records from {}", tally.rows, path.display());

    Ok(tally)
}

/// Tally CSV data from any reader. The first row is the header.
pub fn tally_reader<R: Read>(source: R, options: &ReadOptions) -> Result<Tally> {
    let mut reader = build_reader(source);
    let headers = reader.byte_headers().map_err(TallyError::Headers)?.clone();
    debug!("Header has {} columns", headers.len());

    tally_records(&mut reader, &headers, options)
}

fn build_reader<R: Read>(source: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .quote(b'"')
        .trim(Trim::All)
        .flexible(true)
        .from_reader(source)
}

fn tally_records<R: Read>(
    reader: &mut csv::Reader<R>,
    headers: &ByteRecord,
    options: &ReadOptions,
) -> Result<Tally> {
    let columns = Columns::from_headers(headers);
    let progress = progress_bar(options.show_progress);

    let mut tally = Tally::new();
    let mut record = ByteRecord::new();

    while reader.read_byte_record(&mut record)? {
        tally.record(&columns.extract(&record));

        if tally.rows % PROGRESS_INTERVAL == 0 {
            progress.set_message(format!("{} records", tally.rows));
        }
    }

    progress.finish_and_clear();
    Ok(tally)
}

fn progress_bar(show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("reading records");
    pb
}
