//! Error types for the read phase.
//!
//! Anything that goes wrong while opening or parsing the input CSV is
//! fatal for the run and surfaces as a [`TallyError`].

use std::io;
use std::path::PathBuf;

/// Result type used by the CSV reader.
pub type Result<T> = std::result::Result<T, TallyError>;

/// Failure while reading the cheese dataset.
#[derive(Debug, thiserror::Error)]
pub enum TallyError {
    /// The input file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The header row could not be read.
    #[error("cannot read header row: {0}")]
    Headers(#[source] csv::Error),

    /// The underlying source failed while records were being read.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
