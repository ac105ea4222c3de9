//! Data models for the cheese tally.
//!
//! This module contains the counters accumulated during the single pass
//! over the dataset and the report structures built from them.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Heat treatment of the milk a cheese is made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    Pasteurized,
    Raw,
}

/// One of the four milk-type buckets.
///
/// Declaration order is the iteration order used for tie-breaking the
/// most common bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MilkType {
    Cow,
    Goat,
    Ewe,
    Buffalo,
}

impl MilkType {
    /// All buckets in tie-break order.
    pub const ALL: [MilkType; 4] = [
        MilkType::Cow,
        MilkType::Goat,
        MilkType::Ewe,
        MilkType::Buffalo,
    ];

    /// Lower-case label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            MilkType::Cow => "cow",
            MilkType::Goat => "goat",
            MilkType::Ewe => "ewe",
            MilkType::Buffalo => "buffalo",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MilkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-bucket counters, kept in [`MilkType::ALL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MilkTypeCounts {
    counts: [u64; 4],
}

impl MilkTypeCounts {
    /// Increment the counter for a bucket.
    pub fn increment(&mut self, milk_type: MilkType) {
        self.counts[milk_type.index()] += 1;
    }

    /// Current count for a bucket.
    pub fn get(&self, milk_type: MilkType) -> u64 {
        self.counts[milk_type.index()]
    }

    /// Iterate `(bucket, count)` pairs in tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = (MilkType, u64)> + '_ {
        MilkType::ALL.iter().map(|&m| (m, self.get(m)))
    }
}

impl Serialize for MilkTypeCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MilkType::ALL.len()))?;
        for (milk_type, count) in self.iter() {
            map.serialize_entry(milk_type.label(), &count)?;
        }
        map.end()
    }
}

/// The fields of one CSV record that the tally looks at.
///
/// `None` means the column is absent from the header or the record is
/// too short to contain it. Fields borrow from the record unless they
/// held invalid UTF-8 and had to be repaired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheeseRecord<'a> {
    pub treatment: Option<Cow<'a, str>>,
    pub organic: Option<Cow<'a, str>>,
    pub moisture: Option<Cow<'a, str>>,
    pub milk_type: Option<Cow<'a, str>>,
}

/// The milk-type bucket with the highest count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MostCommon {
    pub milk_type: MilkType,
    pub count: u64,
}

/// Counters accumulated over one pass of the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// Number of data records read.
    pub rows: u64,
    /// Cheeses made from pasteurized milk.
    pub pasteurized: u64,
    /// Cheeses made from raw milk.
    pub raw: u64,
    /// Organic cheeses with moisture strictly above the threshold.
    pub organic_high_moisture: u64,
    /// Cheeses per milk-type bucket.
    pub milk_types: MilkTypeCounts,
}

impl Tally {
    /// Creates an all-zero tally.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the CSV that was read, as given.
    pub input: String,
    /// Time the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Version of this tool.
    pub version: String,
}

/// Aggregates computed from the tally, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub rows: u64,
    pub pasteurized: u64,
    pub raw: u64,
    pub organic_high_moisture: u64,
    pub milk_types: MilkTypeCounts,
    /// `None` only when there are no buckets to choose from.
    pub most_common: Option<MostCommon>,
}

/// The complete report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milk_type_order() {
        let labels: Vec<_> = MilkType::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["cow", "goat", "ewe", "buffalo"]);
    }

    #[test]
    fn test_milk_type_counts() {
        let mut counts = MilkTypeCounts::default();
        counts.increment(MilkType::Ewe);
        counts.increment(MilkType::Ewe);
        counts.increment(MilkType::Cow);

        assert_eq!(counts.get(MilkType::Cow), 1);
        assert_eq!(counts.get(MilkType::Goat), 0);
        assert_eq!(counts.get(MilkType::Ewe), 2);
        assert_eq!(counts.get(MilkType::Buffalo), 0);
    }

    #[test]
    fn test_milk_type_counts_serialize_in_order() {
        let mut counts = MilkTypeCounts::default();
        counts.increment(MilkType::Buffalo);

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"cow":0,"goat":0,"ewe":0,"buffalo":1}"#);
    }

    #[test]
    fn test_new_tally_is_zero() {
        let tally = Tally::new();
        assert_eq!(tally.rows, 0);
        assert_eq!(tally.pasteurized, 0);
        assert_eq!(tally.raw, 0);
        assert_eq!(tally.organic_high_moisture, 0);
        assert!(tally.milk_types.iter().all(|(_, c)| c == 0));
    }
}
