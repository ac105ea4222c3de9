//! Counter accumulation and summary statistics.
//!
//! This module folds classified records into a [`Tally`] and computes
//! the most common milk type once the pass is complete.

use super::classifier::{classify_milk_type, classify_treatment, is_organic_high_moisture};
use crate::models::{CheeseRecord, MilkTypeCounts, MostCommon, Summary, Tally, Treatment};

impl Tally {
    /// Apply every classification rule to one record.
    ///
    /// The rules are independent; a record can bump several counters.
    pub fn record(&mut self, record: &CheeseRecord<'_>) {
        self.rows += 1;

        match classify_treatment(record.treatment.as_deref()) {
            Some(Treatment::Pasteurized) => self.pasteurized += 1,
            Some(Treatment::Raw) => self.raw += 1,
            None => {}
        }

        if is_organic_high_moisture(record.organic.as_deref(), record.moisture.as_deref()) {
            self.organic_high_moisture += 1;
        }

        if let Some(milk_type) = classify_milk_type(record.milk_type.as_deref()) {
            self.milk_types.increment(milk_type);
        }
    }

    /// Freeze the counters into a [`Summary`].
    pub fn summarize(&self) -> Summary {
        Summary {
            rows: self.rows,
            pasteurized: self.pasteurized,
            raw: self.raw,
            organic_high_moisture: self.organic_high_moisture,
            milk_types: self.milk_types,
            most_common: most_common(&self.milk_types),
        }
    }
}

/// Find the bucket with the highest count.
///
/// Ties go to the bucket that comes first in [`crate::models::MilkType::ALL`],
/// so an all-zero tally reports `cow` with a count of 0.
pub fn most_common(counts: &MilkTypeCounts) -> Option<MostCommon> {
    let mut best: Option<MostCommon> = None;

    for (milk_type, count) in counts.iter() {
        if best.map_or(true, |b| count > b.count) {
            best = Some(MostCommon { milk_type, count });
        }
    }

    best
}
