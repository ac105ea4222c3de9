//! Analysis modules.
//!
//! Classification of individual records and aggregation of the results.

pub mod aggregator;
pub mod classifier;
