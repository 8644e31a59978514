//! Core data structures for the COVID pipeline.
//!
//! Defines the metric taxonomy, the long-format and unified record types
//! the transform stages exchange, and run statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The three cumulative case-count metrics published upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Confirmed,
    Deaths,
    Recovered,
}

impl Metric {
    /// All metrics in pipeline order
    pub const ALL: [Metric; 3] = [Metric::Confirmed, Metric::Deaths, Metric::Recovered];

    /// Canonical column name carried by this metric in the unified dataset
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::Confirmed => crate::constants::columns::CONFIRMED,
            Metric::Deaths => crate::constants::columns::DEATHS,
            Metric::Recovered => crate::constants::columns::RECOVERED,
        }
    }

    /// Filename of this metric's wide-format time-series file upstream
    pub fn source_filename(&self) -> &'static str {
        match self {
            Metric::Confirmed => "time_series_covid19_confirmed_global.csv",
            Metric::Deaths => "time_series_covid19_deaths_global.csv",
            Metric::Recovered => "time_series_covid19_recovered_global.csv",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One reshaped observation: a single metric value for one
/// (region, sub-region, date) combination.
///
/// `sub_region` is `None` for whole-country rows until the normalizer
/// assigns the sentinel. A `None` value is a null cell in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongRecord {
    pub region: Option<String>,
    pub sub_region: Option<String>,
    pub date: NaiveDate,
    pub value: Option<i64>,
}

/// One row of the merged dataset, keyed by (region, sub-region, date).
///
/// The merger always emits `Some` metric values (zero-filled after the
/// full outer join); the fields stay optional so the quality gate can
/// validate datasets it did not produce itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedRecord {
    pub region: Option<String>,
    pub sub_region: String,
    pub date: NaiveDate,
    pub confirmed: Option<i64>,
    pub deaths: Option<i64>,
    pub recovered: Option<i64>,
    pub active: Option<i64>,
}

/// Statistics for a completed (or gate-rejected) pipeline run
#[derive(Debug, Default)]
pub struct RunStats {
    pub records_transformed: usize,
    pub records_loaded: usize,
    pub admitted: bool,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}
