//! COVID Pipeline Library
//!
//! A batch ETL pipeline for Johns Hopkins CSSE COVID-19 time-series data.
//!
//! This library provides tools for:
//! - Downloading the three wide-format time-series files (confirmed,
//!   deaths, recovered)
//! - Reshaping wide tables into a normalized long-format dataset keyed by
//!   (region, sub-region, date)
//! - Merging the three metrics with an explicit outer join and deriving
//!   active case counts
//! - Gating the merged dataset with an ordered battery of quality rules
//! - Writing a Parquet snapshot plus run metadata for admitted batches

pub mod constants;
pub mod error;
pub mod extract;
pub mod load;
pub mod models;
pub mod pipeline;
pub mod quality;
pub mod transform;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use error::{PipelineError, Result};
pub use models::{LongRecord, Metric, UnifiedRecord};
pub use quality::{QualityGate, RuleOutcome, RuleStatus, ValidationReport};
