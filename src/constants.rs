//! Application constants for the COVID pipeline
//!
//! Source locations, the fixed wide-table layout, canonical column names,
//! and validation bounds used throughout the pipeline.

use chrono::NaiveDate;

// =============================================================================
// Source Data
// =============================================================================

/// Johns Hopkins CSSE time-series repository (raw file base URL)
pub const SOURCE_BASE_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/";

/// Human-readable identifier of the upstream source, recorded in run metadata
pub const SOURCE_REPOSITORY: &str = "https://github.com/CSSEGISandData/COVID-19";

/// Default directory for downloaded raw CSV files
pub const DEFAULT_RAW_DATA_DIR: &str = "data/raw";

/// Default directory for pipeline output (Parquet snapshot + run metadata)
pub const DEFAULT_OUTPUT_DIR: &str = "output";

// =============================================================================
// Wide Table Layout
// =============================================================================

/// Number of leading identifier columns in every wide table, in fixed order:
/// region, sub-region, latitude, longitude. Everything after is a date column.
pub const ID_COLUMN_COUNT: usize = 4;

/// Positional index of the region column in the wide layout
pub const REGION_COLUMN_IDX: usize = 0;

/// Positional index of the sub-region column in the wide layout
pub const SUB_REGION_COLUMN_IDX: usize = 1;

/// Date column label formats accepted in wide tables. The upstream source
/// labels columns like `1/22/20`; ISO dates are accepted as well.
pub const DATE_LABEL_FORMATS: &[&str] = &["%m/%d/%y", "%Y-%m-%d"];

// =============================================================================
// Canonical Schema
// =============================================================================

/// Canonical column names shared by the merge key, the quality gate, and
/// the persisted output.
pub mod columns {
    pub const COUNTRY_REGION: &str = "country_region";
    pub const PROVINCE_STATE: &str = "province_state";
    pub const DATE: &str = "date";
    pub const CONFIRMED: &str = "confirmed";
    pub const DEATHS: &str = "deaths";
    pub const RECOVERED: &str = "recovered";
    pub const ACTIVE: &str = "active";
}

/// Sentinel sub-region assigned when the source row covers a whole country.
/// Keeps the merge key total so whole-country rows match across metrics.
pub const SUB_REGION_SENTINEL: &str = "All";

// =============================================================================
// Validation Bounds
// =============================================================================

/// Earliest plausible observation date for the quality gate
pub fn min_valid_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

// =============================================================================
// Output
// =============================================================================

/// Unified dataset snapshot filename
pub const DATASET_OUTPUT_FILENAME: &str = "covid_daily_cases.parquet";

/// Run metadata filename, written next to the dataset snapshot
pub const RUN_METADATA_FILENAME: &str = "run_metadata.json";
