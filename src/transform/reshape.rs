//! Wide-to-long reshaping of a single metric table.
//!
//! Treats every column after the fixed identifier block as a (date, value)
//! pair and emits one record per (input row x date column) combination.
//! An unparseable date column label aborts the run; there is no
//! best-effort partial reshape.

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::debug;

use crate::constants::{
    DATE_LABEL_FORMATS, ID_COLUMN_COUNT, REGION_COLUMN_IDX, SUB_REGION_COLUMN_IDX,
};
use crate::error::{PipelineError, Result};
use crate::models::{LongRecord, Metric};

/// Reshape one wide-format table into long-format records for `metric`.
///
/// Output row count is exactly `df.height() * date_column_count`. No
/// deduplication happens here; duplicate keys are resolved by the merger.
pub fn reshape_wide(df: &DataFrame, metric: Metric) -> Result<Vec<LongRecord>> {
    if df.width() < ID_COLUMN_COUNT {
        return Err(PipelineError::invalid_layout(
            metric.column_name(),
            format!(
                "expected at least {} identifier columns, found {}",
                ID_COLUMN_COUNT,
                df.width()
            ),
        ));
    }

    let columns = df.get_columns();

    let regions = columns[REGION_COLUMN_IDX]
        .as_materialized_series()
        .cast(&DataType::String)?
        .str()?
        .clone();
    let sub_regions = columns[SUB_REGION_COLUMN_IDX]
        .as_materialized_series()
        .cast(&DataType::String)?
        .str()?
        .clone();

    // Parse every date label up front so a malformed header fails the run
    // before any record is emitted.
    let mut date_columns: Vec<(NaiveDate, Int64Chunked)> = Vec::new();
    for column in &columns[ID_COLUMN_COUNT..] {
        let label = column.name().as_str();
        let date = parse_date_label(label).ok_or_else(|| PipelineError::InvalidDateLabel {
            metric: metric.column_name().to_string(),
            label: label.to_string(),
        })?;
        let values = column
            .as_materialized_series()
            .cast(&DataType::Int64)?
            .i64()?
            .clone();
        date_columns.push((date, values));
    }

    let mut records = Vec::with_capacity(df.height() * date_columns.len());
    for row in 0..df.height() {
        let region = regions.get(row).map(str::to_string);
        let sub_region = sub_regions.get(row).map(str::to_string);
        for (date, values) in &date_columns {
            records.push(LongRecord {
                region: region.clone(),
                sub_region: sub_region.clone(),
                date: *date,
                value: values.get(row),
            });
        }
    }

    debug!(
        "Reshaped {} table: {} rows x {} dates -> {} records",
        metric,
        df.height(),
        date_columns.len(),
        records.len()
    );

    Ok(records)
}

/// Parse a wide-table date column label, trying the accepted formats in order
fn parse_date_label(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    DATE_LABEL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(label, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_wide_frame() -> DataFrame {
        df!(
            "Country/Region" => ["Afghanistan", "Canada"],
            "Province/State" => [None::<&str>, Some("British Columbia")],
            "Lat" => [33.0, 49.28],
            "Long" => [65.0, -123.12],
            "1/22/20" => [0i64, 1],
            "1/23/20" => [2i64, 3],
            "1/24/20" => [4i64, 5],
        )
        .unwrap()
    }

    #[test]
    fn test_reshape_row_count_is_rows_times_dates() {
        let df = sample_wide_frame();
        let records = reshape_wide(&df, Metric::Confirmed).unwrap();
        assert_eq!(records.len(), 2 * 3);
    }

    #[test]
    fn test_reshape_pairs_dates_with_values() {
        let df = sample_wide_frame();
        let records = reshape_wide(&df, Metric::Confirmed).unwrap();

        let first = &records[0];
        assert_eq!(first.region.as_deref(), Some("Afghanistan"));
        assert_eq!(first.sub_region, None);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2020, 1, 22).unwrap());
        assert_eq!(first.value, Some(0));

        let last = &records[5];
        assert_eq!(last.region.as_deref(), Some("Canada"));
        assert_eq!(last.sub_region.as_deref(), Some("British Columbia"));
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2020, 1, 24).unwrap());
        assert_eq!(last.value, Some(5));
    }

    #[test]
    fn test_reshape_preserves_null_values() {
        let df = df!(
            "Country/Region" => ["Albania"],
            "Province/State" => [None::<&str>],
            "Lat" => [41.15],
            "Long" => [20.17],
            "1/22/20" => [None::<i64>],
        )
        .unwrap();

        let records = reshape_wide(&df, Metric::Deaths).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, None);
    }

    #[test]
    fn test_reshape_with_no_date_columns() {
        let df = df!(
            "Country/Region" => ["Albania"],
            "Province/State" => [None::<&str>],
            "Lat" => [41.15],
            "Long" => [20.17],
        )
        .unwrap();

        let records = reshape_wide(&df, Metric::Confirmed).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_reshape_rejects_short_layout() {
        let df = df!(
            "Country/Region" => ["Albania"],
            "Province/State" => [None::<&str>],
        )
        .unwrap();

        let err = reshape_wide(&df, Metric::Confirmed).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidLayout { .. }));
    }

    #[test]
    fn test_reshape_rejects_bad_date_label() {
        let df = df!(
            "Country/Region" => ["Albania"],
            "Province/State" => [None::<&str>],
            "Lat" => [41.15],
            "Long" => [20.17],
            "not-a-date" => [7i64],
        )
        .unwrap();

        let err = reshape_wide(&df, Metric::Recovered).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDateLabel { .. }));
    }

    #[test]
    fn test_parse_date_label_formats() {
        assert_eq!(
            parse_date_label("1/22/20"),
            NaiveDate::from_ymd_opt(2020, 1, 22)
        );
        assert_eq!(
            parse_date_label("2020-01-22"),
            NaiveDate::from_ymd_opt(2020, 1, 22)
        );
        assert_eq!(parse_date_label("Lat"), None);
    }
}
