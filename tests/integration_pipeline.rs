//! End-to-end tests for the transform and load stages.
//!
//! Writes small wide-format CSV files to a temp directory and drives them
//! through extract, transform, quality gate, and load.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use covid_pipeline::extract::{read_wide_table, source_path};
use covid_pipeline::load::Loader;
use covid_pipeline::models::Metric;
use covid_pipeline::quality::QualityGate;
use covid_pipeline::transform::transform_all;
use polars::prelude::*;
use tempfile::TempDir;

const HEADER: &str = "Country/Region,Province/State,Lat,Long,3/1/20,3/2/20,3/3/20";

fn write_source(dir: &Path, metric: Metric, rows: &[&str]) {
    let path = source_path(dir, metric);
    let mut file = File::create(path).unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
}

fn write_clean_sources(dir: &Path) {
    write_source(
        dir,
        Metric::Confirmed,
        &[
            "Italy,,41.87,12.57,100,110,120",
            "Canada,Ontario,51.25,-85.32,10,12,14",
        ],
    );
    write_source(
        dir,
        Metric::Deaths,
        &[
            "Italy,,41.87,12.57,5,6,7",
            "Canada,Ontario,51.25,-85.32,0,0,1",
        ],
    );
    write_source(
        dir,
        Metric::Recovered,
        &[
            "Italy,,41.87,12.57,10,12,15",
            "Canada,Ontario,51.25,-85.32,1,1,2",
        ],
    );
}

fn read_sources(dir: &Path) -> (DataFrame, DataFrame, DataFrame) {
    (
        read_wide_table(&source_path(dir, Metric::Confirmed), Metric::Confirmed).unwrap(),
        read_wide_table(&source_path(dir, Metric::Deaths), Metric::Deaths).unwrap(),
        read_wide_table(&source_path(dir, Metric::Recovered), Metric::Recovered).unwrap(),
    )
}

#[test]
fn test_clean_sources_transform_and_admit() {
    let temp_dir = TempDir::new().unwrap();
    write_clean_sources(temp_dir.path());

    let (confirmed, deaths, recovered) = read_sources(temp_dir.path());
    let unified = transform_all(&confirmed, &deaths, &recovered).unwrap();

    // 2 regions x 3 dates
    assert_eq!(unified.len(), 6);
    assert!(unified.iter().all(|r| r.region.is_some()));

    let italy_day1 = unified
        .iter()
        .find(|r| {
            r.region.as_deref() == Some("Italy")
                && r.date == NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
        })
        .unwrap();
    assert_eq!(italy_day1.sub_region, "All");
    assert_eq!(italy_day1.confirmed, Some(100));
    assert_eq!(italy_day1.deaths, Some(5));
    assert_eq!(italy_day1.recovered, Some(10));
    assert_eq!(italy_day1.active, Some(85));

    let report = QualityGate::new().validate(&unified);
    assert!(report.admit);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_missing_metric_rows_are_zero_filled() {
    let temp_dir = TempDir::new().unwrap();
    write_clean_sources(temp_dir.path());
    // Recovered is missing the Canada row entirely
    write_source(temp_dir.path(), Metric::Recovered, &["Italy,,41.87,12.57,10,12,15"]);

    let (confirmed, deaths, recovered) = read_sources(temp_dir.path());
    let unified = transform_all(&confirmed, &deaths, &recovered).unwrap();

    assert_eq!(unified.len(), 6);
    let canada_day3 = unified
        .iter()
        .find(|r| {
            r.region.as_deref() == Some("Canada")
                && r.date == NaiveDate::from_ymd_opt(2020, 3, 3).unwrap()
        })
        .unwrap();
    assert_eq!(canada_day3.sub_region, "Ontario");
    assert_eq!(canada_day3.recovered, Some(0));
    assert_eq!(canada_day3.active, Some(14 - 1));

    assert!(QualityGate::new().validate(&unified).admit);
}

#[test]
fn test_unparseable_date_label_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    write_clean_sources(temp_dir.path());

    let path = source_path(temp_dir.path(), Metric::Deaths);
    let mut file = File::create(path).unwrap();
    writeln!(file, "Country/Region,Province/State,Lat,Long,bogus").unwrap();
    writeln!(file, "Italy,,41.87,12.57,5").unwrap();

    let (confirmed, deaths, recovered) = read_sources(temp_dir.path());
    assert!(transform_all(&confirmed, &deaths, &recovered).is_err());
}

#[test]
fn test_admitted_batch_loads_snapshot_and_metadata() {
    let temp_dir = TempDir::new().unwrap();
    write_clean_sources(temp_dir.path());

    let (confirmed, deaths, recovered) = read_sources(temp_dir.path());
    let unified = transform_all(&confirmed, &deaths, &recovered).unwrap();
    let report = QualityGate::new().validate(&unified);
    assert!(report.admit);

    let output_dir = temp_dir.path().join("output");
    let loader = Loader::new(&output_dir);
    let summary = loader.load(&unified, &report, Utc::now()).unwrap();

    assert_eq!(summary.records_loaded, 6);

    // The snapshot must round-trip with the unique natural key intact
    let file = File::open(&summary.dataset_path).unwrap();
    let df = ParquetReader::new(file).finish().unwrap();
    assert_eq!(df.height(), 6);
    assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);

    assert!(summary.metadata_path.exists());
}
