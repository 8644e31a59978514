//! Load stage: persisting the admitted dataset and run metadata.
//!
//! Writes the unified dataset as a Snappy-compressed Parquet snapshot and
//! records run metadata as JSON alongside it. The Parquet snapshot carries
//! the unique (region, sub-region, date) key produced by the merger, so a
//! later run replacing the snapshot has last-write-wins semantics per key.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{DATASET_OUTPUT_FILENAME, RUN_METADATA_FILENAME, SOURCE_REPOSITORY, columns};
use crate::error::{PipelineError, Result};
use crate::models::UnifiedRecord;
use crate::quality::ValidationReport;

/// Metadata recorded for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: String,
    pub data_source_url: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub records_loaded: usize,
    pub status: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Result of a successful load
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub records_loaded: usize,
    pub dataset_path: PathBuf,
    pub metadata_path: PathBuf,
}

/// Persists admitted datasets into an output directory.
pub struct Loader {
    output_dir: PathBuf,
}

impl Loader {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write the dataset snapshot and run metadata.
    ///
    /// Refuses datasets the quality gate did not admit; the orchestrator
    /// must never hand one over, and this guard makes that a hard error
    /// rather than silent persistence of bad data.
    pub fn load(
        &self,
        records: &[UnifiedRecord],
        report: &ValidationReport,
        started_at: DateTime<Utc>,
    ) -> Result<LoadSummary> {
        if !report.admit {
            return Err(PipelineError::LoadRefused {
                reason: "dataset was not admitted by the quality gate".to_string(),
            });
        }

        fs::create_dir_all(&self.output_dir)?;

        let dataset_path = self.output_dir.join(DATASET_OUTPUT_FILENAME);
        let mut df = records_to_frame(records)?;
        let file = File::create(&dataset_path)?;
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut df)?;

        let completed_at = Utc::now();
        let metadata = RunMetadata {
            run_id: started_at.format("%Y%m%dT%H%M%SZ").to_string(),
            data_source_url: SOURCE_REPOSITORY.to_string(),
            started_at,
            completed_at,
            records_loaded: records.len(),
            status: "SUCCESS".to_string(),
            errors: report.errors.clone(),
            warnings: report.warnings.clone(),
        };
        let metadata_path = self.write_metadata(&metadata)?;

        info!(
            "Loaded {} records to {}",
            records.len(),
            dataset_path.display()
        );

        Ok(LoadSummary {
            records_loaded: records.len(),
            dataset_path,
            metadata_path,
        })
    }

    fn write_metadata(&self, metadata: &RunMetadata) -> Result<PathBuf> {
        let path = self.output_dir.join(RUN_METADATA_FILENAME);
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, metadata).map_err(|e| PipelineError::Configuration {
            message: format!("failed to serialize run metadata: {}", e),
        })?;
        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Build the output DataFrame for the unified dataset.
pub fn records_to_frame(records: &[UnifiedRecord]) -> Result<DataFrame> {
    let epoch = NaiveDate::default();

    let regions: Vec<Option<String>> = records.iter().map(|r| r.region.clone()).collect();
    let sub_regions: Vec<String> = records.iter().map(|r| r.sub_region.clone()).collect();
    let dates: Vec<i32> = records
        .iter()
        .map(|r| (r.date - epoch).num_days() as i32)
        .collect();
    let confirmed: Vec<Option<i64>> = records.iter().map(|r| r.confirmed).collect();
    let deaths: Vec<Option<i64>> = records.iter().map(|r| r.deaths).collect();
    let recovered: Vec<Option<i64>> = records.iter().map(|r| r.recovered).collect();
    let active: Vec<Option<i64>> = records.iter().map(|r| r.active).collect();

    let frame = DataFrame::new(vec![
        Column::new(columns::COUNTRY_REGION.into(), regions),
        Column::new(columns::PROVINCE_STATE.into(), sub_regions),
        Column::new(columns::DATE.into(), dates).cast(&DataType::Date)?,
        Column::new(columns::CONFIRMED.into(), confirmed),
        Column::new(columns::DEATHS.into(), deaths),
        Column::new(columns::RECOVERED.into(), recovered),
        Column::new(columns::ACTIVE.into(), active),
    ])?;

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityGate;
    use tempfile::TempDir;

    fn sample_records() -> Vec<UnifiedRecord> {
        vec![
            UnifiedRecord {
                region: Some("Italy".to_string()),
                sub_region: "All".to_string(),
                date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
                confirmed: Some(100),
                deaths: Some(5),
                recovered: Some(10),
                active: Some(85),
            },
            UnifiedRecord {
                region: Some("Spain".to_string()),
                sub_region: "All".to_string(),
                date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
                confirmed: Some(50),
                deaths: Some(1),
                recovered: Some(2),
                active: Some(47),
            },
        ]
    }

    #[test]
    fn test_records_to_frame_shape() {
        let df = records_to_frame(&sample_records()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names_str(),
            vec![
                "country_region",
                "province_state",
                "date",
                "confirmed",
                "deaths",
                "recovered",
                "active",
            ]
        );
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn test_load_writes_snapshot_and_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let loader = Loader::new(temp_dir.path());
        let records = sample_records();
        let report = QualityGate::new().validate(&records);
        assert!(report.admit);

        let summary = loader.load(&records, &report, Utc::now()).unwrap();

        assert_eq!(summary.records_loaded, 2);
        assert!(summary.dataset_path.exists());
        assert!(summary.metadata_path.exists());

        let metadata: RunMetadata =
            serde_json::from_reader(File::open(&summary.metadata_path).unwrap()).unwrap();
        assert_eq!(metadata.records_loaded, 2);
        assert_eq!(metadata.status, "SUCCESS");
        assert!(metadata.errors.is_empty());
    }

    #[test]
    fn test_load_refuses_unadmitted_dataset() {
        let temp_dir = TempDir::new().unwrap();
        let loader = Loader::new(temp_dir.path());
        let mut records = sample_records();
        records[0].confirmed = None;
        let report = QualityGate::new().validate(&records);
        assert!(!report.admit);

        let err = loader.load(&records, &report, Utc::now()).unwrap_err();
        assert!(matches!(err, PipelineError::LoadRefused { .. }));
        assert!(!temp_dir.path().join(DATASET_OUTPUT_FILENAME).exists());
    }
}
