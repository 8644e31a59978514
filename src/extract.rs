//! Extraction stage: fetching and reading the raw wide tables.
//!
//! Downloads the three time-series CSV files from the upstream repository
//! (or reuses files already on disk) and reads them into DataFrames,
//! checking the fixed-layout precondition before any transform begins.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::constants::{ID_COLUMN_COUNT, SOURCE_BASE_URL};
use crate::error::{PipelineError, Result};
use crate::models::Metric;

/// Downloads raw wide-format CSV files into a local directory.
pub struct Extractor {
    base_url: String,
    output_dir: PathBuf,
    client: Client,
}

impl Extractor {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: SOURCE_BASE_URL.to_string(),
            output_dir: output_dir.into(),
            client: Client::new(),
        }
    }

    /// Override the upstream base URL (mirrors, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Download one metric's wide table and return the local path
    pub fn download_file(&self, metric: Metric) -> Result<PathBuf> {
        let url = format!("{}{}", self.base_url, metric.source_filename());
        info!("Downloading {}", metric.source_filename());

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|source| PipelineError::Download {
                url: url.clone(),
                source,
            })?;
        let bytes = response
            .bytes()
            .map_err(|source| PipelineError::Download { url, source })?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(metric.source_filename());
        fs::write(&path, &bytes)?;

        debug!("Downloaded {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Download all three time-series files
    pub fn extract_all(&self) -> Result<Vec<(Metric, PathBuf)>> {
        Metric::ALL
            .iter()
            .map(|&metric| Ok((metric, self.download_file(metric)?)))
            .collect()
    }
}

/// Read one metric's wide table from disk and validate its layout.
///
/// A missing file or a table narrower than the identifier block is a
/// fatal precondition failure.
pub fn read_wide_table(path: &Path, metric: Metric) -> Result<DataFrame> {
    if !path.exists() {
        return Err(PipelineError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file)
        .finish()?;

    if df.width() < ID_COLUMN_COUNT {
        return Err(PipelineError::invalid_layout(
            metric.column_name(),
            format!(
                "{} has {} columns, expected at least {} identifier columns",
                path.display(),
                df.width(),
                ID_COLUMN_COUNT
            ),
        ));
    }

    debug!(
        "Read {} table: {} rows x {} columns",
        metric,
        df.height(),
        df.width()
    );

    Ok(df)
}

/// Expected on-disk path of a metric's wide table within `dir`
pub fn source_path(dir: &Path, metric: Metric) -> PathBuf {
    dir.join(metric.source_filename())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_wide_table_parses_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("confirmed.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Country/Region,Province/State,Lat,Long,1/22/20,1/23/20").unwrap();
        writeln!(file, "Italy,,41.87,12.57,0,2").unwrap();
        writeln!(file, "Canada,Ontario,51.25,-85.32,1,3").unwrap();

        let df = read_wide_table(&path, Metric::Confirmed).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 6);
    }

    #[test]
    fn test_read_wide_table_missing_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.csv");

        let err = read_wide_table(&path, Metric::Deaths).unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound { .. }));
    }

    #[test]
    fn test_read_wide_table_rejects_narrow_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("narrow.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Country/Region,Province/State").unwrap();
        writeln!(file, "Italy,").unwrap();

        let err = read_wide_table(&path, Metric::Recovered).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidLayout { .. }));
    }

    #[test]
    fn test_source_path_uses_metric_filename() {
        let dir = Path::new("data/raw");
        assert_eq!(
            source_path(dir, Metric::Confirmed),
            dir.join("time_series_covid19_confirmed_global.csv")
        );
    }
}
