//! Pipeline orchestration.
//!
//! Sequences extract, transform, validate, and load, printing staged
//! progress. Aborts on the first fatal error with no partial output; a
//! gate rejection is not fatal to the process but skips the load and is
//! reported through [`crate::models::RunStats::admitted`].

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use colored::*;
use polars::prelude::DataFrame;
use tracing::warn;

use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_RAW_DATA_DIR, SOURCE_BASE_URL};
use crate::error::Result;
use crate::extract::{Extractor, read_wide_table, source_path};
use crate::load::Loader;
use crate::models::{Metric, RunStats};
use crate::quality::QualityGate;
use crate::transform::transform_all;

/// Pipeline run configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding pre-downloaded wide tables; skips the download
    pub input_dir: Option<PathBuf>,
    /// Directory downloads land in when `input_dir` is not set
    pub data_dir: PathBuf,
    /// Directory for the dataset snapshot and run metadata
    pub output_dir: PathBuf,
    /// Upstream base URL for the three time-series files
    pub base_url: String,
    /// Transform and validate only; never load
    pub dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            data_dir: PathBuf::from(DEFAULT_RAW_DATA_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_url: SOURCE_BASE_URL.to_string(),
            dry_run: false,
        }
    }
}

/// End-to-end pipeline runner
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Execute the full run: extract, transform, validate, load.
    pub fn run(&self) -> Result<RunStats> {
        let start_time = Instant::now();
        let started_at = Utc::now();

        println!("{}", "Starting COVID pipeline run".bright_green().bold());

        // Step 1: Extract
        println!("\n{}", "[1/4] Extracting data...".bright_yellow());
        let (confirmed, deaths, recovered) = self.extract()?;
        println!(
            "  {} three wide tables ({} / {} / {} rows)",
            "Read".bright_green(),
            confirmed.height(),
            deaths.height(),
            recovered.height()
        );

        // Step 2: Transform
        println!("\n{}", "[2/4] Transforming data...".bright_yellow());
        let unified = transform_all(&confirmed, &deaths, &recovered)?;
        println!(
            "  {} {} unified records",
            "Produced".bright_green(),
            unified.len().to_string().bright_white().bold()
        );

        // Step 3: Validate
        println!("\n{}", "[3/4] Running data quality checks...".bright_yellow());
        let report = QualityGate::new().validate(&unified);
        report.print_summary();

        if !report.admit {
            warn!("Quality gate rejected the batch; load skipped");
            return Ok(RunStats {
                records_transformed: unified.len(),
                records_loaded: 0,
                admitted: false,
                output_path: self.config.output_dir.clone(),
                processing_time_ms: start_time.elapsed().as_millis(),
            });
        }

        // Step 4: Load
        let records_loaded = if self.config.dry_run {
            println!("\n{}", "[4/4] Dry run - load skipped".bright_yellow());
            0
        } else {
            println!("\n{}", "[4/4] Loading dataset...".bright_yellow());
            let loader = Loader::new(&self.config.output_dir);
            let summary = loader.load(&unified, &report, started_at)?;
            println!(
                "  {} {} records to {}",
                "Wrote".bright_green(),
                summary.records_loaded.to_string().bright_white().bold(),
                summary.dataset_path.display()
            );
            summary.records_loaded
        };

        let processing_time_ms = start_time.elapsed().as_millis();
        println!(
            "\n{} ({}ms)",
            "Pipeline completed".bright_green().bold(),
            processing_time_ms
        );

        Ok(RunStats {
            records_transformed: unified.len(),
            records_loaded,
            admitted: true,
            output_path: self.config.output_dir.clone(),
            processing_time_ms,
        })
    }

    /// Obtain the three wide tables, downloading them unless an input
    /// directory was supplied.
    fn extract(&self) -> Result<(DataFrame, DataFrame, DataFrame)> {
        let source_dir = match &self.config.input_dir {
            Some(dir) => dir.clone(),
            None => {
                let extractor = Extractor::new(&self.config.data_dir)
                    .with_base_url(&self.config.base_url);
                extractor.extract_all()?;
                self.config.data_dir.clone()
            }
        };

        let confirmed = read_wide_table(
            &source_path(&source_dir, Metric::Confirmed),
            Metric::Confirmed,
        )?;
        let deaths = read_wide_table(&source_path(&source_dir, Metric::Deaths), Metric::Deaths)?;
        let recovered = read_wide_table(
            &source_path(&source_dir, Metric::Recovered),
            Metric::Recovered,
        )?;

        Ok((confirmed, deaths, recovered))
    }
}
