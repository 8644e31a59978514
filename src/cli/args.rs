//! Command-line argument definitions for the COVID pipeline.

use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_RAW_DATA_DIR};
use crate::error::{PipelineError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the COVID data pipeline
///
/// Downloads Johns Hopkins CSSE COVID-19 time-series data, reshapes it
/// into a unified long-format dataset, validates data quality, and writes
/// a Parquet snapshot with run metadata.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "covid-pipeline",
    version,
    about = "Batch ETL pipeline for Johns Hopkins COVID-19 time-series data"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the full pipeline: extract, transform, validate, load
    Run(RunArgs),
    /// Transform and validate local files without loading
    Check(CheckArgs),
}

/// Arguments for the run command
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Directory holding pre-downloaded time-series CSV files
    ///
    /// When set, the download step is skipped and the three wide tables
    /// are read from this directory instead.
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input_path: Option<PathBuf>,

    /// Directory downloaded CSV files are written to
    #[arg(long = "data-dir", value_name = "PATH", default_value = DEFAULT_RAW_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Output directory for the Parquet snapshot and run metadata
    #[arg(short = 'o', long = "output", value_name = "PATH", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Override the upstream base URL for the time-series files
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Transform and validate without writing any output
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// Directory holding the three time-series CSV files
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input_path: PathBuf,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<Commands> {
        self.command.clone()
    }
}

impl RunArgs {
    /// Validate argument consistency before running
    pub fn validate(&self) -> Result<()> {
        if let Some(input_path) = &self.input_path {
            if !input_path.exists() {
                return Err(PipelineError::configuration(format!(
                    "Input path does not exist: {}",
                    input_path.display()
                )));
            }
            if !input_path.is_dir() {
                return Err(PipelineError::configuration(format!(
                    "Input path is not a directory: {}",
                    input_path.display()
                )));
            }
        }
        Ok(())
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

impl CheckArgs {
    /// Validate argument consistency before running
    pub fn validate(&self) -> Result<()> {
        if !self.input_path.is_dir() {
            return Err(PipelineError::configuration(format!(
                "Input path is not a directory: {}",
                self.input_path.display()
            )));
        }
        Ok(())
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
