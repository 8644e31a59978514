//! Error handling for pipeline operations.
//!
//! Fatal errors abort the run before any partial output is produced
//! downstream of the failing stage. Data-quality findings are not errors;
//! they travel in the [`crate::quality::ValidationReport`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Date parsing error: {0}")]
    DateParsing(#[from] chrono::ParseError),

    #[error("Download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Invalid table layout for {metric}: {reason}")]
    InvalidLayout { metric: String, reason: String },

    #[error("Unparseable date column label '{label}' in {metric} table")]
    InvalidDateLabel { metric: String, label: String },

    #[error("Load refused: {reason}")]
    LoadRefused { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl PipelineError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid-layout error for a metric table
    pub fn invalid_layout(metric: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLayout {
            metric: metric.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
