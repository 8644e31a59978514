//! Transform stage: wide tables to one unified long-format dataset.
//!
//! Runs reshape and normalize per metric, then merges the three metric
//! tables on the (region, sub-region, date) key. Each step fully
//! materializes its output before the next begins; the merger only runs
//! once all three metric pipelines have completed.

pub mod merge;
pub mod normalize;
pub mod reshape;

pub use merge::merge;
pub use normalize::normalize;
pub use reshape::reshape_wide;

use polars::prelude::DataFrame;
use tracing::info;

use crate::error::Result;
use crate::models::{Metric, UnifiedRecord};

/// Transform the three raw wide tables into the unified dataset.
pub fn transform_all(
    confirmed: &DataFrame,
    deaths: &DataFrame,
    recovered: &DataFrame,
) -> Result<Vec<UnifiedRecord>> {
    let confirmed = normalize(reshape_wide(confirmed, Metric::Confirmed)?);
    let deaths = normalize(reshape_wide(deaths, Metric::Deaths)?);
    let recovered = normalize(reshape_wide(recovered, Metric::Recovered)?);

    let unified = merge(confirmed, deaths, recovered);
    info!("Transformed {} unified records", unified.len());

    Ok(unified)
}
