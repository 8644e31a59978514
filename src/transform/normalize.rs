//! Identifier normalization for reshaped records.
//!
//! The reshaper already maps the positional source columns onto the
//! canonical field names and leaves the geographic coordinates behind.
//! The one substantive rule lives here: a missing or empty sub-region is
//! assigned the `"All"` sentinel so the (region, sub-region, date) merge
//! key is total and whole-country rows match across metrics.

use tracing::debug;

use crate::constants::SUB_REGION_SENTINEL;
use crate::models::LongRecord;

/// Standardize identifier fields across a reshaped metric table.
///
/// Every returned record has a non-null sub-region.
pub fn normalize(records: Vec<LongRecord>) -> Vec<LongRecord> {
    let mut defaulted = 0usize;
    let records: Vec<LongRecord> = records
        .into_iter()
        .map(|mut record| {
            if record
                .sub_region
                .as_deref()
                .is_none_or(|s| s.trim().is_empty())
            {
                record.sub_region = Some(SUB_REGION_SENTINEL.to_string());
                defaulted += 1;
            }
            record
        })
        .collect();

    debug!(
        "Normalized {} records ({} sub-regions defaulted to '{}')",
        records.len(),
        defaulted,
        SUB_REGION_SENTINEL
    );

    records
}
