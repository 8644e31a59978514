//! Three-way outer join of the normalized metric tables.
//!
//! The join is an explicit insert-or-update accumulator keyed by
//! (region, sub-region, date) rather than a frame-level join: every key
//! seen in any metric gets exactly one accumulator slot, missing metrics
//! stay absent until the whole join has completed, and only then are they
//! zero-filled. Duplicate keys within one metric resolve last-value-wins.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::constants::SUB_REGION_SENTINEL;
use crate::models::{LongRecord, Metric, UnifiedRecord};

/// Natural key of the unified dataset. The sub-region is total after
/// normalization; the region stays optional so pathological null regions
/// survive the merge and surface in the quality gate.
type MergeKey = (Option<String>, String, NaiveDate);

#[derive(Debug, Default)]
struct PartialCounts {
    confirmed: Option<i64>,
    deaths: Option<i64>,
    recovered: Option<i64>,
}

/// Merge the three normalized long-format tables into unified records.
///
/// Output keys are unique and sorted; `active` is derived after zero-fill
/// with plain integer arithmetic, so inconsistent inputs can legitimately
/// produce negative values for the gate to inspect.
pub fn merge(
    confirmed: Vec<LongRecord>,
    deaths: Vec<LongRecord>,
    recovered: Vec<LongRecord>,
) -> Vec<UnifiedRecord> {
    let mut accumulator: BTreeMap<MergeKey, PartialCounts> = BTreeMap::new();

    fold_metric(&mut accumulator, confirmed, Metric::Confirmed);
    fold_metric(&mut accumulator, deaths, Metric::Deaths);
    fold_metric(&mut accumulator, recovered, Metric::Recovered);

    let records: Vec<UnifiedRecord> = accumulator
        .into_iter()
        .map(|((region, sub_region, date), counts)| {
            let confirmed = counts.confirmed.unwrap_or(0);
            let deaths = counts.deaths.unwrap_or(0);
            let recovered = counts.recovered.unwrap_or(0);
            UnifiedRecord {
                region,
                sub_region,
                date,
                confirmed: Some(confirmed),
                deaths: Some(deaths),
                recovered: Some(recovered),
                active: Some(confirmed - deaths - recovered),
            }
        })
        .collect();

    debug!("Merged into {} unified records", records.len());

    records
}

fn fold_metric(
    accumulator: &mut BTreeMap<MergeKey, PartialCounts>,
    records: Vec<LongRecord>,
    metric: Metric,
) {
    for record in records {
        let key = (
            record.region,
            record
                .sub_region
                .unwrap_or_else(|| SUB_REGION_SENTINEL.to_string()),
            record.date,
        );
        let slot = accumulator.entry(key).or_default();
        match metric {
            Metric::Confirmed => slot.confirmed = record.value,
            Metric::Deaths => slot.deaths = record.value,
            Metric::Recovered => slot.recovered = record.value,
        }
    }
}
