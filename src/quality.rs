//! Rule-based quality gate for the unified dataset.
//!
//! Runs a fixed ordered battery of checks and returns an immutable
//! [`ValidationReport`]. Blocking rules decide admission; warning rules
//! never do. Every rule runs unconditionally so a failure early in the
//! battery does not hide later findings. The printed summary is a
//! rendering of the report, not part of the data contract.

use chrono::{NaiveDate, Utc};
use colored::*;
use serde::{Deserialize, Serialize};

use crate::constants::{columns, min_valid_date};
use crate::models::UnifiedRecord;

/// Outcome classification of a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleStatus {
    Pass,
    Fail,
    Warn,
}

/// One entry in the ordered rule battery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: String,
    pub status: RuleStatus,
    pub detail: String,
}

/// Immutable result of one gate evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub outcomes: Vec<RuleOutcome>,
    pub admit: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Print the line-oriented human-readable summary of this report
    pub fn print_summary(&self) {
        println!("\n{}", "=== DATA QUALITY CHECKS ===".bright_yellow().bold());

        for outcome in &self.outcomes {
            let status = match outcome.status {
                RuleStatus::Pass => "[PASS]".bright_green(),
                RuleStatus::Fail => "[FAIL]".bright_red().bold(),
                RuleStatus::Warn => "[WARN]".bright_yellow(),
            };
            println!("  {} {}", status, outcome.rule);
        }

        for warning in &self.warnings {
            println!("  {} {}", "[WARN]".bright_yellow(), warning);
        }
        for error in &self.errors {
            println!("  {} {}", "[FAIL]".bright_red(), error);
        }

        if self.admit {
            println!(
                "\n{}",
                "All data quality checks passed".bright_green().bold()
            );
        } else {
            println!("\n{}", "Data quality checks failed".bright_red().bold());
        }
    }
}

/// Quality gate over the unified dataset.
///
/// Carries the reference date for the date-range rule so evaluations are
/// reproducible in tests; by default it is the UTC date at construction.
#[derive(Debug, Clone)]
pub struct QualityGate {
    reference_date: NaiveDate,
}

impl Default for QualityGate {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityGate {
    pub fn new() -> Self {
        Self {
            reference_date: Utc::now().date_naive(),
        }
    }

    /// Build a gate with a fixed reference date for the date-range rule
    pub fn with_reference_date(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }

    /// Run the full rule battery over `records`.
    ///
    /// Rules execute in fixed order (nullness, negatives, date range,
    /// consistency); errors and warnings are accumulated in that order so
    /// the report is deterministic for a given input.
    pub fn validate(&self, records: &[UnifiedRecord]) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut outcomes = Vec::new();

        outcomes.push(self.check_null_values(records, &mut errors));
        outcomes.push(self.check_negative_values(records, &mut warnings));
        outcomes.push(self.check_date_range(records, &mut errors));
        outcomes.push(self.check_logical_consistency(records, &mut errors));

        ValidationReport {
            outcomes,
            admit: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Blocking: NULL values in critical columns.
    ///
    /// The date column is typed after the reshape and can never be null,
    /// but it stays in the battery so the report shape is stable.
    fn check_null_values(&self, records: &[UnifiedRecord], errors: &mut Vec<String>) -> RuleOutcome {
        let critical: [(&str, fn(&UnifiedRecord) -> bool); 4] = [
            (columns::COUNTRY_REGION, |r| r.region.is_none()),
            (columns::DATE, |_| false),
            (columns::CONFIRMED, |r| r.confirmed.is_none()),
            (columns::DEATHS, |r| r.deaths.is_none()),
        ];

        let mut failed = false;
        for (column, is_null) in critical {
            let null_count = records.iter().filter(|r| is_null(r)).count();
            if null_count > 0 {
                errors.push(format!("Found {} NULL values in {}", null_count, column));
                failed = true;
            }
        }

        rule_outcome("NULL values check", failed, false)
    }

    /// Warning: negative values in numeric columns. Never blocks admission.
    fn check_negative_values(
        &self,
        records: &[UnifiedRecord],
        warnings: &mut Vec<String>,
    ) -> RuleOutcome {
        let numeric: [(&str, fn(&UnifiedRecord) -> Option<i64>); 3] = [
            (columns::CONFIRMED, |r| r.confirmed),
            (columns::DEATHS, |r| r.deaths),
            (columns::RECOVERED, |r| r.recovered),
        ];

        let mut warned = false;
        for (column, value) in numeric {
            let negative_count = records
                .iter()
                .filter(|r| value(r).is_some_and(|v| v < 0))
                .count();
            if negative_count > 0 {
                warnings.push(format!(
                    "Found {} negative values in {}",
                    negative_count, column
                ));
                warned = true;
            }
        }

        rule_outcome("Negative values check", false, warned)
    }

    /// Blocking: dates must fall within [2020-01-01, reference date].
    fn check_date_range(&self, records: &[UnifiedRecord], errors: &mut Vec<String>) -> RuleOutcome {
        let min_date = min_valid_date();
        let invalid_count = records
            .iter()
            .filter(|r| r.date < min_date || r.date > self.reference_date)
            .count();

        if invalid_count > 0 {
            errors.push(format!(
                "Found {} records with invalid dates",
                invalid_count
            ));
        }

        rule_outcome("Date range check", invalid_count > 0, false)
    }

    /// Blocking: stored active must equal confirmed - deaths - recovered.
    /// A row missing any component counts as inconsistent.
    fn check_logical_consistency(
        &self,
        records: &[UnifiedRecord],
        errors: &mut Vec<String>,
    ) -> RuleOutcome {
        let inconsistent_count = records
            .iter()
            .filter(|r| {
                match (r.confirmed, r.deaths, r.recovered, r.active) {
                    (Some(c), Some(d), Some(rec), Some(a)) => a != c - d - rec,
                    _ => true,
                }
            })
            .count();

        if inconsistent_count > 0 {
            errors.push(format!(
                "Found {} records with inconsistent active calculation",
                inconsistent_count
            ));
        }

        rule_outcome(
            "Logical consistency check",
            inconsistent_count > 0,
            false,
        )
    }
}

fn rule_outcome(rule: &str, failed: bool, warned: bool) -> RuleOutcome {
    let (status, detail) = if failed {
        (RuleStatus::Fail, "violations found".to_string())
    } else if warned {
        (RuleStatus::Warn, "non-blocking findings".to_string())
    } else {
        (RuleStatus::Pass, "ok".to_string())
    };
    RuleOutcome {
        rule: rule.to_string(),
        status,
        detail,
    }
}
