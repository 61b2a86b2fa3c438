// claimsguard-core/src/domain/validation/rules/consistency.rs

use serde_json::json;

use crate::domain::dataset::{Table, share};
use crate::domain::remediation::policy::RemediationPolicy;
use crate::domain::validation::outcome::{RuleId, Severity, ValidationOutcome};

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeConsistencyRule {
    pub expected_count: usize,
    pub tolerance: f64,
}

impl VolumeConsistencyRule {
    pub fn new(expected_count: usize, tolerance: f64) -> Self {
        Self {
            expected_count,
            tolerance,
        }
    }

    pub fn evaluate(&self, table: &Table) -> ValidationOutcome {
        let actual = table.len();
        let expected = self.expected_count as f64;
        let lower = expected * (1.0 - self.tolerance);
        let upper = expected * (1.0 + self.tolerance);

        let deviation_pct = if self.expected_count == 0 {
            if actual == 0 { 0.0 } else { 100.0 }
        } else {
            (actual as f64 - expected) / expected * 100.0
        };

        let within = (lower..=upper).contains(&(actual as f64));
        let outcome = if within {
            ValidationOutcome::pass(
                RuleId::VolumeConsistency,
                format!("Volume ({}) within expected range", actual),
                actual,
            )
        } else {
            ValidationOutcome::fail(
                RuleId::VolumeConsistency,
                Severity::Warning,
                format!("Volume deviation: {:+.1}% from expected", deviation_pct),
                actual.abs_diff(self.expected_count),
                actual,
            )
        };

        outcome
            .with_detail("expected", self.expected_count)
            .with_detail("actual", actual)
            .with_detail("deviation_pct", deviation_pct)
    }
}

/// Duplicate keys, counted as repeat occurrences (the first row of each key is kept).
///
/// `policy.max_duplicate_share` is the single cut-off: at or below it duplicates
/// are a fixable warning, above it they are critical and left alone.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateRule {
    pub key_fields: Vec<String>,
    pub policy: RemediationPolicy,
}

impl DuplicateRule {
    pub fn new(key_fields: &[&str], policy: RemediationPolicy) -> Self {
        Self {
            key_fields: key_fields.iter().map(|f| f.to_string()).collect(),
            policy,
        }
    }

    pub fn evaluate(&self, table: &Table) -> ValidationOutcome {
        let total = table.len();
        let available: Vec<&str> = self
            .key_fields
            .iter()
            .map(String::as_str)
            .filter(|f| table.has_column(f))
            .collect();

        if available.is_empty() {
            return ValidationOutcome::skipped(
                RuleId::Duplicates,
                "No key fields available for duplicate check",
                total,
            );
        }

        let key_idx: Vec<usize> = available
            .iter()
            .filter_map(|f| table.column_index(f))
            .collect();
        let duplicates = table
            .duplicate_flags(&key_idx)
            .into_iter()
            .filter(|d| *d)
            .count();

        if duplicates == 0 {
            return ValidationOutcome::pass(RuleId::Duplicates, "No duplicate records found", total);
        }

        let dup_share = share(duplicates, total);
        let fixable = self.policy.duplicates_fixable(duplicates, total);
        let severity = if fixable {
            Severity::Warning
        } else {
            Severity::Critical
        };

        ValidationOutcome::fail(
            RuleId::Duplicates,
            severity,
            format!(
                "Found {} duplicate records ({:.2}%)",
                duplicates,
                dup_share * 100.0
            ),
            duplicates,
            total,
        )
        .with_detail("key_fields", json!(available))
        .with_auto_fixable(fixable)
    }
}
