// claimsguard-core/src/domain/validation/rules/range.rs

use chrono::NaiveDate;
use serde_json::json;
use std::collections::BTreeMap;

use crate::domain::dataset::Table;
use crate::domain::remediation::policy::RemediationPolicy;
use crate::domain::validation::outcome::{RuleId, Severity, ValidationOutcome};

const DAYS_PER_YEAR: f64 = 365.25;

/// Age derived from a birth date column must lie within `[0, max_age_years]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeRangeRule {
    pub dob_field: String,
    pub max_age_years: f64,
}

impl AgeRangeRule {
    pub fn new(dob_field: &str, max_age_years: f64) -> Self {
        Self {
            dob_field: dob_field.to_string(),
            max_age_years,
        }
    }

    pub fn evaluate(&self, table: &Table, today: NaiveDate) -> ValidationOutcome {
        let total = table.len();
        let Some(column) = table.column(&self.dob_field) else {
            return ValidationOutcome::skipped(
                RuleId::AgeRange,
                format!("Field {} not present, skipping", self.dob_field),
                total,
            );
        };

        let invalid = column
            .filter_map(|v| v.as_date())
            .map(|dob| (today - dob).num_days() as f64 / DAYS_PER_YEAR)
            .filter(|age| *age < 0.0 || *age > self.max_age_years)
            .count();

        if invalid == 0 {
            return ValidationOutcome::pass(RuleId::AgeRange, "All ages within valid range", total);
        }

        ValidationOutcome::fail(
            RuleId::AgeRange,
            Severity::Critical,
            format!("{} records with invalid age", invalid),
            invalid,
            total,
        )
        .with_detail("invalid_ages", invalid)
        .with_detail("max_age_years", self.max_age_years)
    }
}

/// High-cost outliers and negative amounts across the configured amount fields.
///
/// Only the negative component is correctable. The rule stays at WARNING whatever
/// the share.
#[derive(Debug, Clone, PartialEq)]
pub struct CostAmountRule {
    pub amount_fields: Vec<String>,
    pub high_cost_threshold: f64,
    pub policy: RemediationPolicy,
}

impl CostAmountRule {
    pub fn new(amount_fields: &[&str], high_cost_threshold: f64, policy: RemediationPolicy) -> Self {
        Self {
            amount_fields: amount_fields.iter().map(|f| f.to_string()).collect(),
            high_cost_threshold,
            policy,
        }
    }

    pub fn evaluate(&self, table: &Table) -> ValidationOutcome {
        let total = table.len();
        let present: Vec<(&str, usize)> = self
            .amount_fields
            .iter()
            .filter_map(|f| table.column_index(f).map(|idx| (f.as_str(), idx)))
            .collect();

        if present.is_empty() {
            return ValidationOutcome::skipped(
                RuleId::CostAmounts,
                "No amount fields present, skipping",
                total,
            );
        }

        let mut issues: BTreeMap<String, usize> = BTreeMap::new();
        let mut negatives = 0;
        let mut affected_rows = 0;
        for row in table.rows() {
            let mut row_affected = false;
            for &(name, idx) in &present {
                let Some(amount) = row[idx].as_f64() else {
                    continue;
                };
                if amount > self.high_cost_threshold {
                    *issues.entry(format!("{}_high_cost", name)).or_insert(0) += 1;
                    row_affected = true;
                }
                if amount < 0.0 {
                    *issues.entry(format!("{}_negative", name)).or_insert(0) += 1;
                    negatives += 1;
                    row_affected = true;
                }
            }
            if row_affected {
                affected_rows += 1;
            }
        }

        if issues.is_empty() {
            return ValidationOutcome::pass(
                RuleId::CostAmounts,
                "All cost amounts within expected ranges",
                total,
            );
        }

        let issue_count: usize = issues.values().sum();
        ValidationOutcome::fail(
            RuleId::CostAmounts,
            Severity::Warning,
            format!("Found {} cost amount issues", issue_count),
            affected_rows,
            total,
        )
        .with_detail("issues", json!(issues))
        .with_auto_fixable(self.policy.negatives_fixable(negatives, total))
    }
}
