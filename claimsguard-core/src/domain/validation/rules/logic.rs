// claimsguard-core/src/domain/validation/rules/logic.rs

use chrono::{Datelike, NaiveDate};
use serde_json::json;

use crate::domain::dataset::Table;
use crate::domain::remediation::policy::RemediationPolicy;
use crate::domain::validation::outcome::{RuleId, Severity, ValidationOutcome};

/// Diagnosis code prefixes that only apply to female patients (pregnancy, obstetrics).
pub const FEMALE_ONLY_PREFIXES: [&str; 2] = ["Z34", "O"];

const MAX_REPORTED_INDICES: usize = 20;

/// A future date sitting in the next calendar year: most likely a mistyped year.
pub fn is_year_typo(date: NaiveDate, today: NaiveDate) -> bool {
    date > today && date.year() == today.year() + 1
}

/// Rows of `field` dated after `today`, with their parsed date.
pub fn future_dates(table: &Table, field: &str, today: NaiveDate) -> Vec<(usize, NaiveDate)> {
    table
        .column(field)
        .map(|column| {
            column
                .enumerate()
                .filter_map(|(i, v)| v.as_date().map(|d| (i, d)))
                .filter(|(_, d)| *d > today)
                .collect()
        })
        .unwrap_or_default()
}

/// Male rows carrying a female-only diagnosis, or `None` when either column is absent.
pub fn gender_mismatch_rows(
    table: &Table,
    gender_field: &str,
    diagnosis_field: &str,
) -> Option<Vec<usize>> {
    let gender = table.column_index(gender_field)?;
    let diagnosis = table.column_index(diagnosis_field)?;

    let rows = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let code = row[diagnosis].render().unwrap_or_default();
            row[gender].as_str() == Some("M")
                && FEMALE_ONLY_PREFIXES.iter().any(|p| code.starts_with(p))
        })
        .map(|(i, _)| i)
        .collect();
    Some(rows)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateLogicRule {
    pub service_date_field: String,
    pub paid_date_field: String,
    pub policy: RemediationPolicy,
}

impl DateLogicRule {
    pub fn new(service_date_field: &str, paid_date_field: &str, policy: RemediationPolicy) -> Self {
        Self {
            service_date_field: service_date_field.to_string(),
            paid_date_field: paid_date_field.to_string(),
            policy,
        }
    }

    pub fn evaluate(&self, table: &Table, today: NaiveDate) -> ValidationOutcome {
        let total = table.len();
        let Some(service_idx) = table.column_index(&self.service_date_field) else {
            return ValidationOutcome::skipped(
                RuleId::DateLogic,
                format!("Field {} not present, skipping", self.service_date_field),
                total,
            );
        };
        let paid_idx = table.column_index(&self.paid_date_field);

        let mut service_after_paid = 0;
        let mut future = 0;
        let mut typos = 0;
        let mut affected = 0;
        for row in table.rows() {
            let Some(service) = row[service_idx].as_date() else {
                continue;
            };
            let paid = paid_idx.and_then(|idx| row[idx].as_date());

            let out_of_order = paid.is_some_and(|p| service > p);
            let in_future = service > today;
            if out_of_order {
                service_after_paid += 1;
            }
            if in_future {
                future += 1;
                if is_year_typo(service, today) {
                    typos += 1;
                }
            }
            if out_of_order || in_future {
                affected += 1;
            }
        }

        if affected == 0 {
            return ValidationOutcome::pass(RuleId::DateLogic, "Date logic checks passed", total);
        }

        let year_typo_pattern = self.policy.year_typo_matches(typos, future);
        let mut outcome = ValidationOutcome::fail(
            RuleId::DateLogic,
            Severity::Critical,
            format!("Found {} date logic issues", service_after_paid + future),
            affected,
            total,
        );
        if service_after_paid > 0 {
            outcome = outcome.with_detail("service_after_paid", service_after_paid);
        }
        if future > 0 {
            outcome = outcome
                .with_detail("future_service_dates", future)
                .with_detail("year_typo_pattern", year_typo_pattern);
        }
        outcome.with_auto_fixable(year_typo_pattern)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenderDiagnosisRule {
    pub gender_field: String,
    pub diagnosis_field: String,
    pub policy: RemediationPolicy,
}

impl GenderDiagnosisRule {
    pub fn new(gender_field: &str, diagnosis_field: &str, policy: RemediationPolicy) -> Self {
        Self {
            gender_field: gender_field.to_string(),
            diagnosis_field: diagnosis_field.to_string(),
            policy,
        }
    }

    pub fn evaluate(&self, table: &Table) -> ValidationOutcome {
        let total = table.len();
        let Some(mismatches) = gender_mismatch_rows(table, &self.gender_field, &self.diagnosis_field)
        else {
            return ValidationOutcome::skipped(
                RuleId::GenderDiagnosis,
                "Required fields not present, skipping",
                total,
            );
        };

        if mismatches.is_empty() {
            return ValidationOutcome::pass(
                RuleId::GenderDiagnosis,
                "Gender-diagnosis consistency check passed",
                total,
            );
        }

        let count = mismatches.len();
        let sample: Vec<usize> = mismatches.into_iter().take(MAX_REPORTED_INDICES).collect();
        ValidationOutcome::fail(
            RuleId::GenderDiagnosis,
            Severity::Critical,
            format!("Found {} gender-diagnosis mismatches", count),
            count,
            total,
        )
        .with_detail("mismatch_count", count)
        .with_detail("mismatch_indices", json!(sample))
        .with_auto_fixable(self.policy.gender_fixable(count))
    }
}
