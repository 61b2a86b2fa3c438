// claimsguard-core/src/domain/remediation/strategies/gender.rs

use serde_json::json;
use tracing::info;

use crate::domain::dataset::{Table, Value};
use crate::domain::remediation::outcome::{RemediationOutcome, StrategyId};
use crate::domain::remediation::policy::RemediationPolicy;
use crate::domain::validation::rules::logic::gender_mismatch_rows;

/// Sets gender to "F" on male rows carrying a pregnancy/obstetric diagnosis.
pub fn fix_gender_mismatch(
    mut table: Table,
    gender_field: &str,
    diagnosis_field: &str,
    policy: &RemediationPolicy,
) -> (Table, Vec<RemediationOutcome>) {
    let Some(rows) = gender_mismatch_rows(&table, gender_field, diagnosis_field) else {
        return (table, Vec::new());
    };
    if rows.is_empty() {
        return (table, Vec::new());
    }

    let count = rows.len();
    if !policy.gender_fixable(count) {
        let outcome = RemediationOutcome::declined(
            StrategyId::GenderMismatch,
            format!(
                "Too many mismatches ({}) to auto-fix (max: {})",
                count, policy.max_gender_fixes
            ),
        )
        .with_detail("mismatch_count", count)
        .with_detail("max_fixes", policy.max_gender_fixes);
        return (table, vec![outcome]);
    }

    for &row in &rows {
        table.set(row, gender_field, Value::from("F"));
    }
    info!(fixed = count, "Fixed gender mismatches");

    let outcome = RemediationOutcome::fixed(
        StrategyId::GenderMismatch,
        count,
        format!(
            "Fixed gender to 'F' for {} pregnancy diagnosis records",
            count
        ),
    )
    .with_detail("fixed_indices", json!(rows));
    (table, vec![outcome])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn table(mismatches: usize) -> Table {
        let mut t = Table::new(vec!["gender", "primary_diagnosis"]).unwrap();
        for i in 0..40 {
            let row = if i < mismatches {
                vec![Value::from("M"), Value::from("O0990")]
            } else {
                vec![Value::from("M"), Value::from("I10")]
            };
            t.push_row(row).unwrap();
        }
        t
    }

    #[test]
    fn test_ten_mismatches_are_fixed() {
        let (t, outcomes) = fix_gender_mismatch(table(10), "gender", "primary_diagnosis", &RemediationPolicy::default());
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].success);
        assert_eq!(outcomes[0].records_fixed, 10);
        assert_eq!(t.value(0, "gender"), Some(&Value::from("F")));
        assert_eq!(t.value(10, "gender"), Some(&Value::from("M")));
        assert_eq!(gender_mismatch_rows(&t, "gender", "primary_diagnosis"), Some(vec![]));
    }

    #[test]
    fn test_eleven_mismatches_are_declined() {
        let input = table(11);
        let (t, outcomes) = fix_gender_mismatch(input.clone(), "gender", "primary_diagnosis", &RemediationPolicy::default());
        assert_eq!(t, input);
        assert!(!outcomes[0].success);
        assert_eq!(outcomes[0].records_fixed, 0);
        assert_eq!(outcomes[0].details["mismatch_count"], 11);
    }

    #[test]
    fn test_missing_columns_emit_nothing() {
        let (_, outcomes) = fix_gender_mismatch(table(3), "sex", "primary_diagnosis", &RemediationPolicy::default());
        assert!(outcomes.is_empty());
    }
}
