// claimsguard-core/src/domain/remediation/strategies/duplicates.rs

use serde_json::json;
use tracing::info;

use crate::domain::dataset::{Table, share};
use crate::domain::remediation::outcome::{RemediationOutcome, StrategyId};
use crate::domain::remediation::policy::RemediationPolicy;

/// Drops every row that repeats an earlier key, keeping the first occurrence.
pub fn fix_duplicates(
    mut table: Table,
    key_fields: &[String],
    policy: &RemediationPolicy,
) -> (Table, Vec<RemediationOutcome>) {
    let available: Vec<&str> = key_fields
        .iter()
        .map(String::as_str)
        .filter(|f| table.has_column(f))
        .collect();
    if available.is_empty() {
        return (table, Vec::new());
    }

    let key_idx: Vec<usize> = available
        .iter()
        .filter_map(|f| table.column_index(f))
        .collect();
    let flags = table.duplicate_flags(&key_idx);
    let duplicates = flags.iter().filter(|d| **d).count();
    if duplicates == 0 {
        return (table, Vec::new());
    }

    let total = table.len();
    let rate = share(duplicates, total);
    if !policy.duplicates_fixable(duplicates, total) {
        let outcome = RemediationOutcome::declined(
            StrategyId::Duplicates,
            format!(
                "Duplicate rate ({:.2}%) exceeds threshold ({:.2}%)",
                rate * 100.0,
                policy.max_duplicate_share * 100.0
            ),
        )
        .with_detail("duplicate_pct", rate * 100.0)
        .with_detail("threshold", policy.max_duplicate_share * 100.0);
        return (table, vec![outcome]);
    }

    let keep: Vec<bool> = flags.iter().map(|d| !d).collect();
    table.retain_rows(&keep);
    info!(removed = duplicates, "Removed duplicate rows");

    let outcome = RemediationOutcome::fixed(
        StrategyId::Duplicates,
        duplicates,
        format!(
            "Removed {} duplicate records ({:.2}%)",
            duplicates,
            rate * 100.0
        ),
    )
    .with_detail("key_fields", json!(available))
    .with_detail("removed_count", duplicates);
    (table, vec![outcome])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::Value;

    fn claims(rows: usize, repeats: usize) -> Table {
        let mut t = Table::new(vec!["claim_id", "paid_amount"]).unwrap();
        for i in 0..rows - repeats {
            t.push_row(vec![Value::Text(format!("C{}", i)), Value::Int(i as i64)])
                .unwrap();
        }
        for i in 0..repeats {
            t.push_row(vec![Value::Text(format!("C{}", i)), Value::Int(-1)])
                .unwrap();
        }
        t
    }

    fn keys() -> Vec<String> {
        vec!["claim_id".to_string()]
    }

    #[test]
    fn test_removes_repeats_keeping_first() {
        let (t, outcomes) = fix_duplicates(claims(1000, 50), &keys(), &RemediationPolicy::default());
        assert_eq!(t.len(), 950);
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].success);
        assert_eq!(outcomes[0].records_fixed, 50);
        // The first occurrence survives with its original amount.
        assert_eq!(t.value(0, "paid_amount"), Some(&Value::Int(0)));
        assert!(t.column("paid_amount").unwrap().all(|v| *v != Value::Int(-1)));
    }

    #[test]
    fn test_declines_above_threshold() {
        let input = claims(1000, 51);
        let (t, outcomes) = fix_duplicates(input.clone(), &keys(), &RemediationPolicy::default());
        assert_eq!(t, input);
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].success);
        assert_eq!(outcomes[0].records_fixed, 0);
        assert!(outcomes[0].message.contains("exceeds threshold"));
    }

    #[test]
    fn test_no_duplicates_emits_nothing() {
        let (t, outcomes) = fix_duplicates(claims(10, 0), &keys(), &RemediationPolicy::default());
        assert_eq!(t.len(), 10);
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let policy = RemediationPolicy::default();
        let (once, _) = fix_duplicates(claims(100, 2), &keys(), &policy);
        let (twice, outcomes) = fix_duplicates(once.clone(), &keys(), &policy);
        assert!(outcomes.is_empty());
        assert_eq!(once, twice);
    }
}
