// claimsguard-core/src/domain/validation/rules/completeness.rs

use serde_json::json;
use std::collections::BTreeMap;

use crate::domain::dataset::{Table, share};
use crate::domain::validation::outcome::{RuleId, Severity, ValidationOutcome};

#[derive(Debug, Clone, PartialEq)]
pub struct RequiredFieldsRule {
    pub required_fields: Vec<String>,
}

impl RequiredFieldsRule {
    pub fn new(required_fields: &[&str]) -> Self {
        Self {
            required_fields: required_fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn evaluate(&self, table: &Table) -> ValidationOutcome {
        let total = table.len();
        let missing: Vec<&str> = self
            .required_fields
            .iter()
            .map(String::as_str)
            .filter(|f| !table.has_column(f))
            .collect();

        if missing.is_empty() {
            return ValidationOutcome::pass(
                RuleId::RequiredFields,
                "All required fields present",
                total,
            );
        }

        ValidationOutcome::fail(
            RuleId::RequiredFields,
            Severity::Critical,
            format!("Missing required fields: {}", missing.join(", ")),
            total,
            total,
        )
        .with_detail("missing_fields", json!(missing))
    }
}

/// Nulls in required fields. Escalates on the single worst field, not the aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct NullValueRule {
    pub fields: Vec<String>,
    pub critical_share: f64,
}

impl NullValueRule {
    pub fn new(fields: &[&str], critical_share: f64) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            critical_share,
        }
    }

    pub fn evaluate(&self, table: &Table) -> ValidationOutcome {
        let total = table.len();
        let present: Vec<(&str, usize)> = self
            .fields
            .iter()
            .filter_map(|f| table.column_index(f).map(|idx| (f.as_str(), idx)))
            .collect();

        if present.is_empty() {
            return ValidationOutcome::skipped(
                RuleId::NullValues,
                "No required fields present, skipping null check",
                total,
            );
        }

        let mut null_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut rows_with_nulls = 0;
        for row in table.rows() {
            let mut row_has_null = false;
            for &(name, idx) in &present {
                if row[idx].is_null() {
                    *null_counts.entry(name).or_insert(0) += 1;
                    row_has_null = true;
                }
            }
            if row_has_null {
                rows_with_nulls += 1;
            }
        }

        if null_counts.is_empty() {
            return ValidationOutcome::pass(
                RuleId::NullValues,
                "No null values in required fields",
                total,
            );
        }

        let worst = null_counts.values().copied().max().unwrap_or(0);
        let worst_share = share(worst, total);
        let severity = if worst_share > self.critical_share {
            Severity::Critical
        } else {
            Severity::Warning
        };

        ValidationOutcome::fail(
            RuleId::NullValues,
            severity,
            format!("Found null values in {} fields", null_counts.len()),
            rows_with_nulls,
            total,
        )
        .with_detail("null_counts", json!(null_counts))
        .with_detail("max_field_null_pct", worst_share * 100.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::Value;

    fn table_with_nulls(rows: usize, nulls: usize) -> Table {
        let mut t = Table::new(vec!["id", "name"]).unwrap();
        for i in 0..rows {
            let id = if i < nulls {
                Value::Null
            } else {
                Value::Int(i as i64)
            };
            t.push_row(vec![id, Value::from("a")]).unwrap();
        }
        t
    }

    #[test]
    fn test_all_fields_present() {
        let t = table_with_nulls(3, 0);
        let o = RequiredFieldsRule::new(&["id", "name"]).evaluate(&t);
        assert!(o.passed);
        assert_eq!(o.severity, Severity::Critical);
    }

    #[test]
    fn test_missing_fields() {
        let t = table_with_nulls(3, 0);
        let o = RequiredFieldsRule::new(&["id", "name", "value", "other"]).evaluate(&t);
        assert!(!o.passed);
        assert_eq!(o.affected_records, 3);
        assert_eq!(o.affected_percentage, 100.0);
        assert_eq!(o.details["missing_fields"], json!(["value", "other"]));
    }

    #[test]
    fn test_no_nulls() {
        let o = NullValueRule::new(&["id", "name"], 0.05).evaluate(&table_with_nulls(10, 0));
        assert!(o.passed);
        assert_eq!(o.affected_percentage, 0.0);
    }

    #[test]
    fn test_some_nulls_warning() {
        let o = NullValueRule::new(&["id", "name"], 0.05).evaluate(&table_with_nulls(100, 4));
        assert!(!o.passed);
        assert_eq!(o.severity, Severity::Warning);
        assert_eq!(o.affected_records, 4);
    }

    #[test]
    fn test_exactly_at_threshold_stays_warning() {
        let o = NullValueRule::new(&["id", "name"], 0.05).evaluate(&table_with_nulls(100, 5));
        assert_eq!(o.severity, Severity::Warning);
    }

    #[test]
    fn test_many_nulls_critical() {
        let o = NullValueRule::new(&["id", "name"], 0.05).evaluate(&table_with_nulls(100, 10));
        assert!(!o.passed);
        assert_eq!(o.severity, Severity::Critical);
        assert_eq!(o.details["null_counts"]["id"], 10);
    }

    #[test]
    fn test_escalation_uses_worst_field_not_aggregate() {
        // 4 nulls in each of two fields on different rows: 8% of rows affected,
        // but the worst field is only 4%.
        let mut t = Table::new(vec!["a", "b"]).unwrap();
        for i in 0..100 {
            let a = if i < 4 { Value::Null } else { Value::Int(1) };
            let b = if (4..8).contains(&i) { Value::Null } else { Value::Int(1) };
            t.push_row(vec![a, b]).unwrap();
        }
        let o = NullValueRule::new(&["a", "b"], 0.05).evaluate(&t);
        assert_eq!(o.severity, Severity::Warning);
        assert_eq!(o.affected_records, 8);
    }

    #[test]
    fn test_no_checked_field_present_is_info_pass() {
        let o = NullValueRule::new(&["zzz"], 0.05).evaluate(&table_with_nulls(3, 0));
        assert!(o.passed);
        assert_eq!(o.severity, Severity::Info);
    }
}
