// claimsguard-core/src/domain/remediation/strategies/amounts.rs

use tracing::info;

use crate::domain::dataset::{Table, Value, share};
use crate::domain::remediation::outcome::{RemediationOutcome, StrategyId};
use crate::domain::remediation::policy::RemediationPolicy;

fn absolute(value: &Value) -> Option<Value> {
    match value {
        Value::Int(i) if *i < 0 => Some(Value::Int(i.saturating_abs())),
        Value::Float(f) if *f < 0.0 => Some(Value::Float(f.abs())),
        Value::Text(s) => {
            let f = value.as_f64().filter(|f| *f < 0.0)?;
            // Dropping the sign keeps the rest of the cell's formatting.
            Some(match s.trim().strip_prefix('-') {
                Some(unsigned) => Value::from(unsigned),
                None => Value::Float(f.abs()),
            })
        }
        _ => None,
    }
}

/// Flips negative amounts to their absolute value, field by field.
pub fn fix_negative_amounts(
    mut table: Table,
    amount_fields: &[String],
    policy: &RemediationPolicy,
) -> (Table, Vec<RemediationOutcome>) {
    let mut outcomes = Vec::new();
    let total = table.len();

    for field in amount_fields {
        let Some(column) = table.column(field) else {
            continue;
        };
        let fixes: Vec<(usize, Value)> = column
            .enumerate()
            .filter_map(|(row, v)| absolute(v).map(|fixed| (row, fixed)))
            .collect();
        if fixes.is_empty() {
            continue;
        }

        let negatives = fixes.len();
        let rate = share(negatives, total);
        if !policy.negatives_fixable(negatives, total) {
            outcomes.push(
                RemediationOutcome::declined(
                    StrategyId::NegativeAmounts,
                    format!(
                        "Negative rate ({:.2}%) in {} exceeds threshold",
                        rate * 100.0,
                        field
                    ),
                )
                .with_detail("field", field.as_str())
                .with_detail("negative_pct", rate * 100.0),
            );
            continue;
        }

        for (row, fixed) in fixes {
            table.set(row, field, fixed);
        }
        info!(field = %field, fixed = negatives, "Converted negative amounts");
        outcomes.push(
            RemediationOutcome::fixed(
                StrategyId::NegativeAmounts,
                negatives,
                format!(
                    "Converted {} negative {} values to absolute",
                    negatives, field
                ),
            )
            .with_detail("field", field.as_str())
            .with_detail("fixed_count", negatives),
        );
    }

    (table, outcomes)
}
