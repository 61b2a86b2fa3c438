// claimsguard-core/src/domain/remediation/strategies/dates.rs

use chrono::{Datelike, Months, NaiveDate};
use tracing::{debug, info};

use crate::domain::dataset::{Table, Value, share};
use crate::domain::remediation::outcome::{RemediationOutcome, StrategyId};
use crate::domain::remediation::policy::RemediationPolicy;
use crate::domain::validation::rules::logic::{future_dates, is_year_typo};

/// Candidate layouts, tried in order. Ties keep the earlier format.
pub const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y", "%d-%m-%Y",
];

fn parse_with(value: &Value, format: &str) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Text(s) => NaiveDate::parse_from_str(s.trim(), format).ok(),
        Value::Int(i) => NaiveDate::parse_from_str(&i.to_string(), format).ok(),
        _ => None,
    }
}

/// Normalizes each text date field to a single layout when one format reads
/// enough of the column.
pub fn fix_date_formats(
    mut table: Table,
    fields: &[String],
    policy: &RemediationPolicy,
) -> (Table, Vec<RemediationOutcome>) {
    let mut outcomes = Vec::new();
    let total = table.len();

    for field in fields {
        let Some(idx) = table.column_index(field) else {
            continue;
        };
        let cells: Vec<&Value> = table.rows().iter().map(|r| &r[idx]).collect();
        if cells.iter().all(|v| v.is_null() || matches!(v, Value::Date(_))) {
            continue;
        }

        let baseline = cells.iter().filter(|v| v.as_date().is_some()).count();
        let mut best: Option<(&str, usize)> = None;
        for format in DATE_FORMATS {
            let parsed = cells
                .iter()
                .filter(|v| parse_with(v, format).is_some())
                .count();
            let to_beat = best.map(|(_, n)| n).unwrap_or(baseline);
            if parsed > to_beat {
                best = Some((format, parsed));
            }
        }

        let Some((format, parsed)) = best else {
            continue;
        };
        let rate = share(parsed, total);
        if !policy.date_format_accepted(parsed, total) {
            debug!(field = %field, format, success_rate = rate, "No date format reads enough rows");
            continue;
        }

        // Cells already readable as the same date keep their text.
        let converted: Vec<Option<NaiveDate>> = cells
            .iter()
            .map(|v| parse_with(v, format).filter(|d| v.as_date() != Some(*d)))
            .collect();
        for (row, date) in converted.into_iter().enumerate() {
            if let Some(d) = date {
                table.set(row, field, Value::Date(d));
            }
        }

        let records_fixed = parsed - baseline;
        info!(field = %field, format, records_fixed, "Standardized date format");
        outcomes.push(
            RemediationOutcome::fixed(
                StrategyId::DateFormats,
                records_fixed,
                format!("Standardized {} dates using format {}", field, format),
            )
            .with_detail("field", field.as_str())
            .with_detail("format", format)
            .with_detail("success_rate", rate),
        );
    }

    (table, outcomes)
}

/// Shifts year-typo dates back by one calendar year (Feb 29 lands on Feb 28).
pub fn shift_back_one_year(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(12))
        .unwrap_or_else(|| date.with_year(date.year() - 1).unwrap_or(date))
}

/// Repairs future dates that carry the year-typo signature. Other offsets are
/// never guessed at.
pub fn fix_future_dates(
    mut table: Table,
    fields: &[String],
    policy: &RemediationPolicy,
    today: NaiveDate,
) -> (Table, Vec<RemediationOutcome>) {
    let mut outcomes = Vec::new();

    for field in fields {
        let future = future_dates(&table, field, today);
        if future.is_empty() {
            continue;
        }

        let typos: Vec<(usize, NaiveDate)> = future
            .iter()
            .copied()
            .filter(|(_, d)| is_year_typo(*d, today))
            .collect();

        if !policy.year_typo_matches(typos.len(), future.len()) {
            outcomes.push(
                RemediationOutcome::declined(
                    StrategyId::FutureDates,
                    format!("Future dates in {} don't match the year-typo pattern", field),
                )
                .with_detail("field", field.as_str())
                .with_detail("future_count", future.len())
                .with_detail("year_typo_count", typos.len()),
            );
            continue;
        }

        for &(row, date) in &typos {
            table.set(row, field, Value::Date(shift_back_one_year(date)));
        }

        info!(field = %field, fixed = typos.len(), "Fixed year-typo future dates");
        outcomes.push(
            RemediationOutcome::fixed(
                StrategyId::FutureDates,
                typos.len(),
                format!(
                    "Fixed {} future dates in {} (year typo pattern)",
                    typos.len(),
                    field
                ),
            )
            .with_detail("field", field.as_str())
            .with_detail("pattern", "year_typo")
            .with_detail("fixed_count", typos.len()),
        );
    }

    (table, outcomes)
}
