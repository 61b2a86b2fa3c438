// claimsguard-core/src/domain/validation/rules/mod.rs

pub mod completeness;
pub mod consistency;
pub mod logic;
pub mod range;

use chrono::NaiveDate;

pub use completeness::{NullValueRule, RequiredFieldsRule};
pub use consistency::{DuplicateRule, VolumeConsistencyRule};
pub use logic::{DateLogicRule, GenderDiagnosisRule};
pub use range::{AgeRangeRule, CostAmountRule};

use crate::domain::dataset::Table;
use crate::domain::validation::outcome::{RuleId, ValidationOutcome};

/// One configured check. Evaluation is read-only and never fails: shape problems
/// (missing optional columns, empty tables) come back as passing outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    RequiredFields(RequiredFieldsRule),
    NullValues(NullValueRule),
    VolumeConsistency(VolumeConsistencyRule),
    Duplicates(DuplicateRule),
    AgeRange(AgeRangeRule),
    CostAmounts(CostAmountRule),
    DateLogic(DateLogicRule),
    GenderDiagnosis(GenderDiagnosisRule),
}

impl Rule {
    pub fn id(&self) -> RuleId {
        match self {
            Rule::RequiredFields(_) => RuleId::RequiredFields,
            Rule::NullValues(_) => RuleId::NullValues,
            Rule::VolumeConsistency(_) => RuleId::VolumeConsistency,
            Rule::Duplicates(_) => RuleId::Duplicates,
            Rule::AgeRange(_) => RuleId::AgeRange,
            Rule::CostAmounts(_) => RuleId::CostAmounts,
            Rule::DateLogic(_) => RuleId::DateLogic,
            Rule::GenderDiagnosis(_) => RuleId::GenderDiagnosis,
        }
    }

    pub fn evaluate(&self, table: &Table, today: NaiveDate) -> ValidationOutcome {
        match self {
            Rule::RequiredFields(r) => r.evaluate(table),
            Rule::NullValues(r) => r.evaluate(table),
            Rule::VolumeConsistency(r) => r.evaluate(table),
            Rule::Duplicates(r) => r.evaluate(table),
            Rule::AgeRange(r) => r.evaluate(table, today),
            Rule::CostAmounts(r) => r.evaluate(table),
            Rule::DateLogic(r) => r.evaluate(table, today),
            Rule::GenderDiagnosis(r) => r.evaluate(table),
        }
    }

    /// Human summary of what this instance checks, used by the `rules` listing.
    pub fn describe(&self) -> String {
        match self {
            Rule::RequiredFields(r) => format!("columns present: {}", r.required_fields.join(", ")),
            Rule::NullValues(r) => format!(
                "no nulls in {} (critical above {:.0}% on any field)",
                r.fields.join(", "),
                r.critical_share * 100.0
            ),
            Rule::VolumeConsistency(r) => format!(
                "row count within {:.0}% of {}",
                r.tolerance * 100.0,
                r.expected_count
            ),
            Rule::Duplicates(r) => format!(
                "unique on {} (critical and not fixable above {:.0}%)",
                r.key_fields.join(", "),
                r.policy.max_duplicate_share * 100.0
            ),
            Rule::AgeRange(r) => format!(
                "age from {} within 0-{} years",
                r.dob_field, r.max_age_years
            ),
            Rule::CostAmounts(r) => format!(
                "{} non-negative and at most {:.0}",
                r.amount_fields.join(", "),
                r.high_cost_threshold
            ),
            Rule::DateLogic(r) => format!(
                "{} not after {} nor in the future",
                r.service_date_field, r.paid_date_field
            ),
            Rule::GenderDiagnosis(r) => format!(
                "no male {} with a female-only {}",
                r.gender_field, r.diagnosis_field
            ),
        }
    }
}
