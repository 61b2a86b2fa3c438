// claimsguard-core/src/domain/remediation/plan.rs

use chrono::NaiveDate;

use crate::domain::dataset::{DatasetKind, Table};
use crate::domain::remediation::outcome::RemediationOutcome;
use crate::domain::remediation::policy::RemediationPolicy;
use crate::domain::remediation::strategies::{
    fix_date_formats, fix_duplicates, fix_future_dates, fix_gender_mismatch, fix_negative_amounts,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GenderFields {
    pub gender: String,
    pub diagnosis: String,
}

/// Which columns each strategy works on for one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RemediationPlan {
    pub date_fields: Vec<String>,
    pub key_fields: Vec<String>,
    pub amount_fields: Vec<String>,
    pub gender: Option<GenderFields>,
}

/// The corrected table plus every outcome, in strategy order.
#[derive(Debug, Clone, PartialEq)]
pub struct Remediation {
    pub table: Table,
    pub outcomes: Vec<RemediationOutcome>,
}

impl Remediation {
    pub fn records_fixed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.success)
            .map(|o| o.records_fixed)
            .sum()
    }
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

impl RemediationPlan {
    pub fn for_dataset(dataset: DatasetKind) -> Self {
        let key_fields = owned(dataset.key_fields());
        match dataset {
            DatasetKind::Members => Self {
                date_fields: owned(&[
                    "date_of_birth",
                    "attribution_start_date",
                    "attribution_end_date",
                ]),
                key_fields,
                amount_fields: Vec::new(),
                gender: None,
            },
            DatasetKind::MedicalClaims => Self {
                date_fields: owned(&["service_date", "paid_date"]),
                key_fields,
                amount_fields: owned(&["paid_amount", "allowed_amount"]),
                gender: Some(GenderFields {
                    gender: "gender".to_string(),
                    diagnosis: "primary_diagnosis".to_string(),
                }),
            },
            DatasetKind::PharmacyClaims => Self {
                date_fields: owned(&["fill_date"]),
                key_fields,
                amount_fields: owned(&["paid_amount"]),
                gender: None,
            },
            DatasetKind::QualityMeasures => Self {
                date_fields: Vec::new(),
                key_fields,
                amount_fields: Vec::new(),
                gender: None,
            },
        }
    }

    /// Runs every strategy in order: date formats, duplicates, negative amounts,
    /// future dates, gender. Later steps see the output of earlier ones.
    pub fn apply_all(
        &self,
        table: Table,
        policy: &RemediationPolicy,
        today: NaiveDate,
    ) -> Remediation {
        let mut outcomes = Vec::new();

        let (table, mut step) = fix_date_formats(table, &self.date_fields, policy);
        outcomes.append(&mut step);

        let (table, mut step) = fix_duplicates(table, &self.key_fields, policy);
        outcomes.append(&mut step);

        let (table, mut step) = fix_negative_amounts(table, &self.amount_fields, policy);
        outcomes.append(&mut step);

        let (table, mut step) = fix_future_dates(table, &self.date_fields, policy, today);
        outcomes.append(&mut step);

        let table = match &self.gender {
            Some(fields) => {
                let (table, mut step) =
                    fix_gender_mismatch(table, &fields.gender, &fields.diagnosis, policy);
                outcomes.append(&mut step);
                table
            }
            None => table,
        };

        Remediation { table, outcomes }
    }
}
