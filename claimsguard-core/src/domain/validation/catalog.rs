// claimsguard-core/src/domain/validation/catalog.rs

use std::collections::BTreeMap;

use crate::domain::dataset::DatasetKind;
use crate::domain::remediation::policy::RemediationPolicy;
use crate::domain::validation::configuration::ValidationConfig;
use crate::domain::validation::rules::{
    AgeRangeRule, CostAmountRule, DateLogicRule, DuplicateRule, GenderDiagnosisRule,
    NullValueRule, RequiredFieldsRule, Rule, VolumeConsistencyRule,
};

/// The rule set each dataset is scored against, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleCatalog {
    rules: BTreeMap<DatasetKind, Vec<Rule>>,
}

impl RuleCatalog {
    pub fn standard(config: &ValidationConfig, policy: &RemediationPolicy) -> Self {
        let rules = DatasetKind::ALL
            .iter()
            .map(|&kind| (kind, Self::rules_for_kind(kind, config, policy)))
            .collect();
        Self { rules }
    }

    pub fn rules_for(&self, dataset: DatasetKind) -> &[Rule] {
        self.rules.get(&dataset).map(Vec::as_slice).unwrap_or(&[])
    }

    fn rules_for_kind(
        kind: DatasetKind,
        config: &ValidationConfig,
        policy: &RemediationPolicy,
    ) -> Vec<Rule> {
        let required = kind.required_fields();
        let mut rules = vec![
            Rule::RequiredFields(RequiredFieldsRule::new(required)),
            Rule::NullValues(NullValueRule::new(required, config.null_critical_share)),
            Rule::VolumeConsistency(VolumeConsistencyRule::new(
                config.expected_volume(kind),
                config.volume_tolerance,
            )),
            Rule::Duplicates(DuplicateRule::new(kind.key_fields(), policy.clone())),
        ];

        match kind {
            DatasetKind::Members => {
                rules.push(Rule::AgeRange(AgeRangeRule::new(
                    "date_of_birth",
                    config.max_age_years,
                )));
            }
            DatasetKind::MedicalClaims => {
                rules.push(Rule::CostAmounts(CostAmountRule::new(
                    &["paid_amount", "allowed_amount"],
                    config.high_cost_threshold,
                    policy.clone(),
                )));
                rules.push(Rule::DateLogic(DateLogicRule::new(
                    "service_date",
                    "paid_date",
                    policy.clone(),
                )));
                rules.push(Rule::GenderDiagnosis(GenderDiagnosisRule::new(
                    "gender",
                    "primary_diagnosis",
                    policy.clone(),
                )));
            }
            DatasetKind::PharmacyClaims => {
                rules.push(Rule::CostAmounts(CostAmountRule::new(
                    &["paid_amount"],
                    config.high_cost_threshold,
                    policy.clone(),
                )));
            }
            DatasetKind::QualityMeasures => {}
        }
        rules
    }
}
