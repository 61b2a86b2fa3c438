// claimsguard-core/src/application/validation.rs

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use crate::domain::dataset::{DatasetKind, Table};
use crate::domain::remediation::{RemediationOutcome, RemediationPlan, RemediationPolicy};
use crate::domain::report::{DatasetReport, Issue, Stage};
use crate::domain::validation::{Rule, RuleCatalog, Severity, ValidationOutcome};
use crate::ports::dataset_store::DatasetStore;
use crate::ports::progress::{ProgressLevel, ProgressSink};

/// Everything a single dataset pass needs. Borrowed so the pipeline can share
/// one context across concurrently validated datasets.
pub struct DatasetValidator<'a> {
    pub workflow_id: &'a str,
    pub store: &'a dyn DatasetStore,
    pub progress: &'a dyn ProgressSink,
    pub catalog: &'a RuleCatalog,
    pub policy: &'a RemediationPolicy,
    pub today: NaiveDate,
}

/// Runs every rule in catalog order. Evaluation itself never fails.
pub fn evaluate_rules(rules: &[Rule], table: &Table, today: NaiveDate) -> Vec<ValidationOutcome> {
    rules.iter().map(|rule| rule.evaluate(table, today)).collect()
}

/// Unresolved critical failures block the run; everything else is a warning.
pub fn classify(
    dataset: DatasetKind,
    outcomes: &[ValidationOutcome],
) -> (Vec<Issue>, Vec<Issue>) {
    let mut critical = Vec::new();
    let mut warnings = Vec::new();
    for outcome in outcomes.iter().filter(|o| !o.passed) {
        let issue = Issue::from_outcome(dataset, outcome);
        if outcome.severity == Severity::Critical && !outcome.fix_applied {
            critical.push(issue);
        } else {
            warnings.push(issue);
        }
    }
    (critical, warnings)
}

impl DatasetValidator<'_> {
    fn emit(&self, level: ProgressLevel, message: &str) {
        self.progress.emit(self.workflow_id, level, message);
    }

    /// Load, score, remediate and classify one dataset.
    ///
    /// Failures stay inside the returned report: a dataset that cannot be loaded
    /// or saved becomes a critical issue rather than aborting the run.
    #[instrument(skip(self), fields(workflow_id = %self.workflow_id))]
    pub async fn validate(&self, dataset: DatasetKind) -> DatasetReport {
        self.emit(ProgressLevel::Info, &format!("Validating {}...", dataset));

        let table = match self.store.load(self.workflow_id, dataset).await {
            Ok(table) => table,
            Err(e) => {
                let message = format!("Failed to load {}: {}", dataset, e);
                self.emit(ProgressLevel::Error, &message);
                return DatasetReport::failed(dataset, message);
            }
        };
        let total_records = table.len();
        let mut stages = vec![Stage::Loaded];

        let rules = self.catalog.rules_for(dataset);
        let outcomes = evaluate_rules(rules, &table, self.today);
        stages.push(Stage::RulesEvaluated);

        let passed = outcomes.iter().filter(|o| o.passed).count();
        self.emit(
            ProgressLevel::Info,
            &format!("{}: {}/{} checks passed", dataset, passed, outcomes.len()),
        );

        let mut report = DatasetReport {
            dataset,
            stages,
            total_records,
            final_records: total_records,
            outcomes,
            remediations: Vec::new(),
            post_remediation: Vec::new(),
            critical_errors: Vec::new(),
            warnings: Vec::new(),
            auto_fixes_applied: 0,
            error: None,
        };

        if report.outcomes.iter().any(|o| o.auto_fixable) {
            self.remediate(&mut report, rules, table).await;
        }

        let (critical, warnings) = classify(dataset, &report.outcomes);
        report.critical_errors.extend(critical);
        report.warnings.extend(warnings);
        report.stages.push(Stage::Finalized);

        debug!(
            dataset = %dataset,
            critical = report.critical_errors.len(),
            warnings = report.warnings.len(),
            fixes = report.auto_fixes_applied,
            "Dataset validated"
        );
        report
    }

    async fn remediate(&self, report: &mut DatasetReport, rules: &[Rule], table: Table) {
        let dataset = report.dataset;
        self.emit(
            ProgressLevel::Info,
            &format!("Applying auto-remediation to {}...", dataset),
        );

        let plan = RemediationPlan::for_dataset(dataset);
        let remediation = plan.apply_all(table, self.policy, self.today);
        for outcome in &remediation.outcomes {
            let level = if outcome.success {
                ProgressLevel::Info
            } else {
                ProgressLevel::Warning
            };
            self.emit(level, &format!("{}: {}", dataset, outcome.message));
        }
        report.stages.push(Stage::RemediationApplied);
        report.final_records = remediation.table.len();

        let changed = remediation.records_fixed() > 0;
        if changed {
            if let Err(e) = self.store.save(self.workflow_id, dataset, &remediation.table).await {
                // Nothing was persisted, so nothing counts as fixed.
                let message = format!("Failed to save corrected {}: {}", dataset, e);
                warn!(dataset = %dataset, error = %e, "Corrected dataset not saved");
                self.emit(ProgressLevel::Error, &message);
                report.critical_errors.push(Issue::dataset_error(dataset, message.clone()));
                report.error = Some(message);
                report.final_records = report.total_records;
                report.remediations = remediation.outcomes;
                return;
            }
        }

        report.auto_fixes_applied = remediation
            .outcomes
            .iter()
            .filter(|o| o.success)
            .map(|o| o.records_fixed)
            .sum();

        // Re-score every failing rule a successful strategy targeted. A fix only
        // counts when the rule passes on the corrected table.
        report.post_remediation = rules
            .iter()
            .filter(|rule| {
                report.outcomes.iter().any(|o| o.rule_name == rule.id() && !o.passed)
                    && remediation.outcomes.iter().any(|r| r.repairs(rule.id()))
            })
            .map(|rule| rule.evaluate(&remediation.table, self.today))
            .collect();
        report.outcomes = mark_repaired(
            std::mem::take(&mut report.outcomes),
            &report.post_remediation,
        );
        for residual in report.post_remediation.iter().filter(|o| !o.passed) {
            self.emit(
                ProgressLevel::Warning,
                &format!(
                    "{}: {} still failing after remediation: {}",
                    dataset, residual.rule_name, residual.message
                ),
            );
        }

        report.remediations = remediation.outcomes;
    }
}

fn mark_repaired(
    outcomes: Vec<ValidationOutcome>,
    post_remediation: &[ValidationOutcome],
) -> Vec<ValidationOutcome> {
    outcomes
        .into_iter()
        .map(|o| {
            let applied = !o.passed
                && post_remediation
                    .iter()
                    .any(|p| p.rule_name == o.rule_name && p.passed);
            o.with_fix_applied(applied)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::Value;
    use crate::domain::remediation::StrategyId;
    use crate::domain::validation::{RuleId, ValidationConfig};
    use crate::infrastructure::adapters::InMemoryDatasetStore;
    use crate::infrastructure::progress::RecordingProgress;
    use std::collections::BTreeMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn catalog_expecting(dataset: DatasetKind, rows: usize) -> RuleCatalog {
        let config = ValidationConfig {
            expected_volumes: BTreeMap::from([(dataset, rows)]),
            ..ValidationConfig::default()
        };
        RuleCatalog::standard(&config, &RemediationPolicy::default())
    }

    fn pharmacy(rows: usize, negatives: usize) -> Table {
        let mut table =
            Table::new(vec!["claim_id", "member_id", "fill_date", "paid_amount", "drug_name"])
                .unwrap();
        for i in 0..rows {
            let amount = if i < negatives { -12.5 } else { 12.5 };
            table
                .push_row(vec![
                    Value::from(format!("RX{}", i)),
                    Value::from(format!("M{}", i % 50)),
                    Value::from("2025-01-10"),
                    Value::Float(amount),
                    Value::from("atorvastatin"),
                ])
                .unwrap();
        }
        table
    }

    #[test]
    fn test_classification() {
        let critical = ValidationOutcome::fail(RuleId::AgeRange, Severity::Critical, "bad", 1, 10);
        let fixed = ValidationOutcome::fail(RuleId::DateLogic, Severity::Critical, "typo", 1, 10)
            .with_fix_applied(true);
        let warning = ValidationOutcome::fail(RuleId::Duplicates, Severity::Warning, "dup", 1, 10);
        let ok = ValidationOutcome::pass(RuleId::NullValues, "ok", 10);

        let (c, w) = classify(DatasetKind::Members, &[critical, fixed, warning, ok]);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].rule, Some(RuleId::AgeRange));
        assert_eq!(w.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_dataset_is_critical() {
        let store = InMemoryDatasetStore::new();
        let progress = RecordingProgress::new();
        let catalog = catalog_expecting(DatasetKind::Members, 10);
        let policy = RemediationPolicy::default();
        let validator = DatasetValidator {
            workflow_id: "wf",
            store: &store,
            progress: &progress,
            catalog: &catalog,
            policy: &policy,
            today: today(),
        };

        let report = validator.validate(DatasetKind::Members).await;
        assert!(!report.passed());
        assert!(report.critical_errors[0].message.contains("Failed to load members"));
        assert!(report.outcomes.is_empty());
        assert_eq!(progress.messages_at(ProgressLevel::Error).len(), 1);
    }

    #[tokio::test]
    async fn test_clean_dataset_is_not_rewritten() -> anyhow::Result<()> {
        let store = InMemoryDatasetStore::new();
        store.insert("wf", DatasetKind::PharmacyClaims, pharmacy(100, 0)).await;
        let progress = RecordingProgress::new();
        let catalog = catalog_expecting(DatasetKind::PharmacyClaims, 100);
        let policy = RemediationPolicy::default();
        let validator = DatasetValidator {
            workflow_id: "wf",
            store: &store,
            progress: &progress,
            catalog: &catalog,
            policy: &policy,
            today: today(),
        };

        let report = validator.validate(DatasetKind::PharmacyClaims).await;
        assert!(report.passed());
        assert!(report.warnings.is_empty());
        assert_eq!(store.save_count(), 0);
        assert_eq!(
            report.stages,
            vec![Stage::Loaded, Stage::RulesEvaluated, Stage::Finalized]
        );
        assert!(
            progress
                .messages_at(ProgressLevel::Info)
                .contains(&"pharmacy_claims: 5/5 checks passed".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_negative_amounts_are_repaired_and_saved() -> anyhow::Result<()> {
        let store = InMemoryDatasetStore::new();
        store.insert("wf", DatasetKind::PharmacyClaims, pharmacy(200, 2)).await;
        let progress = RecordingProgress::new();
        let catalog = catalog_expecting(DatasetKind::PharmacyClaims, 200);
        let policy = RemediationPolicy::default();
        let validator = DatasetValidator {
            workflow_id: "wf",
            store: &store,
            progress: &progress,
            catalog: &catalog,
            policy: &policy,
            today: today(),
        };

        let report = validator.validate(DatasetKind::PharmacyClaims).await;
        assert!(report.passed());
        assert_eq!(report.auto_fixes_applied, 2);
        assert_eq!(store.save_count(), 1);

        let cost = report
            .outcomes
            .iter()
            .find(|o| o.rule_name == RuleId::CostAmounts)
            .unwrap();
        assert!(!cost.passed && cost.fix_applied);
        assert_eq!(report.warnings.len(), 1);

        assert_eq!(report.post_remediation.len(), 1);
        assert!(report.post_remediation[0].passed);
        assert!(report.remediations.iter().any(|r| r.strategy_name == StrategyId::NegativeAmounts));

        let saved = store.get("wf", DatasetKind::PharmacyClaims).await.unwrap();
        assert_eq!(saved.value(0, "paid_amount"), Some(&Value::Float(12.5)));
        Ok(())
    }

    /// Claims paid on 2025-03-10 for service on 2025-03-01. `out_of_order` rows are
    /// paid before service, one row is paid a year ahead and the last row repeats
    /// claim C10.
    fn medical_with_paid_dates(rows: usize, out_of_order: usize) -> Table {
        let mut table =
            Table::new(vec!["claim_id", "member_id", "service_date", "paid_date", "paid_amount"])
                .unwrap();
        for i in 0..rows {
            let id = if i == rows - 1 { 10 } else { i };
            let paid = if i < out_of_order {
                "2025-02-01"
            } else if i == out_of_order {
                "2026-03-10"
            } else {
                "2025-03-10"
            };
            table
                .push_row(vec![
                    Value::from(format!("C{}", id)),
                    Value::from(format!("M{}", id % 20)),
                    Value::from("2025-03-01"),
                    Value::from(paid),
                    Value::from("80.00"),
                ])
                .unwrap();
        }
        table
    }

    #[tokio::test]
    async fn test_unrelated_fix_does_not_clear_a_critical_rule() -> anyhow::Result<()> {
        let store = InMemoryDatasetStore::new();
        store
            .insert("wf", DatasetKind::MedicalClaims, medical_with_paid_dates(100, 5))
            .await;
        let progress = RecordingProgress::new();
        let catalog = catalog_expecting(DatasetKind::MedicalClaims, 100);
        let policy = RemediationPolicy::default();
        let validator = DatasetValidator {
            workflow_id: "wf",
            store: &store,
            progress: &progress,
            catalog: &catalog,
            policy: &policy,
            today: today(),
        };

        let report = validator.validate(DatasetKind::MedicalClaims).await;

        // The duplicate and the future paid date are both repaired...
        assert!(report.remediations.iter().any(|r| r.strategy_name == StrategyId::FutureDates && r.success));
        assert_eq!(report.auto_fixes_applied, 2);
        let duplicates = report
            .outcomes
            .iter()
            .find(|o| o.rule_name == RuleId::Duplicates)
            .unwrap();
        assert!(duplicates.fix_applied);

        // ...but paid-before-service rows remain, so date logic stays critical.
        let date_logic = report
            .outcomes
            .iter()
            .find(|o| o.rule_name == RuleId::DateLogic)
            .unwrap();
        assert!(!date_logic.passed);
        assert!(!date_logic.fix_applied);
        let residual = report
            .post_remediation
            .iter()
            .find(|o| o.rule_name == RuleId::DateLogic)
            .unwrap();
        assert!(!residual.passed);
        assert_eq!(residual.details["service_after_paid"], 5);

        assert!(!report.passed());
        assert_eq!(report.critical_errors.len(), 1);
        assert_eq!(report.critical_errors[0].rule, Some(RuleId::DateLogic));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_failure_voids_fixes() {
        let store = InMemoryDatasetStore::failing_saves();
        store.insert("wf", DatasetKind::PharmacyClaims, pharmacy(200, 2)).await;
        let progress = RecordingProgress::new();
        let catalog = catalog_expecting(DatasetKind::PharmacyClaims, 200);
        let policy = RemediationPolicy::default();
        let validator = DatasetValidator {
            workflow_id: "wf",
            store: &store,
            progress: &progress,
            catalog: &catalog,
            policy: &policy,
            today: today(),
        };

        let report = validator.validate(DatasetKind::PharmacyClaims).await;
        assert!(!report.passed());
        assert_eq!(report.auto_fixes_applied, 0);
        assert!(report.outcomes.iter().all(|o| !o.fix_applied));
        assert!(
            report.critical_errors[0]
                .message
                .starts_with("Failed to save corrected pharmacy_claims")
        );
    }

    #[tokio::test]
    async fn test_too_many_negatives_stay_unfixed() {
        let store = InMemoryDatasetStore::new();
        store.insert("wf", DatasetKind::PharmacyClaims, pharmacy(100, 10)).await;
        let progress = RecordingProgress::new();
        let catalog = catalog_expecting(DatasetKind::PharmacyClaims, 100);
        let policy = RemediationPolicy::default();
        let validator = DatasetValidator {
            workflow_id: "wf",
            store: &store,
            progress: &progress,
            catalog: &catalog,
            policy: &policy,
            today: today(),
        };

        let report = validator.validate(DatasetKind::PharmacyClaims).await;
        // Cost findings are warnings, so the dataset still passes.
        assert!(report.passed());
        assert_eq!(report.auto_fixes_applied, 0);
        assert_eq!(store.save_count(), 0);
        assert!(report.remediations.is_empty());
    }
}
