// claimsguard-core/src/domain/report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::dataset::DatasetKind;
use crate::domain::remediation::outcome::RemediationOutcome;
use crate::domain::validation::outcome::{RuleId, Severity, ValidationOutcome};

/// Steps a dataset went through, recorded for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Loaded,
    RulesEvaluated,
    RemediationApplied,
    Finalized,
}

/// A failed check (or a dataset that never got checked) surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub dataset: DatasetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleId>,
    pub message: String,
    #[serde(default)]
    pub affected_records: usize,
    #[serde(default)]
    pub affected_percentage: f64,
}

impl Issue {
    pub fn from_outcome(dataset: DatasetKind, outcome: &ValidationOutcome) -> Self {
        Self {
            dataset,
            rule: Some(outcome.rule_name),
            message: outcome.message.clone(),
            affected_records: outcome.affected_records,
            affected_percentage: outcome.affected_percentage,
        }
    }

    /// A dataset-level failure with no rule attached (load/save errors, cancellation).
    pub fn dataset_error(dataset: DatasetKind, message: impl Into<String>) -> Self {
        Self {
            dataset,
            rule: None,
            message: message.into(),
            affected_records: 0,
            affected_percentage: 0.0,
        }
    }
}

/// Everything recorded for one dataset during a validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetReport {
    pub dataset: DatasetKind,
    pub stages: Vec<Stage>,
    pub total_records: usize,
    pub final_records: usize,
    pub outcomes: Vec<ValidationOutcome>,
    pub remediations: Vec<RemediationOutcome>,
    /// Re-evaluation of repaired rules against the corrected table.
    #[serde(default)]
    pub post_remediation: Vec<ValidationOutcome>,
    pub critical_errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub auto_fixes_applied: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatasetReport {
    /// Report for a dataset that could not be validated at all.
    pub fn failed(dataset: DatasetKind, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            dataset,
            stages: Vec::new(),
            total_records: 0,
            final_records: 0,
            outcomes: Vec::new(),
            remediations: Vec::new(),
            post_remediation: Vec::new(),
            critical_errors: vec![Issue::dataset_error(dataset, error.clone())],
            warnings: Vec::new(),
            auto_fixes_applied: 0,
            error: Some(error),
        }
    }

    pub fn passed(&self) -> bool {
        self.critical_errors.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_checks: usize,
    pub passed: usize,
    pub failed: usize,
    pub critical_errors: usize,
    pub warnings: usize,
    pub auto_fixes_applied: usize,
}

impl ReportSummary {
    pub fn from_datasets(datasets: &[DatasetReport]) -> Self {
        let outcomes = datasets.iter().flat_map(|d| d.outcomes.iter());
        let (passed, failed) = outcomes.fold((0, 0), |(p, f), o| {
            if o.passed { (p + 1, f) } else { (p, f + 1) }
        });
        Self {
            total_checks: passed + failed,
            passed,
            failed,
            critical_errors: datasets.iter().map(|d| d.critical_errors.len()).sum(),
            warnings: datasets.iter().map(|d| d.warnings.len()).sum(),
            auto_fixes_applied: datasets.iter().map(|d| d.auto_fixes_applied).sum(),
        }
    }
}

/// Aggregated result of one validation run across every dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub workflow_id: String,
    pub generated_at: DateTime<Utc>,
    pub validation_passed: bool,
    pub summary: ReportSummary,
    pub critical_errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub datasets: Vec<DatasetReport>,
}

impl ValidationReport {
    /// Datasets are expected in canonical order.
    pub fn new(workflow_id: &str, generated_at: DateTime<Utc>, datasets: Vec<DatasetReport>) -> Self {
        let critical_errors: Vec<Issue> = datasets
            .iter()
            .flat_map(|d| d.critical_errors.iter().cloned())
            .collect();
        let warnings = datasets
            .iter()
            .flat_map(|d| d.warnings.iter().cloned())
            .collect();
        Self {
            workflow_id: workflow_id.to_string(),
            generated_at,
            validation_passed: critical_errors.is_empty(),
            summary: ReportSummary::from_datasets(&datasets),
            critical_errors,
            warnings,
            datasets,
        }
    }

    pub fn dataset(&self, kind: DatasetKind) -> Option<&DatasetReport> {
        self.datasets.iter().find(|d| d.dataset == kind)
    }

    /// Highest severity among unresolved failures, if any.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.datasets
            .iter()
            .flat_map(|d| d.outcomes.iter())
            .filter(|o| !o.passed && !o.fix_applied)
            .map(|o| o.severity)
            .max()
    }
}
