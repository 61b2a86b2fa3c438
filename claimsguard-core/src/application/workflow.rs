// claimsguard-core/src/application/workflow.rs

use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::application::pipeline::{RunSettings, ValidationServices, run_validation};
use crate::domain::project::WorkflowConfig;
use crate::domain::report::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Skipped,
}

/// What the surrounding workflow should do once validation has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageDecision {
    /// Data is fit for downstream analysis.
    Proceed,
    Halt,
}

/// The slice of workflow state the validation stage reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub workflow_id: String,
    pub status: WorkflowStatus,
    pub validation_status: StageStatus,
    pub validation_passed: bool,
    pub critical_errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub auto_fixes_applied: usize,
    pub reports_generated: Vec<String>,
    pub retry_count: u32,
    pub errors: Vec<String>,
}

impl WorkflowState {
    pub fn new(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            status: WorkflowStatus::Pending,
            validation_status: StageStatus::Pending,
            validation_passed: false,
            critical_errors: Vec::new(),
            warnings: Vec::new(),
            auto_fixes_applied: 0,
            reports_generated: Vec::new(),
            retry_count: 0,
            errors: Vec::new(),
        }
    }
}

/// Exponential backoff between attempts of a failed stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay_base: f64,
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based): `base ^ retry` seconds.
    pub fn delay(&self, retry: u32) -> Duration {
        let secs = self.retry_delay_base.powi(retry as i32);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }
}

impl From<&WorkflowConfig> for RetryPolicy {
    fn from(config: &WorkflowConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay_base: config.retry_delay_base,
        }
    }
}

/// Runs validation as a workflow stage, retrying when the run itself errors.
///
/// Critical findings are not retried: they are a verdict, not a failure.
#[instrument(skip_all, fields(workflow_id = %state.workflow_id))]
pub async fn run_validation_stage(
    state: &mut WorkflowState,
    services: &ValidationServices<'_>,
    settings: &RunSettings,
    retry: RetryPolicy,
    cancel: &AtomicBool,
) -> StageDecision {
    state.status = WorkflowStatus::Running;
    state.validation_status = StageStatus::Running;

    let mut attempt = 0;
    let run = loop {
        match run_validation(services, settings, &state.workflow_id, cancel).await {
            Ok(run) => break Some(run),
            Err(e) => {
                state.errors.push(format!("validation: {}", e));
                if attempt >= retry.max_retries {
                    break None;
                }
                attempt += 1;
                let delay = retry.delay(attempt);
                warn!(
                    attempt,
                    max = retry.max_retries,
                    delay_secs = delay.as_secs_f64(),
                    error = %e,
                    "Validation failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    };
    state.retry_count = attempt;

    let Some(run) = run else {
        state.validation_status = StageStatus::Failed;
        state.status = WorkflowStatus::Failed;
        return StageDecision::Halt;
    };

    let report = run.report;
    state.validation_status = StageStatus::Completed;
    state.validation_passed = report.validation_passed;
    state.critical_errors = report.critical_errors;
    state.warnings = report.warnings;
    state.auto_fixes_applied = report.summary.auto_fixes_applied;
    state.reports_generated.push(run.location);

    if state.validation_passed {
        info!(fixes = state.auto_fixes_applied, "Validation stage passed");
        StageDecision::Proceed
    } else {
        let cancelled = cancel.load(std::sync::atomic::Ordering::SeqCst);
        state.status = if cancelled {
            WorkflowStatus::Cancelled
        } else {
            WorkflowStatus::Failed
        };
        warn!(
            critical = state.critical_errors.len(),
            "Validation stage halted the workflow"
        );
        StageDecision::Halt
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::DatasetKind;
    use crate::domain::project::ProjectConfig;
    use crate::domain::report::ValidationReport;
    use crate::error::ClaimsGuardError;
    use crate::infrastructure::adapters::InMemoryDatasetStore;
    use crate::infrastructure::progress::RecordingProgress;
    use crate::ports::report::ReportPublisher;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails the first `failures` publishes, then succeeds.
    struct FlakyPublisher {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReportPublisher for FlakyPublisher {
        async fn publish(&self, report: &ValidationReport) -> Result<String, ClaimsGuardError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(ClaimsGuardError::InternalError("report sink offline".into()));
            }
            Ok(format!("memory://{}", report.workflow_id))
        }
    }

    fn settings() -> RunSettings {
        RunSettings::from_config(
            &ProjectConfig::default(),
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        )
    }

    fn no_wait(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            retry_delay_base: 0.0,
        }
    }

    #[test]
    fn test_backoff_is_exponential() {
        let policy = RetryPolicy {
            max_retries: 3,
            retry_delay_base: 2.0,
        };
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(3), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn test_retries_until_publish_succeeds() {
        let store = InMemoryDatasetStore::new();
        let publisher = FlakyPublisher {
            failures: 2,
            calls: AtomicUsize::new(0),
        };
        let progress = RecordingProgress::new();
        let services = ValidationServices {
            store: &store,
            publisher: &publisher,
            progress: &progress,
        };
        let mut state = WorkflowState::new("wf-retry");

        let cancel = AtomicBool::new(false);
        let decision =
            run_validation_stage(&mut state, &services, &settings(), no_wait(3), &cancel)
                .await;

        // Nothing was extracted, so the run completes but blocks the workflow.
        assert_eq!(decision, StageDecision::Halt);
        assert_eq!(state.retry_count, 2);
        assert_eq!(state.errors.len(), 2);
        assert_eq!(state.validation_status, StageStatus::Completed);
        assert_eq!(state.status, WorkflowStatus::Failed);
        assert_eq!(state.critical_errors.len(), DatasetKind::ALL.len());
        assert_eq!(state.reports_generated, vec!["memory://wf-retry".to_string()]);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let store = InMemoryDatasetStore::new();
        let publisher = FlakyPublisher {
            failures: usize::MAX,
            calls: AtomicUsize::new(0),
        };
        let progress = RecordingProgress::new();
        let services = ValidationServices {
            store: &store,
            publisher: &publisher,
            progress: &progress,
        };
        let mut state = WorkflowState::new("wf-down");

        let cancel = AtomicBool::new(false);
        let decision =
            run_validation_stage(&mut state, &services, &settings(), no_wait(1), &cancel)
                .await;

        assert_eq!(decision, StageDecision::Halt);
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(state.validation_status, StageStatus::Failed);
        assert_eq!(state.status, WorkflowStatus::Failed);
        assert!(state.reports_generated.is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_marks_workflow_cancelled() {
        let store = InMemoryDatasetStore::new();
        let publisher = FlakyPublisher {
            failures: 0,
            calls: AtomicUsize::new(0),
        };
        let progress = RecordingProgress::new();
        let services = ValidationServices {
            store: &store,
            publisher: &publisher,
            progress: &progress,
        };
        let mut state = WorkflowState::new("wf-cancel");

        let cancel = AtomicBool::new(true);
        let decision =
            run_validation_stage(&mut state, &services, &settings(), no_wait(0), &cancel)
                .await;

        assert_eq!(decision, StageDecision::Halt);
        assert_eq!(state.status, WorkflowStatus::Cancelled);
        assert!(!state.validation_passed);
    }
}
