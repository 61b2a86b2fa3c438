// claimsguard-core/src/application/pipeline.rs

use chrono::{NaiveDate, Utc};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument};

use crate::application::validation::DatasetValidator;
use crate::domain::dataset::DatasetKind;
use crate::domain::project::ProjectConfig;
use crate::domain::remediation::RemediationPolicy;
use crate::domain::report::{DatasetReport, ValidationReport};
use crate::domain::validation::RuleCatalog;
use crate::error::{ClaimsGuardError, ensure_safe_id};
use crate::ports::dataset_store::DatasetStore;
use crate::ports::progress::{ProgressLevel, ProgressSink};
use crate::ports::report::ReportPublisher;

pub const CANCELLED_MESSAGE: &str = "validation cancelled";

/// Adapters a validation run talks to.
pub struct ValidationServices<'a> {
    pub store: &'a dyn DatasetStore,
    pub publisher: &'a dyn ReportPublisher,
    pub progress: &'a dyn ProgressSink,
}

/// Resolved, immutable inputs of a run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub catalog: RuleCatalog,
    pub policy: RemediationPolicy,
    pub max_concurrent_datasets: usize,
    /// Reference date for age and future-date checks.
    pub today: NaiveDate,
}

impl RunSettings {
    pub fn from_config(config: &ProjectConfig, today: NaiveDate) -> Self {
        Self {
            catalog: RuleCatalog::standard(&config.validation, &config.remediation),
            policy: config.remediation.clone(),
            max_concurrent_datasets: config.workflow.max_concurrent_datasets,
            today,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationRun {
    pub report: ValidationReport,
    /// Where the publisher stored the report.
    pub location: String,
}

/// Validates every dataset of a workflow and publishes the aggregated report.
///
/// Datasets run concurrently (bounded by `max_concurrent_datasets`) and are
/// reported in canonical order. `cancel` is checked before each dataset starts;
/// datasets that never started are reported as critical failures. Only an unsafe
/// workflow id or a publishing failure makes the run itself fail.
#[instrument(skip(services, settings, cancel))]
pub async fn run_validation(
    services: &ValidationServices<'_>,
    settings: &RunSettings,
    workflow_id: &str,
    cancel: &AtomicBool,
) -> Result<ValidationRun, ClaimsGuardError> {
    ensure_safe_id(workflow_id)?;
    println!("🚀 Starting validation for workflow {}...", workflow_id);
    let start_time = std::time::Instant::now();

    let validator = DatasetValidator {
        workflow_id,
        store: services.store,
        progress: services.progress,
        catalog: &settings.catalog,
        policy: &settings.policy,
        today: settings.today,
    };
    let validator = &validator;

    let futures = DatasetKind::ALL.iter().map(|&dataset| async move {
        if cancel.load(Ordering::SeqCst) {
            validator.progress.emit(
                workflow_id,
                ProgressLevel::Warning,
                &format!("{}: {}", dataset, CANCELLED_MESSAGE),
            );
            return DatasetReport::failed(dataset, CANCELLED_MESSAGE);
        }
        validator.validate(dataset).await
    });

    let mut datasets: Vec<DatasetReport> = futures::stream::iter(futures)
        .buffer_unordered(settings.max_concurrent_datasets.max(1))
        .collect()
        .await;
    datasets.sort_by_key(|d| d.dataset);

    for d in &datasets {
        if d.passed() {
            println!(
                "  ✅ {} ({} -> {} records, {} fixes)",
                d.dataset, d.total_records, d.final_records, d.auto_fixes_applied
            );
        } else {
            eprintln!(
                "  ❌ {} ({} critical errors)",
                d.dataset,
                d.critical_errors.len()
            );
        }
    }

    let report = ValidationReport::new(workflow_id, Utc::now(), datasets);
    let location = services.publisher.publish(&report).await?;

    let verdict = if report.validation_passed {
        "PASSED"
    } else {
        "FAILED"
    };
    services.progress.emit(
        workflow_id,
        if report.validation_passed {
            ProgressLevel::Info
        } else {
            ProgressLevel::Error
        },
        &format!(
            "Validation {}: {} critical errors, {} warnings, {} auto-fixes applied",
            verdict,
            report.summary.critical_errors,
            report.summary.warnings,
            report.summary.auto_fixes_applied
        ),
    );
    info!(
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        location = %location,
        "Validation finished"
    );
    println!(
        "🏁 Validation {} in {:.2?}. Report: {}",
        verdict,
        start_time.elapsed(),
        location
    );

    Ok(ValidationRun { report, location })
}
