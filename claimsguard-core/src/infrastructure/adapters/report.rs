// claimsguard-core/src/infrastructure/adapters/report.rs

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::report::ValidationReport;
use crate::error::{ClaimsGuardError, ensure_safe_id};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::report::ReportPublisher;

/// Writes `<reports_dir>/<workflow_id>_validation_report.json`.
pub struct JsonReportPublisher {
    reports_dir: PathBuf,
}

impl JsonReportPublisher {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn report_path(&self, workflow_id: &str) -> PathBuf {
        self.reports_dir
            .join(format!("{}_validation_report.json", workflow_id))
    }
}

#[async_trait]
impl ReportPublisher for JsonReportPublisher {
    async fn publish(&self, report: &ValidationReport) -> Result<String, ClaimsGuardError> {
        ensure_safe_id(&report.workflow_id)?;
        let path = self.report_path(&report.workflow_id);
        let json = serde_json::to_string_pretty(report).map_err(InfrastructureError::from)?;
        atomic_write(&path, json)?;
        info!(path = %path.display(), "Validation report written");
        Ok(path.display().to_string())
    }
}

/// Reads a report previously written by [`JsonReportPublisher`].
pub fn load_report(path: &Path) -> Result<ValidationReport, InfrastructureError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
