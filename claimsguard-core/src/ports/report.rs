// claimsguard-core/src/ports/report.rs

use async_trait::async_trait;

use crate::domain::report::ValidationReport;
use crate::error::ClaimsGuardError;

#[async_trait]
pub trait ReportPublisher: Send + Sync {
    /// Persists the report and returns where it can be found.
    async fn publish(&self, report: &ValidationReport) -> Result<String, ClaimsGuardError>;
}
