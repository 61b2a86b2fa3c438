// claimsguard-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimsGuardError {
    // Business rules, tables, configuration values
    #[error(transparent)]
    Domain(#[from] DomainError),

    // IO, DuckDB, YAML, JSON
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe workflow identifier: {0}")]
    UnsafePath(String),
}

// Keeps `?` working on plain IO calls without a duplicate variant.
impl From<std::io::Error> for ClaimsGuardError {
    fn from(err: std::io::Error) -> Self {
        ClaimsGuardError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for ClaimsGuardError {
    fn from(err: duckdb::Error) -> Self {
        ClaimsGuardError::Infrastructure(err.into())
    }
}

/// Rejects workflow ids that could escape the data directory once used in a file name.
pub fn ensure_safe_id(workflow_id: &str) -> Result<(), ClaimsGuardError> {
    let unsafe_id = workflow_id.is_empty()
        || workflow_id.contains(['/', '\\', '\0'])
        || workflow_id.contains("..");
    if unsafe_id {
        return Err(ClaimsGuardError::UnsafePath(workflow_id.to_string()));
    }
    Ok(())
}
