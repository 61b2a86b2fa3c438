// claimsguard-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::dataset::TableError;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Unknown dataset '{0}'")]
    #[diagnostic(
        code(claimsguard::domain::unknown_dataset),
        help("Expected one of: members, medical_claims, pharmacy_claims, quality_measures.")
    )]
    UnknownDataset(String),

    #[error("Malformed table: {0}")]
    #[diagnostic(code(claimsguard::domain::table))]
    Table(#[from] TableError),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(claimsguard::domain::config),
        help("Shares must lie in [0, 1] and counts must be positive.")
    )]
    InvalidConfig(#[from] validator::ValidationErrors),
}
