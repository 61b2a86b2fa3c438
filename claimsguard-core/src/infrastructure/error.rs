// claimsguard-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(claimsguard::infra::database::duckdb),
        help("An error occurred while reading or writing a CSV through DuckDB.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("DuckDB connection lock poisoned")]
    #[diagnostic(code(claimsguard::infra::database::poisoned))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    #[error("File System Error: {0}")]
    #[diagnostic(
        code(claimsguard::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(claimsguard::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(claimsguard::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(claimsguard::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(
        code(claimsguard::infra::config_missing),
        help("Create a claimsguard.yaml in the project directory.")
    )]
    ConfigNotFound(String),

    #[error("File not found: {0}")]
    #[diagnostic(
        code(claimsguard::infra::dataset_missing),
        help("The extraction stage must write the dataset before validation runs.")
    )]
    DatasetNotFound(String),

    #[error("Background task failed: {0}")]
    #[diagnostic(code(claimsguard::infra::task))]
    Task(#[from] tokio::task::JoinError),
}

// Shortcut so `?` works directly on duckdb calls.
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
