// claimsguard-core/src/ports/dataset_store.rs

// Where extracted datasets live. The orchestrator only ever sees whole, materialized
// tables: loading and saving happen entirely outside rule evaluation.

use async_trait::async_trait;

use crate::domain::dataset::{DatasetKind, Table};
use crate::error::ClaimsGuardError;

#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Materializes the dataset extracted for `workflow_id`.
    async fn load(
        &self,
        workflow_id: &str,
        dataset: DatasetKind,
    ) -> Result<Table, ClaimsGuardError>;

    /// Overwrites the stored dataset with a corrected table.
    async fn save(
        &self,
        workflow_id: &str,
        dataset: DatasetKind,
        table: &Table,
    ) -> Result<(), ClaimsGuardError>;
}
