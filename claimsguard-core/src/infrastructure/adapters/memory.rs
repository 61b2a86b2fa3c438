// claimsguard-core/src/infrastructure/adapters/memory.rs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::domain::dataset::{DatasetKind, Table};
use crate::error::ClaimsGuardError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::dataset_store::DatasetStore;

type Key = (String, DatasetKind);

/// Dataset store kept entirely in memory. Used for tests and dry runs.
#[derive(Default)]
pub struct InMemoryDatasetStore {
    tables: Mutex<HashMap<Key, Table>>,
    fail_saves: bool,
    saves: AtomicUsize,
}

impl InMemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `save` always fails, for exercising the error path.
    pub fn failing_saves() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub async fn insert(&self, workflow_id: &str, dataset: DatasetKind, table: Table) {
        self.tables
            .lock()
            .await
            .insert((workflow_id.to_string(), dataset), table);
    }

    pub async fn get(&self, workflow_id: &str, dataset: DatasetKind) -> Option<Table> {
        self.tables
            .lock()
            .await
            .get(&(workflow_id.to_string(), dataset))
            .cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DatasetStore for InMemoryDatasetStore {
    async fn load(
        &self,
        workflow_id: &str,
        dataset: DatasetKind,
    ) -> Result<Table, ClaimsGuardError> {
        self.get(workflow_id, dataset).await.ok_or_else(|| {
            InfrastructureError::DatasetNotFound(format!("{}_{}", workflow_id, dataset)).into()
        })
    }

    async fn save(
        &self,
        workflow_id: &str,
        dataset: DatasetKind,
        table: &Table,
    ) -> Result<(), ClaimsGuardError> {
        if self.fail_saves {
            return Err(InfrastructureError::Io(std::io::Error::other("disk full")).into());
        }
        self.saves.fetch_add(1, Ordering::Relaxed);
        self.insert(workflow_id, dataset, table.clone()).await;
        Ok(())
    }
}
