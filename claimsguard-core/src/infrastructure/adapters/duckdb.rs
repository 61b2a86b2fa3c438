// claimsguard-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

use crate::domain::dataset::{DatasetKind, Table, Value};
use crate::domain::error::DomainError;
use crate::error::{ClaimsGuardError, ensure_safe_id};
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::infrastructure::fs::{commit_staged, staging_path};
use crate::ports::dataset_store::DatasetStore;

const EXPORT_TABLE: &str = "claimsguard_export";

/// CSV-backed dataset store: `<extracts_dir>/<workflow_id>_<dataset>.csv`.
///
/// DuckDB does the CSV parsing and writing. Every cell is read as text and kept
/// verbatim by [`Table::from_text_rows`], so the domain never depends on the
/// engine's type sniffing and unchanged cells are written back as they were read.
pub struct DuckDbDatasetStore {
    conn: Arc<Mutex<Connection>>,
    extracts_dir: PathBuf,
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, InfrastructureError> {
    conn.lock()
        .map_err(|_| InfrastructureError::Database(DatabaseError::Poisoned))
}

fn sql_literal(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "''")
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl DuckDbDatasetStore {
    pub fn new(extracts_dir: impl Into<PathBuf>) -> Result<Self, InfrastructureError> {
        let conn = Connection::open_in_memory_with_flags(Config::default())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            extracts_dir: extracts_dir.into(),
        })
    }

    pub fn dataset_path(&self, workflow_id: &str, dataset: DatasetKind) -> PathBuf {
        self.extracts_dir
            .join(format!("{}_{}.csv", workflow_id, dataset.as_str()))
    }
}

fn read_csv(conn: &Mutex<Connection>, path: &Path) -> Result<Table, ClaimsGuardError> {
    if !path.exists() {
        return Err(InfrastructureError::DatasetNotFound(path.display().to_string()).into());
    }
    let source = format!(
        "read_csv('{}', header = true, all_varchar = true)",
        sql_literal(path)
    );
    let conn = lock(conn)?;

    let mut describe = conn.prepare(&format!("DESCRIBE SELECT * FROM {}", source))?;
    let columns: Vec<String> = describe
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<_, _>>()?;

    let width = columns.len();
    let mut select = conn.prepare(&format!("SELECT * FROM {}", source))?;
    let rows: Vec<Vec<Option<String>>> = select
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Option<String>>(i))
                .collect::<Result<Vec<_>, _>>()
        })?
        .collect::<Result<_, _>>()?;

    debug!(path = %path.display(), rows = rows.len(), columns = width, "CSV loaded");
    Table::from_text_rows(columns, rows).map_err(|e| DomainError::Table(e).into())
}

fn write_csv(conn: &Mutex<Connection>, path: &Path, table: &Table) -> Result<(), ClaimsGuardError> {
    let staged = staging_path(path, ".csv")?;
    let columns = table
        .columns()
        .iter()
        .map(|c| format!("{} VARCHAR", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; table.columns().len()].join(", ");

    let mut conn = lock(conn)?;
    conn.execute_batch(&format!(
        "CREATE OR REPLACE TEMP TABLE {} ({})",
        EXPORT_TABLE, columns
    ))?;

    let tx = conn.transaction()?;
    {
        let mut insert = tx.prepare(&format!(
            "INSERT INTO {} VALUES ({})",
            EXPORT_TABLE, placeholders
        ))?;
        for row in table.rows() {
            let cells: Vec<Option<String>> = row.iter().map(Value::render).collect();
            insert.execute(duckdb::params_from_iter(cells))?;
        }
    }
    tx.commit()?;

    conn.execute_batch(&format!(
        "COPY {} TO '{}' (HEADER, DELIMITER ','); DROP TABLE {};",
        EXPORT_TABLE,
        sql_literal(&staged),
        EXPORT_TABLE
    ))?;
    drop(conn);

    commit_staged(staged, path)?;
    debug!(path = %path.display(), rows = table.len(), "CSV written");
    Ok(())
}

#[async_trait]
impl DatasetStore for DuckDbDatasetStore {
    #[instrument(skip(self))]
    async fn load(
        &self,
        workflow_id: &str,
        dataset: DatasetKind,
    ) -> Result<Table, ClaimsGuardError> {
        ensure_safe_id(workflow_id)?;
        let path = self.dataset_path(workflow_id, dataset);
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || read_csv(&conn, &path))
            .await
            .map_err(InfrastructureError::from)?
    }

    #[instrument(skip(self, table), fields(rows = table.len()))]
    async fn save(
        &self,
        workflow_id: &str,
        dataset: DatasetKind,
        table: &Table,
    ) -> Result<(), ClaimsGuardError> {
        ensure_safe_id(workflow_id)?;
        let path = self.dataset_path(workflow_id, dataset);
        let conn = Arc::clone(&self.conn);
        let table = table.clone();
        tokio::task::spawn_blocking(move || write_csv(&conn, &path, &table))
            .await
            .map_err(InfrastructureError::from)?
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    const CLAIMS: &str = "\
claim_id,member_id,service_date,paid_amount,place_of_service
C1,M1,2024-01-05,120.50,office
C2,M2,2024-02-11,-40,
C3,M1,2024-03-01,75,\"hospital, inpatient\"
";

    #[tokio::test]
    async fn test_load_keeps_cell_text() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("wf1_medical_claims.csv"), CLAIMS)?;
        let store = DuckDbDatasetStore::new(dir.path())?;

        let table = store.load("wf1", DatasetKind::MedicalClaims).await?;
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.columns(),
            &["claim_id", "member_id", "service_date", "paid_amount", "place_of_service"]
        );
        assert_eq!(table.value(0, "paid_amount"), Some(&Value::from("120.50")));
        assert_eq!(table.value(1, "paid_amount").unwrap().as_f64(), Some(-40.0));
        assert_eq!(table.value(1, "place_of_service"), Some(&Value::Null));
        assert_eq!(
            table.value(2, "place_of_service"),
            Some(&Value::from("hospital, inpatient"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let store = DuckDbDatasetStore::new(dir.path())?;
        let err = store
            .load("wf1", DatasetKind::Members)
            .await
            .expect_err("no file was written");
        assert!(err.to_string().contains("wf1_members.csv"));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_overwrites_and_reloads() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("wf1_medical_claims.csv"), CLAIMS)?;
        let store = DuckDbDatasetStore::new(dir.path())?;

        let mut table = store.load("wf1", DatasetKind::MedicalClaims).await?;
        table.set(1, "paid_amount", Value::Float(40.0));
        table.set(
            0,
            "service_date",
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()),
        );
        table.retain_rows(&[true, true, false]);
        store.save("wf1", DatasetKind::MedicalClaims, &table).await?;

        let reloaded = store.load("wf1", DatasetKind::MedicalClaims).await?;
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.value(1, "paid_amount"), Some(&Value::from("40")));
        assert_eq!(reloaded.value(0, "paid_amount"), Some(&Value::from("120.50")));
        assert_eq!(
            reloaded.value(0, "service_date"),
            Some(&Value::from("2024-01-06"))
        );
        // No staging files left behind.
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_untouched_cells_round_trip_byte_for_byte() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("wf1_members.csv");
        fs::write(&path, "member_id,hcc_risk_score\n007,1.50\n7,-0.250\n")?;
        let store = DuckDbDatasetStore::new(dir.path())?;

        let mut table = store.load("wf1", DatasetKind::Members).await?;
        table.set(1, "hcc_risk_score", Value::from("0.250"));
        store.save("wf1", DatasetKind::Members, &table).await?;

        let written = fs::read_to_string(&path)?;
        assert!(written.contains("007,1.50"));
        assert!(written.contains("7,0.250"));
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_path_like_workflow_ids() -> Result<()> {
        let dir = tempdir()?;
        let store = DuckDbDatasetStore::new(dir.path())?;
        let result = store.load("../escape", DatasetKind::Members).await;
        assert!(matches!(result, Err(ClaimsGuardError::UnsafePath(_))));
        Ok(())
    }
}
