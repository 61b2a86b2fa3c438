// claimsguard-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::domain::remediation::policy::RemediationPolicy;
use crate::domain::validation::configuration::ValidationConfig;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
pub struct ProjectConfig {
    #[validate(length(min = 1))]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    /// Root of the workflow-scoped data.
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,

    /// Extracted CSVs, relative to `data-dir` unless absolute.
    #[serde(rename = "extracts-dir", default = "default_extracts_dir")]
    pub extracts_dir: String,

    /// Validation reports, relative to `data-dir` unless absolute.
    #[serde(rename = "reports-dir", default = "default_reports_dir")]
    pub reports_dir: String,

    #[serde(default)]
    #[validate(nested)]
    pub validation: ValidationConfig,

    #[serde(default)]
    #[validate(nested)]
    pub remediation: RemediationPolicy,

    #[serde(default)]
    #[validate(nested)]
    pub workflow: WorkflowConfig,
}

/// Retry and concurrency knobs for the validation stage.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
#[serde(default, rename_all = "kebab-case")]
pub struct WorkflowConfig {
    #[validate(range(max = 10))]
    pub max_retries: u32,

    /// Backoff is `retry_delay_base ^ attempt` seconds.
    #[validate(range(min = 0.0, max = 60.0))]
    pub retry_delay_base: f64,

    #[validate(range(min = 1, max = 64))]
    pub max_concurrent_datasets: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_base: 2.0,
            max_concurrent_datasets: 4,
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "claimsguard".to_string(),
            version: default_version(),
            data_dir: default_data_dir(),
            extracts_dir: default_extracts_dir(),
            reports_dir: default_reports_dir(),
            validation: ValidationConfig::default(),
            remediation: RemediationPolicy::default(),
            workflow: WorkflowConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Resolves the extracts directory against `project_dir`.
    pub fn extracts_path(&self, project_dir: &Path) -> PathBuf {
        self.data_path(project_dir).join(&self.extracts_dir)
    }

    pub fn reports_path(&self, project_dir: &Path) -> PathBuf {
        self.data_path(project_dir).join(&self.reports_dir)
    }

    fn data_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_dir)
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}
fn default_data_dir() -> String {
    "data".to_string()
}
fn default_extracts_dir() -> String {
    "extracts".to_string()
}
fn default_reports_dir() -> String {
    "extracts".to_string()
}
