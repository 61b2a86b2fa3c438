// claimsguard-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::error::DomainError;
use crate::domain::project::configuration::ProjectConfig;
use crate::error::ClaimsGuardError;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["claimsguard_project.yaml", "claimsguard.yaml"];

pub const ENV_DATA_DIR: &str = "CLAIMSGUARD_DATA_DIR";
pub const ENV_MAX_RETRIES: &str = "CLAIMSGUARD_MAX_RETRIES";

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, ClaimsGuardError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    let content = fs::read_to_string(&config_path).map_err(InfrastructureError::Io)?;
    let mut config: ProjectConfig =
        serde_yaml::from_str(&content).map_err(InfrastructureError::YamlError)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate().map_err(DomainError::InvalidConfig)?;

    Ok(config)
}

/// Same as [`load_project_config`] but falls back to built-in defaults when no
/// configuration file exists. Malformed files are still an error.
pub fn load_project_config_or_default(
    project_dir: &Path,
) -> Result<ProjectConfig, ClaimsGuardError> {
    match load_project_config(project_dir) {
        Err(ClaimsGuardError::Infrastructure(InfrastructureError::ConfigNotFound(msg))) => {
            warn!(%msg, "No project configuration, using defaults");
            let mut config = ProjectConfig::default();
            apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
            Ok(config)
        }
        other => other,
    }
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

/// Layers environment values over the file. `lookup` abstracts the environment
/// so callers (and tests) can supply their own.
pub fn apply_env_overrides<F>(
    config: &mut ProjectConfig,
    lookup: F,
) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_DATA_DIR) {
        info!(old = ?config.data_dir, new = ?val, "Overriding data dir via ENV");
        config.data_dir = val;
    }
    if let Some(val) = lookup(ENV_MAX_RETRIES) {
        let retries = val.trim().parse::<u32>().map_err(|_| {
            InfrastructureError::ConfigError(format!(
                "{} must be an integer, got '{}'",
                ENV_MAX_RETRIES, val
            ))
        })?;
        info!(
            old = config.workflow.max_retries,
            new = retries,
            "Overriding max retries via ENV"
        );
        config.workflow.max_retries = retries;
    }
    Ok(())
}
