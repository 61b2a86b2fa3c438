// claimsguard/src/commands/validate.rs
//
// USE CASE: Run the validation stage for one workflow.

use anyhow::Context;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use claimsguard_core::application::{
    RetryPolicy, RunSettings, StageDecision, ValidationServices, WorkflowState,
    run_validation_stage,
};
use claimsguard_core::infrastructure::adapters::{
    DuckDbDatasetStore, JsonReportPublisher, load_report,
};
use claimsguard_core::infrastructure::config::load_project_config_or_default;
use claimsguard_core::infrastructure::progress::TracingProgress;

use super::report::print_report;

pub async fn execute(
    project_dir: PathBuf,
    workflow_id: String,
    data_dir: Option<String>,
) -> anyhow::Result<bool> {
    let start = std::time::Instant::now();

    // A. Load the Config (Infra)
    println!("⚙️  Loading configuration...");
    let mut config = load_project_config_or_default(&project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    println!("   Project: {} (v{})", config.name, config.version);

    // B. Instantiate the adapters
    let extracts = config.extracts_path(&project_dir);
    let store = DuckDbDatasetStore::new(&extracts)
        .with_context(|| format!("Failed to initialize DuckDB for {:?}", extracts))?;
    let publisher = JsonReportPublisher::new(config.reports_path(&project_dir));
    let progress = TracingProgress;
    println!("   Extracts: {}", extracts.display());

    // Ctrl-C stops datasets that have not started yet.
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });

    // C. Run the stage (Application Layer)
    let services = ValidationServices {
        store: &store,
        publisher: &publisher,
        progress: &progress,
    };
    let settings = RunSettings::from_config(&config, Local::now().date_naive());
    let mut state = WorkflowState::new(workflow_id);
    let decision = run_validation_stage(
        &mut state,
        &services,
        &settings,
        RetryPolicy::from(&config.workflow),
        &cancel,
    )
    .await;

    let Some(location) = state.reports_generated.last() else {
        eprintln!("\n💥 VALIDATION ERROR:");
        for error in &state.errors {
            eprintln!("   ➜ {}", error);
        }
        return Ok(false);
    };

    let report = load_report(Path::new(location))
        .with_context(|| format!("Failed to read back report {}", location))?;
    print_report(&report);
    println!("   Report: {}", location);

    match decision {
        StageDecision::Proceed => {
            println!("\n✨ Data ready for analysis ({:.2?})", start.elapsed());
            Ok(true)
        }
        StageDecision::Halt => {
            eprintln!(
                "\n❌ Workflow halted: {} critical errors",
                state.critical_errors.len()
            );
            Ok(false)
        }
    }
}
