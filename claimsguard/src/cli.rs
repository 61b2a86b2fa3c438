// claimsguard/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use claimsguard_core::domain::dataset::DatasetKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "claimsguard")]
#[command(about = "Validation & auto-remediation engine for healthcare claims extracts", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🩺 Validates (and repairs) every dataset extracted for a workflow
    Validate {
        /// Workflow run whose extracts should be validated
        #[arg(long)]
        workflow_id: String,

        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Data directory, overrides the project configuration
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// 📋 Lists the rules each dataset is checked against
    Rules {
        /// Only show one dataset (members, medical_claims, pharmacy_claims, quality_measures)
        #[arg(long)]
        dataset: Option<DatasetKind>,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 📄 Summarizes a saved validation report
    Report {
        /// Path to a `<workflow_id>_validation_report.json` file
        path: PathBuf,
    },
}
