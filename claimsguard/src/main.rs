// claimsguard/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing), on stderr so stdout stays readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // --- USE CASE: VALIDATE A WORKFLOW RUN ---
        Commands::Validate {
            workflow_id,
            project_dir,
            data_dir,
        } => {
            let passed = commands::validate::execute(project_dir, workflow_id, data_dir).await?;
            if !passed {
                // Exit with error code for CI/CD
                std::process::exit(1);
            }
        }

        // --- USE CASE: RULE CATALOG ---
        Commands::Rules {
            dataset,
            project_dir,
        } => commands::rules::execute(project_dir, dataset)?,

        // --- USE CASE: INSPECT A SAVED REPORT ---
        Commands::Report { path } => {
            let passed = commands::report::execute(&path)?;
            if !passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
