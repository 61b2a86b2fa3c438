// claimsguard/src/commands/rules.rs
//
// USE CASE: Show the rule catalog the validator would apply.

use comfy_table::{Table, presets::UTF8_FULL};
use std::path::PathBuf;

use claimsguard_core::domain::dataset::DatasetKind;
use claimsguard_core::domain::validation::RuleCatalog;
use claimsguard_core::infrastructure::config::load_project_config_or_default;

pub fn execute(project_dir: PathBuf, dataset: Option<DatasetKind>) -> anyhow::Result<()> {
    let config = load_project_config_or_default(&project_dir)?;
    let catalog = RuleCatalog::standard(&config.validation, &config.remediation);

    let datasets: Vec<DatasetKind> = match dataset {
        Some(d) => vec![d],
        None => DatasetKind::ALL.to_vec(),
    };

    for dataset in datasets {
        println!("\n📋 {}", dataset);
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Rule", "Category", "Severity", "Checks"]);
        for rule in catalog.rules_for(dataset) {
            let id = rule.id();
            table.add_row(vec![
                id.to_string(),
                id.category().as_str().to_string(),
                id.default_severity().as_str().to_string(),
                rule.describe(),
            ]);
        }
        println!("{table}");
    }
    Ok(())
}
