// claimsguard/src/commands/report.rs
//
// USE CASE: Summarize a validation report, fresh or saved.

use anyhow::Context;
use comfy_table::{Table, presets::UTF8_FULL};
use std::path::Path;

use claimsguard_core::domain::report::{Issue, ValidationReport};
use claimsguard_core::infrastructure::adapters::load_report;

pub fn execute(path: &Path) -> anyhow::Result<bool> {
    let report = load_report(path)
        .with_context(|| format!("Failed to read validation report {:?}", path))?;
    print_report(&report);
    Ok(report.validation_passed)
}

/// One row per dataset, then the issues that need attention.
pub fn print_report(report: &ValidationReport) {
    println!(
        "\n📄 Workflow {} (generated {})",
        report.workflow_id,
        report.generated_at.to_rfc3339()
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Dataset", "Records", "Final", "Checks", "Critical", "Warnings", "Fixes",
    ]);
    for d in &report.datasets {
        let passed = d.outcomes.iter().filter(|o| o.passed).count();
        table.add_row(vec![
            d.dataset.to_string(),
            d.total_records.to_string(),
            d.final_records.to_string(),
            format!("{}/{}", passed, d.outcomes.len()),
            d.critical_errors.len().to_string(),
            d.warnings.len().to_string(),
            d.auto_fixes_applied.to_string(),
        ]);
    }
    println!("{table}");

    let s = &report.summary;
    println!(
        "   Checks: {} passed, {} failed | Critical: {} | Warnings: {} | Auto-fixes: {}",
        s.passed, s.failed, s.critical_errors, s.warnings, s.auto_fixes_applied
    );
    if let Some(severity) = report.worst_severity() {
        println!("   Worst open finding: {}", severity.as_str());
    }

    print_issues("❌ Critical errors", &report.critical_errors);
    print_issues("⚠️  Warnings", &report.warnings);

    if report.validation_passed {
        println!("\n✅ Validation PASSED");
    } else {
        println!("\n❌ Validation FAILED");
    }
}

fn print_issues(title: &str, issues: &[Issue]) {
    if issues.is_empty() {
        return;
    }
    println!("\n{}:", title);
    for issue in issues {
        let rule = issue.rule.map(|r| r.to_string()).unwrap_or_else(|| "-".into());
        println!(
            "   ➜ [{}] {}: {} ({} records, {:.2}%)",
            issue.dataset, rule, issue.message, issue.affected_records, issue.affected_percentage
        );
    }
}
