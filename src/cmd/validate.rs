//! Validate command - surface data quality issues without generating full reports

use super::DatasetArgs;
use crate::core::Warning;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    fingerprint: String,
    issue_count: usize,
    issues: Vec<Warning>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let dataset = self.dataset.load()?;
        let issues = dataset.warnings();
        log::debug!("{} validation issue(s)", issues.len());

        if self.json {
            let output = ValidationOutput {
                fingerprint: dataset.fingerprint(),
                issue_count: issues.len(),
                issues: issues.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print!("{}", format_text(&issues));
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn format_text(issues: &[Warning]) -> String {
    let mut out = String::from("\nVALIDATION RESULTS\n\n");
    if issues.is_empty() {
        out.push_str("\u{2713} No issues found.\n");
        return out;
    }

    out.push_str(&format!("\u{26A0} {} issue(s) found:\n\n", issues.len()));
    for (i, issue) in issues.iter().enumerate() {
        out.push_str(&format!("  {}. [{}]\n", i + 1, issue.kind()));
        out.push_str(&format!("     {}\n\n", issue.message()));
    }
    out
}
