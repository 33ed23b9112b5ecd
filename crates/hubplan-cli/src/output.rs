//! Output formatting: JSON job lists, GitHub Actions environment lines
//! and summary tables.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use hubplan_core::UpgradeJob;
use hubplan_engine::Decision;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Environment variable names the deploy workflow reads its matrices from.
const SUPPORT_MATRIX: &str = "support-matrix-jobs";
const STAGING_MATRIX: &str = "staging-hub-matrix-jobs";
const PROD_MATRIX: &str = "prod-hub-matrix-jobs";

#[derive(Tabled)]
struct SupportRow {
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

#[derive(Tabled)]
struct HubRow {
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Hub")]
    hub: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl From<&UpgradeJob> for SupportRow {
    fn from(job: &UpgradeJob) -> Self {
        Self {
            provider: job.provider.to_string(),
            cluster: job.cluster_name.clone(),
            reason: job.reason_for_redeploy(),
        }
    }
}

impl From<&UpgradeJob> for HubRow {
    fn from(job: &UpgradeJob) -> Self {
        Self {
            provider: job.provider.to_string(),
            cluster: job.cluster_name.clone(),
            hub: job.hub_name.clone().unwrap_or_default(),
            reason: job.reason_for_redeploy(),
        }
    }
}

/// Write the decision to stdout as one JSON object.
pub fn print_json(decision: &Decision) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(decision)?);
    Ok(())
}

/// The three `name=<json>` lines for a GitHub Actions environment file.
pub fn github_env_lines(decision: &Decision) -> Result<String> {
    let mut lines = String::new();
    for (name, jobs) in [
        (SUPPORT_MATRIX, &decision.support_jobs),
        (STAGING_MATRIX, &decision.staging_jobs),
        (PROD_MATRIX, &decision.prod_jobs),
    ] {
        lines.push_str(name);
        lines.push('=');
        lines.push_str(&serde_json::to_string(jobs)?);
        lines.push('\n');
    }
    Ok(lines)
}

/// Append the job lists to a GitHub Actions environment file.
pub fn append_github_env(path: &Path, decision: &Decision) -> Result<()> {
    let lines = github_env_lines(decision)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(lines.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Render the job lists and diagnostics as tables on stderr.
pub fn print_tables(decision: &Decision) {
    eprintln!("{}", render_tables(decision));
}

fn render_tables(decision: &Decision) -> String {
    let mut out = String::new();

    let support: Vec<SupportRow> = decision.support_jobs.iter().map(SupportRow::from).collect();
    push_section(&mut out, "Support chart upgrades", support);

    let staging: Vec<HubRow> = decision.staging_jobs.iter().map(HubRow::from).collect();
    push_section(&mut out, "Staging hub upgrades", staging);

    let prod: Vec<HubRow> = decision.prod_jobs.iter().map(HubRow::from).collect();
    push_section(&mut out, "Prod hub upgrades", prod);

    for diagnostic in decision.warnings() {
        out.push_str(&format!("{} {}\n", "⚠".yellow(), diagnostic));
    }

    out
}

fn push_section<T: Tabled>(out: &mut String, title: &str, rows: Vec<T>) {
    out.push_str(&format!("{}\n", title.bold()));
    if rows.is_empty() {
        out.push_str(&format!("{}\n\n", "No upgrades".dimmed()));
    } else {
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        out.push_str(&format!("{}\n\n", table));
    }
}
