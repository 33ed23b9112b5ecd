//! The decide command.

use std::path::PathBuf;

use anyhow::Result;
use hubplan_engine::{DecisionEngine, DecisionOptions};

use super::Repo;
use crate::output;

pub struct DecideArgs {
    pub pretty_print: bool,
    pub github_env: Option<PathBuf>,
    pub staging_guard: bool,
}

pub fn run(repo: &Repo, paths: &[String], args: DecideArgs) -> Result<()> {
    let layout = repo.load_layout()?;
    let catalog = repo.load_catalog(&layout)?;

    let paths = split_paths(paths);
    let decision = DecisionEngine::new(&catalog, &layout)
        .with_options(DecisionOptions {
            staging_guard: args.staging_guard,
        })
        .decide(paths.as_slice());

    if args.pretty_print {
        output::print_tables(&decision);
    }

    match &args.github_env {
        Some(path) => output::append_github_env(path, &decision)?,
        None => output::print_json(&decision)?,
    }

    Ok(())
}

/// Changed paths arrive from the workflow as space-separated strings.
fn split_paths(args: &[String]) -> Vec<&str> {
    args.iter().flat_map(|arg| arg.split_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paths() {
        let args = vec![
            "config/clusters/a/hub/values.yaml helm-charts/support/Chart.yaml".to_string(),
            "  deployer/main.py ".to_string(),
            String::new(),
        ];
        assert_eq!(
            split_paths(&args),
            vec![
                "config/clusters/a/hub/values.yaml",
                "helm-charts/support/Chart.yaml",
                "deployer/main.py",
            ]
        );
    }
}
