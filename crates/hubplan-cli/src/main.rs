//! hubplan CLI tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "hubplan")]
#[command(about = "Decide which helm upgrades a change requires", long_about = None)]
struct Cli {
    /// Root of the infrastructure repository
    #[arg(long, global = true, env = "HUBPLAN_REPO_ROOT", default_value = ".")]
    repo_root: PathBuf,

    /// Repository layout file (defaults to hubplan.kdl in the repository root, if present)
    #[arg(long, global = true, env = "HUBPLAN_LAYOUT")]
    layout: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "HUBPLAN_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide the upgrades required by a set of changed paths
    Decide {
        /// Changed paths, relative to the repository root. Each argument
        /// may hold several space-separated paths.
        paths: Vec<String>,
        /// Also print summary tables to stderr
        #[arg(long)]
        pretty_print: bool,
        /// Append the job lists to this GitHub Actions environment file
        #[arg(long, env = "GITHUB_ENV")]
        github_env: Option<PathBuf>,
        /// Do not add staging upgrades ahead of prod upgrades
        #[arg(long)]
        no_staging_guard: bool,
    },
    /// Validate the cluster and hub configuration
    Validate,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let repo = commands::Repo {
        root: cli.repo_root,
        layout: cli.layout,
    };

    match cli.command {
        Commands::Decide {
            paths,
            pretty_print,
            github_env,
            no_staging_guard,
        } => {
            commands::decide::run(
                &repo,
                &paths,
                commands::decide::DecideArgs {
                    pretty_print,
                    github_env,
                    staging_guard: !no_staging_guard,
                },
            )?;
        }
        Commands::Validate => {
            commands::validate(&repo)?;
        }
    }

    Ok(())
}
