//! CLI command implementations.

pub mod decide;

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::*;
use hubplan_config::{RepoLayout, load_catalog, load_layout};
use hubplan_core::{Catalog, Tier};
use tracing::debug;

/// Layout file looked up in the repository root when none is given.
const DEFAULT_LAYOUT_FILE: &str = "hubplan.kdl";

/// The infrastructure repository the commands operate on.
pub struct Repo {
    pub root: PathBuf,
    pub layout: Option<PathBuf>,
}

impl Repo {
    pub fn load_layout(&self) -> Result<RepoLayout> {
        let path = match &self.layout {
            Some(path) => path.clone(),
            None => {
                let candidate = self.root.join(DEFAULT_LAYOUT_FILE);
                if !candidate.is_file() {
                    debug!("No layout file, using the default layout");
                    return Ok(RepoLayout::default());
                }
                candidate
            }
        };
        debug!(path = %path.display(), "Loading layout");
        load_layout(&path).with_context(|| format!("Failed to load layout {}", path.display()))
    }

    pub fn load_catalog(&self, layout: &RepoLayout) -> Result<Catalog> {
        let clusters_root = self.root.join(&layout.clusters_root);
        load_catalog(&clusters_root)
            .with_context(|| format!("Failed to load clusters from {}", clusters_root.display()))
    }
}

pub fn validate(repo: &Repo) -> Result<()> {
    let layout = repo.load_layout()?;
    let catalog = repo.load_catalog(&layout)?;

    for cluster in &catalog.clusters {
        let support = if cluster.support_enabled {
            "support".green()
        } else {
            "no support".dimmed()
        };
        println!(
            "{} ({}, {}): {} staging, {} prod",
            cluster.name.bold(),
            cluster.provider,
            support,
            cluster.hubs_in_tier(Tier::Staging).count(),
            cluster.hubs_in_tier(Tier::Prod).count(),
        );
    }
    println!(
        "{} Configuration is valid: {} clusters, {} hubs",
        "✓".green(),
        catalog.clusters.len(),
        catalog.hub_count()
    );
    Ok(())
}
