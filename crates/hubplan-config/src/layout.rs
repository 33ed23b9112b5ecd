//! Repository layout configuration.
//!
//! The layout names every location the decision rules look at. It has
//! sensible defaults and can be overridden by a `hubplan.kdl` file:
//!
//! ```kdl
//! clusters-root "config/clusters"
//! support-chart "helm-charts/support"
//! hub-defaults "hub-charts-defaults.yaml"
//! core-path "deployer"
//! core-path ".github/workflows"
//! ```

use std::path::Path;

use kdl::KdlDocument;
use serde::{Deserialize, Serialize};

use crate::nodes::{normalize_location, required_string_arg, set_once};
use crate::{ConfigError, ConfigResult};

/// File name of the descriptor inside every cluster directory.
pub const CLUSTER_DESCRIPTOR: &str = "cluster.kdl";

/// File name of the descriptor inside every hub directory.
pub const HUB_DESCRIPTOR: &str = "hub.kdl";

/// Directories under the clusters root that are not clusters.
pub const SKIPPED_CLUSTER_DIRS: &[&str] = &["templates"];

/// Whether a directory name under the clusters root names a cluster.
/// Hidden directories and [`SKIPPED_CLUSTER_DIRS`] do not.
pub fn is_cluster_directory(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !SKIPPED_CLUSTER_DIRS.contains(&name)
}

/// Where things live in the infrastructure repository. All locations are
/// relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoLayout {
    /// Directory holding one subdirectory per cluster.
    pub clusters_root: String,
    /// The shared support chart.
    pub support_chart: String,
    /// File inside a cluster directory holding values shared by all its hubs.
    pub hub_defaults: String,
    /// Core infrastructure; any change here redeploys every hub.
    pub core_paths: Vec<String>,
}

impl Default for RepoLayout {
    fn default() -> Self {
        Self {
            clusters_root: "config/clusters".to_string(),
            support_chart: "helm-charts/support".to_string(),
            hub_defaults: "hub-charts-defaults.yaml".to_string(),
            core_paths: vec![
                "deployer".to_string(),
                ".github/workflows".to_string(),
                "helm-charts/basehub".to_string(),
                "helm-charts/daskhub".to_string(),
            ],
        }
    }
}

/// Parse a layout from KDL text. Settings that are not given keep their
/// defaults; `core-path` nodes replace the default list as a whole.
pub fn parse_layout(kdl: &str) -> ConfigResult<RepoLayout> {
    let doc: KdlDocument = kdl.parse()?;
    let defaults = RepoLayout::default();

    let mut clusters_root = None;
    let mut support_chart = None;
    let mut hub_defaults = None;
    let mut core_paths = Vec::new();

    for node in doc.nodes() {
        match node.name().value() {
            "clusters-root" => {
                let value = normalize_location("clusters-root", &required_string_arg(node)?)?;
                set_once(&mut clusters_root, node, value)?;
            }
            "support-chart" => {
                let value = normalize_location("support-chart", &required_string_arg(node)?)?;
                set_once(&mut support_chart, node, value)?;
            }
            "hub-defaults" => {
                let value = required_string_arg(node)?;
                if value.contains('/') {
                    return Err(ConfigError::InvalidValue {
                        field: "hub-defaults".to_string(),
                        message: "must be a file name inside the cluster directory".to_string(),
                    });
                }
                set_once(&mut hub_defaults, node, value)?;
            }
            "core-path" => {
                let value = normalize_location("core-path", &required_string_arg(node)?)?;
                if !core_paths.contains(&value) {
                    core_paths.push(value);
                }
            }
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(RepoLayout {
        clusters_root: clusters_root.unwrap_or(defaults.clusters_root),
        support_chart: support_chart.unwrap_or(defaults.support_chart),
        hub_defaults: hub_defaults.unwrap_or(defaults.hub_defaults),
        core_paths: if core_paths.is_empty() {
            defaults.core_paths
        } else {
            core_paths
        },
    })
}

/// Read and parse a layout file.
pub fn load_layout(path: &Path) -> ConfigResult<RepoLayout> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::from(e).in_file(path))?;
    parse_layout(&content).map_err(|e| e.in_file(path))
}
