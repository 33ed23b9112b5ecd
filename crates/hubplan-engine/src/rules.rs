//! Path classification rules.
//!
//! Each changed path is matched against [`RULES`] in order and the first
//! rule that matches decides its [`Implication`]. Rules only look at the
//! shape of the path; whether the named cluster or hub exists is decided
//! later against the catalog.

use std::sync::LazyLock;

use hubplan_config::{CLUSTER_DESCRIPTOR, RepoLayout, is_cluster_directory};
use hubplan_core::Reason;
use regex::Regex;
use tracing::trace;

/// Which clusters an implication applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every cluster in the catalog.
    AllClusters,
    /// The cluster with this directory name.
    Cluster(String),
}

/// What a single changed path implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Implication {
    /// Nothing deployment related.
    NoMatch,
    /// Upgrade the support chart.
    Support { scope: Scope, reason: Reason },
    /// Upgrade every hub.
    ClusterWideHubs { scope: Scope, reason: Reason },
    /// Upgrade one hub.
    SingleHub {
        cluster: String,
        hub: String,
        reason: Reason,
    },
    /// Upgrade the support chart and every hub of one cluster.
    WholeCluster { cluster: String, reason: Reason },
    /// A file in a cluster directory that triggers nothing by itself.
    ClusterFile { cluster: String },
}

/// A named matcher. Returns `None` when the rule does not apply.
pub struct Rule {
    pub name: &'static str,
    matcher: fn(&RepoLayout, &str) -> Option<Implication>,
}

impl Rule {
    pub fn matches(&self, layout: &RepoLayout, path: &str) -> Option<Implication> {
        (self.matcher)(layout, path)
    }
}

/// The rule table, in priority order.
pub static RULES: &[Rule] = &[
    Rule {
        name: "support-chart",
        matcher: support_chart,
    },
    Rule {
        name: "core-infrastructure",
        matcher: core_infrastructure,
    },
    Rule {
        name: "cluster-descriptor",
        matcher: cluster_descriptor,
    },
    Rule {
        name: "hub-defaults",
        matcher: hub_defaults,
    },
    Rule {
        name: "support-values",
        matcher: support_values,
    },
    Rule {
        name: "hub-directory",
        matcher: hub_directory,
    },
    Rule {
        name: "cluster-file",
        matcher: cluster_file,
    },
];

// Support values files in a cluster directory, e.g. `support.values.yaml`
// or `enc-support.secret.values.yaml`.
static SUPPORT_VALUES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(enc-)?support(\.[A-Za-z0-9_-]+)*\.values\.yaml$").unwrap()
});

/// Classify one normalized, repository-relative path.
pub fn classify(layout: &RepoLayout, path: &str) -> Implication {
    for rule in RULES {
        if let Some(implication) = rule.matches(layout, path) {
            trace!(path = %path, rule = rule.name, "Path matched rule");
            return implication;
        }
    }
    Implication::NoMatch
}

/// The part of `path` below directory `dir`, if any.
fn under<'a>(path: &'a str, dir: &str) -> Option<&'a str> {
    path.strip_prefix(dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
}

/// Split a path below the clusters root into (cluster directory, rest).
/// Directories the catalog loader skips, such as `templates`, are not
/// clusters.
fn in_cluster<'a>(layout: &RepoLayout, path: &'a str) -> Option<(&'a str, &'a str)> {
    under(path, &layout.clusters_root)?
        .split_once('/')
        .filter(|(cluster, rest)| is_cluster_directory(cluster) && !rest.is_empty())
}

/// A file directly inside a cluster directory: (cluster, file name).
fn cluster_level_file<'a>(layout: &RepoLayout, path: &'a str) -> Option<(&'a str, &'a str)> {
    in_cluster(layout, path).filter(|(_, rest)| !rest.contains('/'))
}

fn support_chart(layout: &RepoLayout, path: &str) -> Option<Implication> {
    under(path, &layout.support_chart).map(|_| Implication::Support {
        scope: Scope::AllClusters,
        reason: Reason::SupportChart,
    })
}

fn core_infrastructure(layout: &RepoLayout, path: &str) -> Option<Implication> {
    layout
        .core_paths
        .iter()
        .any(|dir| under(path, dir).is_some())
        .then_some(Implication::ClusterWideHubs {
            scope: Scope::AllClusters,
            reason: Reason::CoreInfrastructure,
        })
}

fn cluster_descriptor(layout: &RepoLayout, path: &str) -> Option<Implication> {
    cluster_level_file(layout, path)
        .filter(|(_, file)| *file == CLUSTER_DESCRIPTOR)
        .map(|(cluster, _)| Implication::WholeCluster {
            cluster: cluster.to_string(),
            reason: Reason::ClusterDescriptor,
        })
}

fn hub_defaults(layout: &RepoLayout, path: &str) -> Option<Implication> {
    cluster_level_file(layout, path)
        .filter(|(_, file)| *file == layout.hub_defaults)
        .map(|(cluster, _)| Implication::ClusterWideHubs {
            scope: Scope::Cluster(cluster.to_string()),
            reason: Reason::HubDefaults,
        })
}

fn support_values(layout: &RepoLayout, path: &str) -> Option<Implication> {
    cluster_level_file(layout, path)
        .filter(|(_, file)| SUPPORT_VALUES.is_match(file))
        .map(|(cluster, file)| Implication::Support {
            scope: Scope::Cluster(cluster.to_string()),
            reason: Reason::SupportValues {
                file: file.to_string(),
            },
        })
}

fn hub_directory(layout: &RepoLayout, path: &str) -> Option<Implication> {
    let (cluster, rest) = in_cluster(layout, path)?;
    let (hub, file) = rest.split_once('/')?;
    if hub.is_empty() || file.is_empty() {
        return None;
    }
    Some(Implication::SingleHub {
        cluster: cluster.to_string(),
        hub: hub.to_string(),
        reason: Reason::HubFile {
            file: file.to_string(),
        },
    })
}

fn cluster_file(layout: &RepoLayout, path: &str) -> Option<Implication> {
    cluster_level_file(layout, path).map(|(cluster, _)| Implication::ClusterFile {
        cluster: cluster.to_string(),
    })
}
