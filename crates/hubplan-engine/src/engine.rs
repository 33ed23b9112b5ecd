//! The decision engine.
//!
//! Classifies every changed path, resolves the implication against the
//! catalog and merges the result into three job lists. Jobs are keyed by
//! target so a second trigger for the same support chart or hub only adds
//! a reason. Lists come out sorted by cluster name, then hub name.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use hubplan_config::RepoLayout;
use hubplan_core::{Catalog, ClusterConfig, HubConfig, Reason, Tier, UpgradeJob};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::diagnostic::{Diagnostic, Reference, Severity};
use crate::rules::{Implication, Scope, classify};

/// Knobs for a decision run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOptions {
    /// When a cluster has prod hub upgrades but no staging hub upgrades,
    /// upgrade its staging hubs too so they can go first.
    pub staging_guard: bool,
}

impl Default for DecisionOptions {
    fn default() -> Self {
        Self {
            staging_guard: true,
        }
    }
}

/// The outcome of a run: three job lists plus what was noticed on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub support_jobs: Vec<UpgradeJob>,
    pub staging_jobs: Vec<UpgradeJob>,
    pub prod_jobs: Vec<UpgradeJob>,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl Decision {
    /// True when no upgrade is due.
    pub fn is_empty(&self) -> bool {
        self.job_count() == 0
    }

    pub fn job_count(&self) -> usize {
        self.support_jobs.len() + self.staging_jobs.len() + self.prod_jobs.len()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }
}

/// Decides upgrades against a fixed catalog and layout.
pub struct DecisionEngine<'a> {
    catalog: &'a Catalog,
    layout: &'a RepoLayout,
    options: DecisionOptions,
}

impl<'a> DecisionEngine<'a> {
    pub fn new(catalog: &'a Catalog, layout: &'a RepoLayout) -> Self {
        Self {
            catalog,
            layout,
            options: DecisionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecisionOptions) -> Self {
        self.options = options;
        self
    }

    /// Decide which upgrades the changed paths require.
    pub fn decide<S: AsRef<str>>(&self, changed_paths: &[S]) -> Decision {
        let paths = normalize_paths(changed_paths);
        let mut book = JobBook::default();
        let mut diagnostics = Vec::new();

        for path in &paths {
            let implication = classify(self.layout, path);
            self.apply(path, implication, &mut book, &mut diagnostics);
        }

        if self.options.staging_guard {
            book.guard_staging(self.catalog);
        }

        let decision = book.finish(diagnostics);
        info!(
            paths = paths.len(),
            support = decision.support_jobs.len(),
            staging = decision.staging_jobs.len(),
            prod = decision.prod_jobs.len(),
            "Decided upgrades"
        );
        decision
    }

    fn apply(
        &self,
        path: &str,
        implication: Implication,
        book: &mut JobBook,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        match implication {
            Implication::NoMatch => {
                debug!(path = %path, "Path is not related to any deployment");
                diagnostics.push(Diagnostic::UnrecognizedPath {
                    path: path.to_string(),
                });
            }
            Implication::Support {
                scope: Scope::AllClusters,
                reason,
            } => {
                for cluster in self.catalog.clusters.iter().filter(|c| c.support_enabled) {
                    book.add_support(cluster, reason.clone());
                }
            }
            Implication::Support {
                scope: Scope::Cluster(directory),
                reason,
            } => {
                let Some(cluster) = self.resolve_cluster(path, &directory, diagnostics) else {
                    return;
                };
                if cluster.support_enabled {
                    book.add_support(cluster, reason);
                } else {
                    info!(path = %path, cluster = %cluster.name, "Support chart is not enabled, ignoring");
                    diagnostics.push(Diagnostic::SupportNotEnabled {
                        path: path.to_string(),
                        cluster: cluster.name.clone(),
                    });
                }
            }
            Implication::ClusterWideHubs {
                scope: Scope::AllClusters,
                reason,
            } => {
                for cluster in &self.catalog.clusters {
                    book.add_all_hubs(cluster, &reason);
                }
            }
            Implication::ClusterWideHubs {
                scope: Scope::Cluster(directory),
                reason,
            } => {
                if let Some(cluster) = self.resolve_cluster(path, &directory, diagnostics) {
                    book.add_all_hubs(cluster, &reason);
                }
            }
            Implication::SingleHub {
                cluster,
                hub,
                reason,
            } => {
                let Some(cluster_config) = self.resolve_cluster(path, &cluster, diagnostics)
                else {
                    return;
                };
                match cluster_config.hub(&hub) {
                    Some(hub_config) => book.add_hub(cluster_config, hub_config, reason),
                    None => {
                        warn!(path = %path, cluster = %cluster, hub = %hub, "Path refers to a hub that is not in the catalog");
                        diagnostics.push(Diagnostic::UnresolvedReference {
                            path: path.to_string(),
                            reference: Reference::Hub { cluster, hub },
                        });
                    }
                }
            }
            Implication::WholeCluster { cluster, reason } => {
                if let Some(cluster) = self.resolve_cluster(path, &cluster, diagnostics) {
                    if cluster.support_enabled {
                        book.add_support(cluster, reason.clone());
                    }
                    book.add_all_hubs(cluster, &reason);
                }
            }
            Implication::ClusterFile { cluster } => {
                if self.resolve_cluster(path, &cluster, diagnostics).is_some() {
                    debug!(path = %path, "File in cluster directory triggers no upgrade");
                    diagnostics.push(Diagnostic::UnrecognizedPath {
                        path: path.to_string(),
                    });
                }
            }
        }
    }

    fn resolve_cluster(
        &self,
        path: &str,
        directory: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<&'a ClusterConfig> {
        let cluster = self.catalog.cluster(directory);
        if cluster.is_none() {
            warn!(path = %path, cluster = %directory, "Path refers to a cluster that is not in the catalog");
            diagnostics.push(Diagnostic::UnresolvedReference {
                path: path.to_string(),
                reference: Reference::Cluster {
                    cluster: directory.to_string(),
                },
            });
        }
        cluster
    }
}

/// Decide with default options.
pub fn decide<S: AsRef<str>>(
    catalog: &Catalog,
    layout: &RepoLayout,
    changed_paths: &[S],
) -> Decision {
    DecisionEngine::new(catalog, layout).decide(changed_paths)
}

/// Trim each path, drop a leading `./`, sort and dedup. Each entry is one
/// path and may contain spaces. Processing paths in sorted order makes
/// reasons, and therefore the whole output, independent of the order paths
/// were supplied in.
pub fn normalize_paths<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = paths
        .iter()
        .map(|p| p.as_ref().trim())
        .map(|p| p.strip_prefix("./").unwrap_or(p))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

#[derive(Default)]
struct JobBook {
    support: BTreeMap<String, UpgradeJob>,
    staging: BTreeMap<(String, String), UpgradeJob>,
    prod: BTreeMap<(String, String), UpgradeJob>,
}

impl JobBook {
    fn add_support(&mut self, cluster: &ClusterConfig, reason: Reason) {
        match self.support.entry(cluster.name.clone()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().add_reason(reason);
            }
            Entry::Vacant(entry) => {
                entry.insert(UpgradeJob::support(
                    cluster.provider.clone(),
                    cluster.name.clone(),
                    reason,
                ));
            }
        }
    }

    fn add_hub(&mut self, cluster: &ClusterConfig, hub: &HubConfig, reason: Reason) {
        let jobs = match hub.tier {
            Tier::Staging => &mut self.staging,
            Tier::Prod => &mut self.prod,
        };
        match jobs.entry((cluster.name.clone(), hub.name.clone())) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().add_reason(reason);
            }
            Entry::Vacant(entry) => {
                entry.insert(UpgradeJob::hub(
                    cluster.provider.clone(),
                    cluster.name.clone(),
                    hub.name.clone(),
                    reason,
                ));
            }
        }
    }

    fn add_all_hubs(&mut self, cluster: &ClusterConfig, reason: &Reason) {
        for hub in &cluster.hubs {
            self.add_hub(cluster, hub, reason.clone());
        }
    }

    /// Every cluster with prod hub jobs but no staging hub jobs gets a job
    /// for each of its staging hubs.
    fn guard_staging(&mut self, catalog: &Catalog) {
        let mut prod_hubs: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (cluster_name, hub_name) in self.prod.keys() {
            prod_hubs
                .entry(cluster_name.clone())
                .or_default()
                .push(hub_name.clone());
        }

        for (cluster_name, hubs) in prod_hubs {
            if self.staging.keys().any(|(c, _)| *c == cluster_name) {
                continue;
            }
            let Some(cluster) = catalog.clusters.iter().find(|c| c.name == cluster_name) else {
                continue;
            };
            let staging_hubs: Vec<&HubConfig> = cluster.hubs_in_tier(Tier::Staging).collect();
            if staging_hubs.is_empty() {
                debug!(cluster = %cluster_name, "No staging hub to upgrade ahead of prod");
                continue;
            }
            for hub in staging_hubs {
                debug!(cluster = %cluster_name, hub = %hub.name, "Adding staging upgrade ahead of prod");
                self.add_hub(
                    cluster,
                    hub,
                    Reason::ProdHubsPending {
                        hubs: hubs.clone(),
                    },
                );
            }
        }
    }

    fn finish(self, diagnostics: Vec<Diagnostic>) -> Decision {
        Decision {
            support_jobs: self.support.into_values().collect(),
            staging_jobs: self.staging.into_values().collect(),
            prod_jobs: self.prod.into_values().collect(),
            diagnostics,
        }
    }
}
