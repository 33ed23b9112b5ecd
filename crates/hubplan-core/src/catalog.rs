//! Cluster and hub catalog.
//!
//! The catalog is built once per run from the configuration tree and is
//! read-only afterwards.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Cloud provider a cluster runs on (e.g. `aws`, `gcp`, `azure`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct Provider(String);

impl Provider {
    /// Create a provider identifier. Surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "provider must not be empty".to_string(),
            ));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Deployment tier of a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Upgraded first; a canary for the prod hubs on the same cluster.
    Staging,
    /// Everything else.
    Prod,
}

impl Tier {
    /// Infer a tier from a hub name when the descriptor does not state one.
    /// Names containing `staging` (including `dask-staging`) are staging.
    pub fn infer_from_name(hub_name: &str) -> Self {
        if hub_name.contains("staging") {
            Tier::Staging
        } else {
            Tier::Prod
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Staging => write!(f, "staging"),
            Tier::Prod => write!(f, "prod"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staging" => Ok(Tier::Staging),
            "prod" | "production" => Ok(Tier::Prod),
            other => Err(Error::UnknownTier(other.to_string())),
        }
    }
}

/// A hub deployed on a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Hub name, unique within its cluster.
    pub name: String,
    /// Name of the hub's directory under the cluster directory.
    pub directory: String,
    /// Deployment tier.
    pub tier: Tier,
    /// Public domain of the hub, if configured.
    pub domain: Option<String>,
}

/// A cluster and the hubs deployed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Cluster name, unique across the catalog.
    pub name: String,
    /// Name of the cluster's directory under the clusters root.
    pub directory: String,
    /// Cloud provider.
    pub provider: Provider,
    /// Whether the support chart is deployed on this cluster.
    pub support_enabled: bool,
    /// Hubs, sorted by directory name.
    pub hubs: Vec<HubConfig>,
}

impl ClusterConfig {
    /// Look up a hub by its directory name.
    pub fn hub(&self, directory: &str) -> Option<&HubConfig> {
        self.hubs.iter().find(|h| h.directory == directory)
    }

    /// Hubs of the given tier, in catalog order.
    pub fn hubs_in_tier(&self, tier: Tier) -> impl Iterator<Item = &HubConfig> {
        self.hubs.iter().filter(move |h| h.tier == tier)
    }
}

/// Every cluster known to the configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub clusters: Vec<ClusterConfig>,
}

impl Catalog {
    pub fn new(clusters: Vec<ClusterConfig>) -> Self {
        Self { clusters }
    }

    /// Look up a cluster by its directory name.
    pub fn cluster(&self, directory: &str) -> Option<&ClusterConfig> {
        self.clusters.iter().find(|c| c.directory == directory)
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn hub_count(&self) -> usize {
        self.clusters.iter().map(|c| c.hubs.len()).sum()
    }
}
