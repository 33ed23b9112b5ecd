//! Cluster and hub descriptor parsing.
//!
//! A cluster descriptor (`cluster.kdl`):
//!
//! ```kdl
//! cluster "cloudbank"
//! provider "aws"
//! support
//! ```
//!
//! A hub descriptor (`hub.kdl`):
//!
//! ```kdl
//! hub "alpha"
//! tier "staging"
//! domain "alpha.cloudbank.example.org"
//! ```

use hubplan_core::{Provider, Tier};
use kdl::KdlDocument;

use crate::nodes::{required_string_arg, set_once};
use crate::{ConfigError, ConfigResult};

/// Contents of a `cluster.kdl` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterDescriptor {
    /// Explicit cluster name; the directory name is used when absent.
    pub name: Option<String>,
    pub provider: Provider,
    /// Set by the presence of a `support` node.
    pub support_enabled: bool,
}

/// Contents of a `hub.kdl` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubDescriptor {
    /// Explicit hub name; the directory name is used when absent.
    pub name: Option<String>,
    /// Explicit tier; inferred from the hub name when absent.
    pub tier: Option<Tier>,
    pub domain: Option<String>,
}

/// Parse a cluster descriptor from KDL text.
pub fn parse_cluster_descriptor(kdl: &str) -> ConfigResult<ClusterDescriptor> {
    let doc: KdlDocument = kdl.parse()?;

    let mut name = None;
    let mut provider = None;
    let mut support = None;

    for node in doc.nodes() {
        match node.name().value() {
            "cluster" => {
                let value = required_string_arg(node)?;
                set_once(&mut name, node, value)?;
            }
            "provider" => {
                let value = Provider::new(required_string_arg(node)?)?;
                set_once(&mut provider, node, value)?;
            }
            "support" => {
                // Chart settings may live in a child block; only presence matters here.
                set_once(&mut support, node, ())?;
            }
            _ => {} // Ignore unknown nodes
        }
    }

    let provider = provider.ok_or_else(|| ConfigError::MissingField("provider".to_string()))?;

    Ok(ClusterDescriptor {
        name,
        provider,
        support_enabled: support.is_some(),
    })
}

/// Parse a hub descriptor from KDL text.
pub fn parse_hub_descriptor(kdl: &str) -> ConfigResult<HubDescriptor> {
    let doc: KdlDocument = kdl.parse()?;

    let mut name = None;
    let mut tier = None;
    let mut domain = None;

    for node in doc.nodes() {
        match node.name().value() {
            "hub" => {
                let value = required_string_arg(node)?;
                set_once(&mut name, node, value)?;
            }
            "tier" => {
                let value: Tier = required_string_arg(node)?.parse()?;
                set_once(&mut tier, node, value)?;
            }
            "domain" => {
                let value = required_string_arg(node)?;
                set_once(&mut domain, node, value)?;
            }
            _ => {}
        }
    }

    Ok(HubDescriptor { name, tier, domain })
}
