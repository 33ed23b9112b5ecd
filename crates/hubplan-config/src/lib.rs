//! KDL configuration parsing for hubplan.
//!
//! This crate handles parsing of:
//! - The repository layout (hubplan.kdl)
//! - Cluster and hub descriptors (cluster.kdl, hub.kdl)
//! - Loading the full cluster catalog from the configuration tree

pub mod descriptor;
pub mod error;
pub mod layout;
pub mod loader;
mod nodes;

pub use error::{ConfigError, ConfigResult};
pub use layout::{
    CLUSTER_DESCRIPTOR, HUB_DESCRIPTOR, RepoLayout, SKIPPED_CLUSTER_DIRS, is_cluster_directory,
    load_layout, parse_layout,
};
pub use loader::load_catalog;
