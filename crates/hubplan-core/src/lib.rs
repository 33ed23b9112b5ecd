//! Core domain types for hubplan.
//!
//! This crate contains:
//! - The cluster/hub catalog loaded from the configuration tree
//! - Deployment tiers and cloud providers
//! - Upgrade jobs and the reasons that trigger them

pub mod catalog;
pub mod error;
pub mod job;

pub use catalog::{Catalog, ClusterConfig, HubConfig, Provider, Tier};
pub use error::{Error, Result};
pub use job::{Reason, Reasons, UpgradeJob};
