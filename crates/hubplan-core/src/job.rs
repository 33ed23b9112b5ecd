//! Upgrade jobs and the reasons that trigger them.

use serde::{Serialize, Serializer};

use crate::Provider;

/// Why a job was triggered. Each variant renders to a fixed display text;
/// two reasons are the same reason exactly when they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reason {
    /// The shared support chart changed.
    SupportChart,
    /// Deployer code, CI workflows or a shared hub chart changed.
    CoreInfrastructure,
    /// The cluster descriptor changed.
    ClusterDescriptor,
    /// The cluster-wide hub chart defaults changed.
    HubDefaults,
    /// A support values file of the cluster changed.
    SupportValues { file: String },
    /// A file in the hub's own directory changed (path relative to it).
    HubFile { file: String },
    /// Prod hubs on the cluster are being upgraded and this staging hub
    /// must go first.
    ProdHubsPending { hubs: Vec<String> },
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::SupportChart => write!(f, "support chart changed"),
            Reason::CoreInfrastructure => write!(f, "core infrastructure changed"),
            Reason::ClusterDescriptor => write!(f, "cluster descriptor changed"),
            Reason::HubDefaults => write!(f, "hub chart defaults changed"),
            Reason::SupportValues { file } => write!(f, "support values changed: {}", file),
            Reason::HubFile { file } => write!(f, "hub file changed: {}", file),
            Reason::ProdHubsPending { hubs } => {
                write!(f, "prod hubs require redeploy: {}", hubs.join(", "))
            }
        }
    }
}

/// Ordered, duplicate-free set of reasons. Rendered as one string joined
/// by `"; "` when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reasons(Vec<Reason>);

impl Reasons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reason unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, reason: Reason) -> bool {
        if self.0.contains(&reason) {
            return false;
        }
        self.0.push(reason);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reason> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Reason> for Reasons {
    fn from(reason: Reason) -> Self {
        Self(vec![reason])
    }
}

impl std::fmt::Display for Reasons {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, reason) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", reason)?;
        }
        Ok(())
    }
}

impl Serialize for Reasons {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single helm upgrade to perform: the support chart of a cluster when
/// `hub_name` is `None`, otherwise one hub on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradeJob {
    pub provider: Provider,
    pub cluster_name: String,
    pub hub_name: Option<String>,
    #[serde(rename = "reason_for_redeploy")]
    pub reasons: Reasons,
}

impl UpgradeJob {
    /// A support chart upgrade for a cluster.
    pub fn support(provider: Provider, cluster_name: impl Into<String>, reason: Reason) -> Self {
        Self {
            provider,
            cluster_name: cluster_name.into(),
            hub_name: None,
            reasons: reason.into(),
        }
    }

    /// An upgrade of one hub.
    pub fn hub(
        provider: Provider,
        cluster_name: impl Into<String>,
        hub_name: impl Into<String>,
        reason: Reason,
    ) -> Self {
        Self {
            provider,
            cluster_name: cluster_name.into(),
            hub_name: Some(hub_name.into()),
            reasons: reason.into(),
        }
    }

    /// Merge another trigger for the same target into this job.
    pub fn add_reason(&mut self, reason: Reason) -> bool {
        self.reasons.insert(reason)
    }

    /// The display text handed to the downstream runner.
    pub fn reason_for_redeploy(&self) -> String {
        self.reasons.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aws() -> Provider {
        Provider::new("aws").unwrap()
    }

    #[test]
    fn test_reasons_keep_insertion_order_and_dedup() {
        let mut job = UpgradeJob::hub(
            aws(),
            "cloudbank",
            "alpha",
            Reason::HubFile {
                file: "values.yaml".to_string(),
            },
        );
        assert!(job.add_reason(Reason::HubDefaults));
        assert!(!job.add_reason(Reason::HubFile {
            file: "values.yaml".to_string()
        }));
        assert!(job.add_reason(Reason::HubFile {
            file: "secret.values.yaml".to_string()
        }));

        assert_eq!(job.reasons.len(), 3);
        assert_eq!(
            job.reason_for_redeploy(),
            "hub file changed: values.yaml; hub chart defaults changed; \
             hub file changed: secret.values.yaml"
        );
    }

    #[test]
    fn test_similar_text_is_not_a_duplicate() {
        let mut reasons = Reasons::from(Reason::HubFile {
            file: "values.yaml".to_string(),
        });
        // A substring of an existing reason is still a distinct reason.
        assert!(reasons.insert(Reason::HubFile {
            file: "values".to_string()
        }));
        assert_eq!(reasons.len(), 2);
    }

    #[test]
    fn test_serialized_field_names() {
        let job = UpgradeJob::support(aws(), "cloudbank", Reason::SupportChart);
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "provider": "aws",
                "cluster_name": "cloudbank",
                "hub_name": null,
                "reason_for_redeploy": "support chart changed",
            })
        );
    }

    #[test]
    fn test_prod_hubs_pending_display() {
        let reason = Reason::ProdHubsPending {
            hubs: vec!["beta".to_string(), "gamma".to_string()],
        };
        assert_eq!(reason.to_string(), "prod hubs require redeploy: beta, gamma");
    }
}
