//! Non-fatal findings reported while deciding.

/// A cluster or hub named by a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Cluster { cluster: String },
    Hub { cluster: String, hub: String },
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reference::Cluster { cluster } => write!(f, "cluster '{}'", cluster),
            Reference::Hub { cluster, hub } => {
                write!(f, "hub '{}' on cluster '{}'", hub, cluster)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Notice,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Notice => write!(f, "notice"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A condition that is reported but never fails a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The path names a cluster or hub that is not in the catalog,
    /// e.g. a stale path after a rename.
    UnresolvedReference { path: String, reference: Reference },
    /// The path is not related to any deployment.
    UnrecognizedPath { path: String },
    /// Support values changed for a cluster that does not deploy the
    /// support chart.
    SupportNotEnabled { path: String, cluster: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::UnresolvedReference { .. } => Severity::Warning,
            Diagnostic::UnrecognizedPath { .. } | Diagnostic::SupportNotEnabled { .. } => {
                Severity::Notice
            }
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Diagnostic::UnresolvedReference { path, .. }
            | Diagnostic::UnrecognizedPath { path }
            | Diagnostic::SupportNotEnabled { path, .. } => path,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnresolvedReference { path, reference } => {
                write!(f, "{}: {} is not in the catalog", path, reference)
            }
            Diagnostic::UnrecognizedPath { path } => {
                write!(f, "{}: not related to any deployment", path)
            }
            Diagnostic::SupportNotEnabled { path, cluster } => write!(
                f,
                "{}: cluster '{}' does not deploy the support chart",
                path, cluster
            ),
        }
    }
}
