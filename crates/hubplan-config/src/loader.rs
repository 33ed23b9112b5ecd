//! Catalog loading from the configuration tree.
//!
//! ```text
//! config/clusters/
//!     cloudbank/
//!         cluster.kdl
//!         hub-charts-defaults.yaml
//!         alpha/
//!             hub.kdl
//!             values.yaml
//! ```
//!
//! Every directory under the clusters root is a cluster and every
//! directory under a cluster is a hub. A missing or malformed descriptor
//! anywhere aborts the load.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use hubplan_core::{Catalog, ClusterConfig, HubConfig, Tier};
use tracing::{debug, warn};

use crate::descriptor::{parse_cluster_descriptor, parse_hub_descriptor};
use crate::{CLUSTER_DESCRIPTOR, ConfigError, ConfigResult, HUB_DESCRIPTOR, is_cluster_directory};

/// Load every cluster under `clusters_root`, sorted by directory name.
pub fn load_catalog(clusters_root: &Path) -> ConfigResult<Catalog> {
    let mut clusters = Vec::new();
    let mut names = HashSet::new();

    for (dir_name, dir) in sorted_subdirectories(clusters_root)? {
        if !is_cluster_directory(&dir_name) {
            debug!(path = %dir.display(), "Skipping non-cluster directory");
            continue;
        }

        let cluster = load_cluster(&dir, dir_name)?;
        if !names.insert(cluster.name.clone()) {
            return Err(ConfigError::Duplicate(format!(
                "cluster name '{}'",
                cluster.name
            ))
            .in_file(dir.join(CLUSTER_DESCRIPTOR)));
        }
        debug!(cluster = %cluster.name, hubs = cluster.hubs.len(), "Loaded cluster");
        clusters.push(cluster);
    }

    Ok(Catalog::new(clusters))
}

fn load_cluster(dir: &Path, dir_name: String) -> ConfigResult<ClusterConfig> {
    let descriptor_path = dir.join(CLUSTER_DESCRIPTOR);
    let content = read_descriptor("cluster", &descriptor_path)?;
    let descriptor =
        parse_cluster_descriptor(&content).map_err(|e| e.in_file(&descriptor_path))?;

    let name = resolve_name(descriptor.name, &dir_name, &descriptor_path);

    let mut hubs: Vec<HubConfig> = Vec::new();
    for (hub_dir_name, hub_dir) in sorted_subdirectories(dir)? {
        let hub = load_hub(&hub_dir, hub_dir_name)?;
        if hubs.iter().any(|h| h.name == hub.name) {
            return Err(ConfigError::Duplicate(format!(
                "hub name '{}' in cluster '{}'",
                hub.name, name
            ))
            .in_file(hub_dir.join(HUB_DESCRIPTOR)));
        }
        hubs.push(hub);
    }

    Ok(ClusterConfig {
        name,
        directory: dir_name,
        provider: descriptor.provider,
        support_enabled: descriptor.support_enabled,
        hubs,
    })
}

fn load_hub(dir: &Path, dir_name: String) -> ConfigResult<HubConfig> {
    let descriptor_path = dir.join(HUB_DESCRIPTOR);
    let content = read_descriptor("hub", &descriptor_path)?;
    let descriptor = parse_hub_descriptor(&content).map_err(|e| e.in_file(&descriptor_path))?;

    let name = resolve_name(descriptor.name, &dir_name, &descriptor_path);
    let tier = descriptor
        .tier
        .unwrap_or_else(|| Tier::infer_from_name(&name));

    Ok(HubConfig {
        name,
        directory: dir_name,
        tier,
        domain: descriptor.domain,
    })
}

fn read_descriptor(kind: &'static str, path: &Path) -> ConfigResult<String> {
    if !path.is_file() {
        return Err(ConfigError::MissingDescriptor {
            kind,
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| ConfigError::from(e).in_file(path))
}

/// The declared name wins over the directory name. A mismatch only warns.
fn resolve_name(declared: Option<String>, dir_name: &str, descriptor_path: &Path) -> String {
    match declared {
        Some(name) => {
            if name != dir_name {
                warn!(
                    descriptor = %descriptor_path.display(),
                    declared = %name,
                    directory = %dir_name,
                    "Name mismatch: the declared name should match its directory"
                );
            }
            name
        }
        None => dir_name.to_string(),
    }
}

/// Subdirectories of `dir` sorted by name, skipping hidden ones.
fn sorted_subdirectories(dir: &Path) -> ConfigResult<Vec<(String, PathBuf)>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::from(e).in_file(dir))?;

    let mut result = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::from(e).in_file(dir))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry
            .file_name()
            .into_string()
            .map_err(|raw| ConfigError::InvalidValue {
                field: "directory name".to_string(),
                message: format!("{:?} is not valid UTF-8", raw),
            })?;
        if name.starts_with('.') {
            continue;
        }
        result.push((name, path));
    }

    result.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn sample_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "cloudbank/cluster.kdl", "cluster \"cloudbank\"\nprovider \"aws\"\nsupport\n");
        write(root, "cloudbank/hub-charts-defaults.yaml", "jupyterhub: {}\n");
        write(root, "cloudbank/beta/hub.kdl", "hub \"beta\"\ntier \"prod\"\n");
        write(root, "cloudbank/alpha/hub.kdl", "hub \"alpha\"\ntier \"staging\"\n");
        write(root, "cloudbank/alpha/values.yaml", "{}\n");
        write(root, "azure-east/cluster.kdl", "provider \"azure\"\n");
        write(root, "azure-east/dask-staging/hub.kdl", "");
        write(root, "azure-east/research/hub.kdl", "domain \"research.example.org\"\n");
        write(root, "templates/example/readme.md", "not a cluster\n");
        write(root, ".cache/cluster.kdl", "garbage {{{\n");
        write(root, "README.md", "clusters live here\n");
        dir
    }

    #[test]
    fn test_load_catalog_sorted() {
        let tree = sample_tree();
        let catalog = load_catalog(tree.path()).unwrap();

        let names: Vec<&str> = catalog.clusters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["azure-east", "cloudbank"]);

        let cloudbank = catalog.cluster("cloudbank").unwrap();
        assert!(cloudbank.support_enabled);
        assert_eq!(cloudbank.provider.as_str(), "aws");
        let hubs: Vec<(&str, Tier)> = cloudbank
            .hubs
            .iter()
            .map(|h| (h.name.as_str(), h.tier))
            .collect();
        assert_eq!(hubs, vec![("alpha", Tier::Staging), ("beta", Tier::Prod)]);
    }

    #[test]
    fn test_names_and_tiers_default_from_directories() {
        let tree = sample_tree();
        let catalog = load_catalog(tree.path()).unwrap();

        let azure = catalog.cluster("azure-east").unwrap();
        assert_eq!(azure.name, "azure-east");
        assert!(!azure.support_enabled);
        assert_eq!(azure.hub("dask-staging").unwrap().tier, Tier::Staging);
        let research = azure.hub("research").unwrap();
        assert_eq!(research.tier, Tier::Prod);
        assert_eq!(research.domain.as_deref(), Some("research.example.org"));
    }

    #[test]
    fn test_declared_names_win_over_directories() {
        let tree = sample_tree();
        write(
            tree.path(),
            "cb/cluster.kdl",
            "cluster \"cloudbank-prod\"\nprovider \"aws\"\n",
        );
        write(tree.path(), "cb/a/hub.kdl", "hub \"alpha-staging\"\n");

        let catalog = load_catalog(tree.path()).unwrap();
        let cluster = catalog.cluster("cb").unwrap();
        assert_eq!(cluster.name, "cloudbank-prod");
        assert_eq!(cluster.directory, "cb");

        let hub = cluster.hub("a").unwrap();
        assert_eq!(hub.name, "alpha-staging");
        assert_eq!(hub.directory, "a");
        assert_eq!(hub.tier, Tier::Staging);
        assert!(catalog.cluster("cloudbank-prod").is_none());
    }

    #[test]
    fn test_missing_cluster_descriptor_is_fatal() {
        let tree = sample_tree();
        write(tree.path(), "orphan/alpha/hub.kdl", "");

        let err = load_catalog(tree.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingDescriptor { kind: "cluster", .. }
        ));
    }

    #[test]
    fn test_missing_hub_descriptor_is_fatal() {
        let tree = sample_tree();
        write(tree.path(), "cloudbank/gamma/values.yaml", "{}\n");

        let err = load_catalog(tree.path()).unwrap_err();
        match err {
            ConfigError::MissingDescriptor { kind, path } => {
                assert_eq!(kind, "hub");
                assert!(path.ends_with("cloudbank/gamma/hub.kdl"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_hub_descriptor_names_the_file() {
        let tree = sample_tree();
        write(tree.path(), "cloudbank/beta/hub.kdl", "tier \"sometimes\"\n");

        let err = load_catalog(tree.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InFile { .. }));
        assert!(err.to_string().contains("beta"));
    }

    #[test]
    fn test_duplicate_cluster_names_are_rejected() {
        let tree = sample_tree();
        write(tree.path(), "cloudbank-old/cluster.kdl", "cluster \"cloudbank\"\nprovider \"aws\"\n");

        let err = load_catalog(tree.path()).unwrap_err();
        assert!(err.to_string().contains("duplicate definition"));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_catalog(&dir.path().join("does-not-exist"));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_root_gives_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = load_catalog(dir.path()).unwrap();
        assert!(catalog.is_empty());
    }
}
