use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "config/clusters/cloudbank/cluster.kdl",
        "cluster \"cloudbank\"\nprovider \"aws\"\nsupport\n",
    );
    write(root, "config/clusters/cloudbank/hub-charts-defaults.yaml", "{}\n");
    write(root, "config/clusters/cloudbank/alpha/hub.kdl", "tier \"staging\"\n");
    write(root, "config/clusters/cloudbank/beta/hub.kdl", "tier \"prod\"\n");
    write(root, "helm-charts/support/values.yaml", "{}\n");
    dir
}

fn hubplan(repo: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hubplan").unwrap();
    cmd.env_remove("GITHUB_ENV")
        .env_remove("HUBPLAN_LAYOUT")
        .env("RUST_LOG", "warn")
        .arg("--repo-root")
        .arg(repo);
    cmd
}

fn decide_json(repo: &Path, args: &[&str]) -> serde_json::Value {
    let output = hubplan(repo).arg("decide").args(args).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_decide_prints_json() {
    let repo = sample_repo();
    let value = decide_json(repo.path(), &["helm-charts/support/values.yaml"]);

    assert_eq!(
        value,
        serde_json::json!({
            "support_jobs": [{
                "provider": "aws",
                "cluster_name": "cloudbank",
                "hub_name": null,
                "reason_for_redeploy": "support chart changed",
            }],
            "staging_jobs": [],
            "prod_jobs": [],
        })
    );
}

#[test]
fn test_decide_accepts_space_delimited_paths() {
    let repo = sample_repo();
    let value = decide_json(
        repo.path(),
        &["config/clusters/cloudbank/alpha/values.yaml config/clusters/cloudbank/beta/values.yaml"],
    );

    assert_eq!(value["staging_jobs"].as_array().unwrap().len(), 1);
    assert_eq!(value["prod_jobs"].as_array().unwrap().len(), 1);
    assert_eq!(value["prod_jobs"][0]["hub_name"], "beta");
}

#[test]
fn test_staging_guard_flag() {
    let repo = sample_repo();
    let path = "config/clusters/cloudbank/beta/values.yaml";

    let guarded = decide_json(repo.path(), &[path]);
    assert_eq!(guarded["staging_jobs"][0]["hub_name"], "alpha");
    assert_eq!(
        guarded["staging_jobs"][0]["reason_for_redeploy"],
        "prod hubs require redeploy: beta"
    );

    let unguarded = decide_json(repo.path(), &["--no-staging-guard", path]);
    assert_eq!(unguarded["staging_jobs"], serde_json::json!([]));
}

#[test]
fn test_unknown_cluster_does_not_fail() {
    let repo = sample_repo();
    hubplan(repo.path())
        .args(["decide", "config/clusters/unknown-cluster/foo.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown-cluster"));
}

#[test]
fn test_decide_appends_github_env() {
    let repo = sample_repo();
    let env_file = repo.path().join("github_env");

    hubplan(repo.path())
        .args(["decide", "config/clusters/cloudbank/hub-charts-defaults.yaml"])
        .arg("--github-env")
        .arg(&env_file)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = fs::read_to_string(&env_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "support-matrix-jobs=[]");
    assert!(lines[1].starts_with("staging-hub-matrix-jobs="));
    assert!(lines[1].contains("hub chart defaults changed"));
    assert!(lines[2].starts_with("prod-hub-matrix-jobs="));
}

#[test]
fn test_pretty_print_goes_to_stderr() {
    let repo = sample_repo();
    hubplan(repo.path())
        .env("NO_COLOR", "1")
        .args(["decide", "--pretty-print", "helm-charts/support/values.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Support chart upgrades"))
        .stderr(predicate::str::contains("Prod hub upgrades"));
}

#[test]
fn test_custom_layout_file() {
    let repo = sample_repo();
    write(repo.path(), "hubplan.kdl", "support-chart \"charts/support\"\n");

    let value = decide_json(repo.path(), &["helm-charts/support/values.yaml"]);
    assert_eq!(value["support_jobs"], serde_json::json!([]));

    let value = decide_json(repo.path(), &["charts/support/values.yaml"]);
    assert_eq!(value["support_jobs"][0]["cluster_name"], "cloudbank");
}

#[test]
fn test_validate() {
    let repo = sample_repo();
    hubplan(repo.path())
        .env("NO_COLOR", "1")
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("cloudbank"))
        .stdout(predicate::str::contains("1 clusters, 2 hubs"));
}

#[test]
fn test_validate_fails_on_missing_descriptor() {
    let repo = sample_repo();
    write(repo.path(), "config/clusters/cloudbank/gamma/values.yaml", "{}\n");

    hubplan(repo.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("hub.kdl"));
}
