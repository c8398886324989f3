//! Integration tests for show-paths and completions.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_show_paths() {
    let env = TestEnv::new();

    env.command()
        .arg("show-paths")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "legacy config: {}",
            env.legacy.display()
        )))
        .stdout(predicate::str::contains(format!(
            "metadata: {}",
            env.metadata.display()
        )));
}

#[test]
fn test_show_paths_json() {
    let env = TestEnv::new();

    let output = env
        .command()
        .args(["--lock-timeout", "42", "show-paths", "--format", "json"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["v2"], env.v2.to_str().unwrap());
    assert_eq!(value["lock_timeout_seconds"], 42);
}

#[test]
fn test_show_paths_disabled_copy() {
    let env = TestEnv::new();
    env.command()
        .env("CFGTREE_LEGACY_CONFIG", "")
        .arg("show-paths")
        .assert()
        .success()
        .stdout(predicate::str::contains("legacy copy: (disabled)"));
}

#[test]
fn test_completions_bash() {
    let env = TestEnv::new();
    env.command()
        .args(["--quiet", "completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cfgtree"));
}
