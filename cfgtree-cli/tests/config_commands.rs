//! Integration tests for get, set, unset and edition.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_set_then_get() {
    let env = TestEnv::new();

    env.command()
        .args(["set", "clientOptions.cli.edition", "tkg"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Set clientOptions.cli.edition = tkg"));

    env.command()
        .args(["get", "clientOptions.cli.edition"])
        .assert()
        .success()
        .stdout("tkg\n");

    assert!(env.read(&env.legacy).contains("edition: tkg"));
    assert!(env.read(&env.copy).contains("edition: tkg"));
}

#[test]
fn test_get_subtree_as_json() {
    let env = TestEnv::new();
    env.write(
        &env.legacy,
        "clientOptions:\n  cli:\n    edition: tkg\n    retries: 3\n",
    );

    let output = env
        .command()
        .args(["get", "clientOptions", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["cli"]["edition"], "tkg");
    assert_eq!(value["cli"]["retries"], 3);
}

#[test]
fn test_get_whole_config_merges_stores() {
    let env = TestEnv::new();
    env.write(&env.legacy, "kind: ClientConfig\ncurrentContext:\n  k8s: old\n");
    env.write(&env.v2, "currentContext:\n  k8s: new\n");

    env.command()
        .arg("get")
        .assert()
        .success()
        .stdout("currentContext:\n  k8s: new\nkind: ClientConfig\n");
}

#[test]
fn test_set_migrated_item_lands_in_v2() {
    let env = TestEnv::new();

    env.command()
        .args(["set", "currentContext.k8s", "mgmt"])
        .assert()
        .success();

    assert_eq!(
        env.read(&env.v2),
        "contexts: []\ncurrentContext:\n  k8s: mgmt\n"
    );
    assert!(!env.read(&env.legacy).contains("mgmt"));
}

#[test]
fn test_get_missing_key_exits_1() {
    let env = TestEnv::new();

    env.command()
        .args(["get", "clientOptions.cli.edition"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_unset() {
    let env = TestEnv::new();
    env.write(&env.legacy, "clientOptions:\n  cli:\n    edition: tkg\n    bomRepo: repo\n");

    env.command()
        .args(["unset", "clientOptions.cli.edition"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed"));
    env.command()
        .args(["unset", "clientOptions.cli.edition"])
        .assert()
        .success()
        .stderr(predicate::str::contains("is not set"));

    assert_eq!(
        env.read(&env.legacy),
        "clientOptions:\n  cli:\n    bomRepo: repo\ncontexts: []\ncurrentContext: {}\n"
    );
}

#[test]
fn test_empty_path_is_invalid() {
    let env = TestEnv::new();
    env.command().args(["set", "", "x"]).assert().code(4);
    env.command().args(["unset", "..."]).assert().code(4);
}

#[test]
fn test_edition() {
    let env = TestEnv::new();

    env.command().arg("edition").assert().code(1);
    env.command()
        .args(["edition", "tce"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Edition set to tce"));
    env.command().arg("edition").assert().success().stdout("tce\n");

    // Unchanged value is silent
    env.command()
        .args(["edition", "tce"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_quiet_suppresses_status() {
    let env = TestEnv::new();
    env.command()
        .args(["--quiet", "set", "kind", "ClientConfig"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
