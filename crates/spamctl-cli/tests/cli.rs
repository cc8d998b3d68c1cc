//! Command-line smoke tests

use assert_cmd::Command;
use predicates::prelude::*;
use spamctl_core::Config;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Offline configuration: one local list, all state inside `dir`
fn write_config(dir: &Path, domains: &str) -> PathBuf {
    let list = dir.join("list.txt");
    std::fs::write(&list, domains).unwrap();

    let mut config = Config::default();
    config.domains.remote.clear();
    config.domains.files = vec![list];
    config.domains.snapshot = dir.join("domains");
    config.domains.private_snapshot = dir.join("private-domains");
    config.provider.store = dir.join("filters.json");

    let path = dir.join("spamctl.toml");
    std::fs::write(&path, config.to_toml().unwrap()).unwrap();
    path
}

fn spamctl(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("spamctl").unwrap();
    cmd.env_remove("RUST_LOG").arg("-c").arg(config);
    cmd
}

fn setup() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "a.com\nb.com\n\nrank-checker.online\n");
    spamctl(&config)
        .args(["accounts", "add", "12345"])
        .assert()
        .success();
    (dir, config)
}

#[test]
fn test_help() {
    Command::cargo_bin("spamctl")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("filters"))
        .stdout(predicate::str::contains("domains"));
}

#[test]
fn test_domains_update_and_list() {
    let (_dir, config) = setup();

    spamctl(&config)
        .args(["domains", "update", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+  a.com"))
        .stdout(predicate::str::contains("+  rank-checker.online"));

    spamctl(&config)
        .args(["domains", "list"])
        .assert()
        .success()
        .stdout("a.com\nb.com\nrank-checker.online\n");
}

#[test]
fn test_filters_update_converges() {
    let (_dir, config) = setup();

    spamctl(&config)
        .args(["filters", "show", "12345", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not-installed"));

    spamctl(&config)
        .args(["filters", "update", "12345", "--dry-run", "-q"])
        .assert()
        .success()
        .stdout("3\t0\t0\t0\n");

    spamctl(&config)
        .args(["filters", "update", "12345", "-q"])
        .assert()
        .success()
        .stdout("3\t0\t0\t0\n");

    spamctl(&config)
        .args(["filters", "update", "12345", "-q"])
        .assert()
        .success()
        .stdout("0\t0\t0\t3\n");

    spamctl(&config)
        .args(["filters", "show", "12345", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up-to-date\tReferrer Spam Block Segment A #001"))
        .stdout(predicate::str::contains("not-installed").not());

    spamctl(&config)
        .args(["filters", "show", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12345"))
        .stdout(predicate::str::contains("up-to-date"));

    spamctl(&config)
        .args(["filters", "remove", "12345", "-q"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_unknown_account_fails() {
    let (_dir, config) = setup();

    spamctl(&config)
        .args(["filters", "update", "999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("999"));
}

#[test]
fn test_config_generate_and_validate() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("generated.toml");

    Command::cargo_bin("spamctl")
        .unwrap()
        .args(["config", "generate", "-o"])
        .arg(&output)
        .assert()
        .success();

    Command::cargo_bin("spamctl")
        .unwrap()
        .args(["config", "generate", "-o"])
        .arg(&output)
        .assert()
        .failure();

    Command::cargo_bin("spamctl")
        .unwrap()
        .args(["config", "validate"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[filters]\nmax_expression_length = 1\n").unwrap();

    Command::cargo_bin("spamctl")
        .unwrap()
        .args(["config", "validate"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_expression_length"));
}

#[test]
fn test_completions() {
    Command::cargo_bin("spamctl")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("spamctl"));
}
