//! Command-line surface of the `schem` binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn schem(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("schem").unwrap();
    cmd.arg("--data-dir")
        .arg(dir.path().join("data"))
        .arg("--dir")
        .arg(dir.path());
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("schem")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("copyswapped"))
        .stdout(predicate::str::contains("addusers"));
}

#[test]
fn test_first_run_writes_config_and_asks_for_user() {
    let dir = TempDir::new().unwrap();
    schem(&dir)
        .arg("diagnose")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please set your user name"));
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_export_requires_known_round_or_puzzle() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        format!(
            "user = \"Alice\"\nsave_path = \"{}\"\n",
            dir.path().join("game").display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    schem(&dir)
        .args(["export", "Nowhere"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Searching for round containing Nowhere"));
}

#[test]
fn test_stats_requires_puzzle() {
    Command::cargo_bin("schem")
        .unwrap()
        .args(["stats"])
        .assert()
        .failure();
}
