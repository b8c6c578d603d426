//! Tests for the `hooks` command and its subcommands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn hookhost() -> Command {
    let mut cmd = Command::cargo_bin("hookhost").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("HOOKHOST_AGENT_HOOK_DIRECTORY")
        .env_remove("HOOKHOST_SERVER_HOOK_DIRECTORY");
    cmd
}

/// Test that hooks command requires a subcommand.
#[test]
fn test_hooks_requires_subcommand() {
    let mut cmd = hookhost();
    cmd.arg("hooks");

    cmd.assert().failure().code(2);
}

/// Test that the program is required.
#[test]
fn test_hooks_list_requires_program() {
    let mut cmd = hookhost();
    cmd.arg("hooks").arg("list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("required"))
        .stderr(predicate::str::contains("--program"));
}

/// Test that an unknown program is rejected.
#[test]
fn test_hooks_list_invalid_program() {
    let mut cmd = hookhost();
    cmd.args(["hooks", "list", "--program", "database"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

/// Test listing an empty hook directory.
#[test]
fn test_hooks_list_empty_directory() {
    let dir = TempDir::new().unwrap();

    let mut cmd = hookhost();
    cmd.args(["hooks", "list", "--program", "agent", "--directory"])
        .arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No hooks found."));
}

/// Test that a missing hook directory is reported.
#[test]
fn test_hooks_list_missing_directory() {
    let mut cmd = hookhost();
    cmd.args([
        "hooks",
        "list",
        "--program",
        "server",
        "--directory",
        "/nonexistent/hooks",
    ]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot find hook library paths in"));
}

/// Test that a file that is not a library is listed as unloadable.
#[test]
fn test_hooks_list_reports_unloadable_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("readme.txt"), "not a hook").unwrap();

    let mut cmd = hookhost();
    cmd.args(["hooks", "list", "--program", "agent", "--directory"])
        .arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("readme [unloadable]"))
        .stdout(predicate::str::contains("Total: 1 entries, 0 compatible"));
}

/// Test the JSON report.
#[test]
fn test_hooks_list_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("readme.txt"), "not a hook").unwrap();

    let mut cmd = hookhost();
    cmd.args(["hooks", "list", "--program", "agent", "--json", "--directory"])
        .arg(dir.path());

    let output = cmd.assert().success().get_output().stdout.clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(report[0]["name"], "readme");
    assert_eq!(report[0]["status"]["status"], "unloadable");
}

/// Test settings of an empty hook directory.
#[test]
fn test_hooks_settings_empty_directory() {
    let dir = TempDir::new().unwrap();

    let mut cmd = hookhost();
    cmd.args(["hooks", "settings", "--program", "agent", "--resolved", "--directory"])
        .arg(dir.path());

    cmd.assert().success().stdout(predicate::str::contains("{}"));
}

/// Test a dry run over an empty hook directory.
#[test]
fn test_hooks_load_empty_directory() {
    let dir = TempDir::new().unwrap();

    let mut cmd = hookhost();
    cmd.args(["hooks", "load", "--program", "server", "--directory"])
        .arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Loaded 0 hook(s) for hookhost-server"))
        .stdout(predicate::str::contains("before_forward_to_agent"));
}

/// Test that one unloadable file blocks the whole dry run.
#[test]
fn test_hooks_load_fails_closed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.so"), "not a hook").unwrap();

    let mut cmd = hookhost();
    cmd.args(["hooks", "load", "--program", "agent", "--directory"])
        .arg(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot open hook library"));
}

/// Test that settings for a hook that is not installed are rejected.
#[test]
fn test_hooks_load_rejects_settings_of_missing_hook() {
    let dir = TempDir::new().unwrap();
    let hooks_dir = dir.path().join("hooks");
    fs::create_dir(&hooks_dir).unwrap();

    let config = dir.path().join("hookhost.toml");
    fs::write(
        &config,
        format!(
            "[hooks]\ndirectory = {:?}\n\n[hooks.settings.audit]\nendpoint = \"http://audit.local\"\n",
            hooks_dir.display().to_string()
        ),
    )
    .unwrap();

    let mut cmd = hookhost();
    cmd.args(["hooks", "load", "--program", "agent", "--config"])
        .arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid settings for hook audit"));
}

/// Test that a broken configuration file is reported.
#[test]
fn test_hooks_load_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("hookhost.toml");
    fs::write(&config, "[hooks\n").unwrap();

    let mut cmd = hookhost();
    cmd.args(["hooks", "load", "--program", "agent", "--config"])
        .arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
