//! Integration tests for the `portsec` CLI binary.
//!
//! Everything here runs against the built-in mock switch; no network access
//! and no user configuration is touched.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `portsec` binary with env isolation.
///
/// Clears `PORTSEC_*` overrides and points the config file into `dir`.
fn portsec_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("portsec");
    cmd.env("PORTSEC_CONFIG", dir.path().join("config.toml"))
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("PORTSEC_PROFILE")
        .env_remove("PORTSEC_MODE")
        .env_remove("PORTSEC_ADDRESS")
        .env_remove("PORTSEC_USERNAME")
        .env_remove("PORTSEC_PASSWORD")
        .env_remove("PORTSEC_TIMEOUT")
        .env_remove("PORTSEC_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    let output = portsec_cmd(&dir).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    portsec_cmd(&dir).arg("--help").assert().success().stdout(
        predicate::str::contains("port security")
            .and(predicate::str::contains("enable"))
            .and(predicate::str::contains("interfaces"))
            .and(predicate::str::contains("shell")),
    );
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    portsec_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("portsec "));
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    portsec_cmd(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("portsec"));
}

// ── Mock switch commands ────────────────────────────────────────────

#[test]
fn test_interfaces_plain() {
    let dir = TempDir::new().unwrap();
    portsec_cmd(&dir)
        .args(["interfaces", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gi0/1").and(predicate::str::contains("Gi0/5")));
}

#[test]
fn test_interfaces_json() {
    let dir = TempDir::new().unwrap();
    let output = portsec_cmd(&dir)
        .args(["interfaces", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 5);
    assert_eq!(rows[0]["interface"], "Gi0/1");
}

#[test]
fn test_enable_reports_summary() {
    let dir = TempDir::new().unwrap();
    portsec_cmd(&dir)
        .args(["enable", "Gi0/1", "-n", "5", "--violation", "restrict"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Port security enabled on Gi0/1 with max MAC addresses: 5, violation action: restrict",
        ));
}

#[test]
fn test_enable_json_result() {
    let dir = TempDir::new().unwrap();
    let output = portsec_cmd(&dir)
        .args(["enable", "Gi0/2", "-o", "json-compact"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["success"], true);
}

#[test]
fn test_enable_zero_max_fails() {
    let dir = TempDir::new().unwrap();
    portsec_cmd(&dir)
        .args(["enable", "Gi0/1", "--max-mac", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_mac"));
}

#[test]
fn test_show_log_prints_session_entries() {
    let dir = TempDir::new().unwrap();
    portsec_cmd(&dir)
        .args(["--show-log", "--color", "never", "clear", "Gi0/4"])
        .assert()
        .success()
        .stderr(
            predicate::str::contains("Connected to mock switch")
                .and(predicate::str::contains("Cleared port security on Gi0/4")),
        );
}

#[test]
fn test_real_mode_unreachable_exits_with_connection_code() {
    let dir = TempDir::new().unwrap();
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let address = format!("127.0.0.1:{port}");
    let output = portsec_cmd(&dir)
        .args(["--mode", "real", "--address", address.as_str(), "--timeout", "2", "info"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_zero_timeout_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = portsec_cmd(&dir)
        .args(["--timeout", "0", "interfaces"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_env() {
    let dir = TempDir::new().unwrap();
    portsec_cmd(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    portsec_cmd(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join("config.toml").exists());

    let output = portsec_cmd(&dir).args(["config", "init"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));

    portsec_cmd(&dir)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_show_redacts_password() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "default_profile = \"lab\"\n\n[profiles.lab]\nmode = \"mock\"\npassword = \"hunter2\"\n",
    )
    .unwrap();
    portsec_cmd(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[profiles.lab]").and(predicate::str::contains("hunter2").not()));
}

#[test]
fn test_unknown_profile_exit_code() {
    let dir = TempDir::new().unwrap();
    let output = portsec_cmd(&dir)
        .args(["--profile", "nope", "interfaces"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

// ── Shell ───────────────────────────────────────────────────────────

#[test]
fn test_shell_keeps_one_session() {
    let dir = TempDir::new().unwrap();
    portsec_cmd(&dir)
        .arg("shell")
        .write_stdin("connect\nenable Gi0/1 5 restrict\nstatus Gi0/1\nstate\nquit\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Connected to mock switch")
                .and(predicate::str::contains("violation action: restrict"))
                .and(predicate::str::contains("Restrict"))
                .and(predicate::str::contains("connected")),
        );
}

#[test]
fn test_shell_reports_errors_and_continues() {
    let dir = TempDir::new().unwrap();
    portsec_cmd(&dir)
        .arg("shell")
        .write_stdin("interfaces\nstatus Gi0/1\nbogus\nconnect\ninterfaces\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gi0/3"))
        .stderr(
            predicate::str::contains("Not connected to switch")
                .and(predicate::str::contains("unknown command 'bogus'")),
        );
}
