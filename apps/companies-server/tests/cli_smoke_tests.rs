#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the companies-server binary

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::timeout;

fn run_companies_server(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_companies-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute companies-server")
}

fn public_key() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/public.pem")
}

/// Writes a config with the fixture key plus `extra` YAML and returns its path.
fn write_config(dir: &TempDir, extra: &str) -> PathBuf {
    let path = dir.path().join("companies.yaml");
    let yaml = format!(
        "auth:\n  public_key_path: {}\n{extra}",
        public_key().display()
    );
    std::fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn help_lists_subcommands_and_options() {
    let output = run_companies_server(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--print-config"));
}

#[test]
fn version_names_the_binary() {
    let output = run_companies_server(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("companies-server"));
}

#[test]
fn check_accepts_a_complete_config() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");

    let output = run_companies_server(&["--config", config.to_str().unwrap(), "check"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Configuration is valid"));
}

#[test]
fn check_rejects_a_config_without_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("companies.yaml");
    std::fs::write(&path, "companies:\n  default_page_size: 10\n").unwrap();

    let output = run_companies_server(&["--config", path.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid auth section"));
}

#[test]
fn check_rejects_an_empty_policy_chain() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "policy:\n  objects:\n    company_delete: []\n");

    let output = run_companies_server(&["--config", config.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid policy section"));
}

#[test]
fn check_rejects_unknown_keys() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "server:\n  bind_adress: 127.0.0.1:1\n");

    let output = run_companies_server(&["--config", config.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
}

#[test]
fn missing_config_file_fails() {
    let output = run_companies_server(&["--config", "/nonexistent/companies.yaml", "check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("config file not found"));
}

#[test]
fn print_config_applies_cli_overrides() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");

    let output = run_companies_server(&[
        "--config",
        config.to_str().unwrap(),
        "--port",
        "9191",
        "-vv",
        "--print-config",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Effective configuration:"));
    assert!(stdout.contains("9191"));
    assert!(stdout.contains("debug"));
    assert!(stdout.contains("company_delete"));
}

#[test]
fn sample_config_is_valid() {
    let sample = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/companies.yaml");
    let output = Command::new(env!("CARGO_BIN_EXE_companies-server"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["--config", sample.to_str().unwrap(), "check"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[tokio::test]
async fn run_keeps_serving_until_stopped() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");

    let child = tokio::process::Command::new(env!("CARGO_BIN_EXE_companies-server"))
        .args(["--config", config.to_str().unwrap(), "--port", "0", "run"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .unwrap();

    // Still running when the timer fires means the server came up and stayed up.
    let outcome = timeout(Duration::from_secs(2), child.wait_with_output()).await;
    assert!(outcome.is_err(), "server exited early: {outcome:?}");
}
