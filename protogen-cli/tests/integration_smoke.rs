//! Smoke tests to verify command wiring

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use protogen_core::{FormInputs, MockGenerator, ProtocolGenerator, ProtocolReport};
use tempfile::TempDir;

/// Config with short timings so headless runs finish quickly
fn fast_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    fs::write(
        &path,
        r#"
[timings]
submit_delay_ms = 10
card_delay_min_ms = 5
card_delay_max_ms = 10
"#,
    )
    .unwrap();
    path
}

fn protogen(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("protogen").unwrap();
    cmd.env("PROTOGEN_CONFIG", config).env("PROTOGEN_QUIET", "1");
    cmd
}

// === Help ===

#[test]
fn test_generate_help() {
    let mut cmd = Command::cargo_bin("protogen").unwrap();
    cmd.arg("generate").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--disease-area"))
        .stdout(predicate::str::contains("--study-type"));
}

#[test]
fn test_config_help() {
    let mut cmd = Command::cargo_bin("protogen").unwrap();
    cmd.arg("config").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = Command::cargo_bin("protogen").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("protogen"));
}

// === Generate ===

#[test]
fn test_generate_rejects_incomplete_form() {
    let tmp = TempDir::new().unwrap();
    let config = fast_config(tmp.path());

    protogen(&config)
        .args(["generate", "--title", "T", "--objective", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required field(s)"))
        .stderr(predicate::str::contains("Study Objective"));
}

#[tokio::test]
async fn test_generate_stdout_is_exactly_the_report() {
    let tmp = TempDir::new().unwrap();
    let config = fast_config(tmp.path());

    let inputs = FormInputs::new("T", "O", "Oncology", "Phase II Clinical Trial");
    let generated = MockGenerator::new().generate(&inputs).await.unwrap();
    let expected = ProtocolReport::new(&inputs, Some(&generated)).render();

    protogen(&config)
        .args([
            "generate",
            "--title",
            "T",
            "--objective",
            "O",
            "--disease-area",
            "Oncology",
            "--study-type",
            "Phase II Clinical Trial",
            "--stdout",
            "--sections",
        ])
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn test_generate_stdout_conflicts_with_json() {
    let tmp = TempDir::new().unwrap();
    let config = fast_config(tmp.path());

    protogen(&config)
        .args([
            "generate",
            "--title",
            "T",
            "--objective",
            "O",
            "--disease-area",
            "Oncology",
            "--study-type",
            "Phase II Clinical Trial",
            "--stdout",
            "--json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_generate_writes_report_file() {
    let tmp = TempDir::new().unwrap();
    let config = fast_config(tmp.path());
    let out = tmp.path().join("out");

    protogen(&config)
        .args([
            "generate",
            "--title",
            "T",
            "--objective",
            "O",
            "--disease-area",
            "Oncology",
            "--study-type",
            "Phase II Clinical Trial",
            "--sections",
            "--out",
        ])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let report = fs::read_to_string(out.join("study_protocol_report.txt")).unwrap();
    assert!(report.starts_with("STUDY PROTOCOL REPORT"));
    assert!(report.contains("Disease Area: Oncology"));
}

// === Config ===

#[test]
fn test_config_path_honors_env() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("custom.toml");

    protogen(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_init_then_validate() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("nested").join("config.toml");

    protogen(&config).args(["config", "init"]).assert().success();
    assert!(config.exists());

    protogen(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    protogen(&config)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration valid"));
}

#[test]
fn test_config_validate_rejects_inverted_delays() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.toml");
    fs::write(
        &config,
        "[timings]\ncard_delay_min_ms = 900\ncard_delay_max_ms = 100\n",
    )
    .unwrap();

    protogen(&config)
        .args(["config", "validate"])
        .assert()
        .failure();
}
