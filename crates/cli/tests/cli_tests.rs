//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("herald")
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

/// Both pages come from fixtures so no request leaves the machine.
fn offline(version: &str) -> assert_cmd::Command {
    let mut command = cmd();
    command.args([
        "--notes-file",
        &get_fixture_path("release_notes.html"),
        "--highlights-file",
        &get_fixture_path("release_highlights.html"),
        version,
    ]);
    command
}

#[test]
fn test_cli_requires_version() {
    cmd()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_blank_version() {
    cmd()
        .arg("  ")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid version"));
}

#[test]
fn test_cli_malformed_version() {
    cmd().arg("1.7/../x").assert().failure().stderr(predicate::str::contains("Invalid version"));
}

#[test]
fn test_cli_post_from_files() {
    offline("1.7")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("🚀 scikit-learn 1.7 is out 🚀"))
        .stdout(predicate::str::contains("▶️ Array API support"))
        .stdout(predicate::str::contains("🟢 3 new features"))
        .stdout(predicate::str::contains("🔴 2 fixes"))
        .stdout(predicate::str::contains("👥 11 contributors (thank you all!)"))
        .stdout(predicate::str::contains("whats_new/v1.7.html#release-notes-1-7"));
}

#[test]
fn test_cli_json_format() {
    let output = offline("1.7").args(["-f", "json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["version"], "1.7");
    assert_eq!(value["summary"]["fixes"], 2);
    assert_eq!(value["contributors"], 11);
    assert_eq!(value["provenance"]["highlight_strategy"], "highlights-page");
}

#[test]
fn test_cli_invalid_format() {
    offline("1.7")
        .args(["--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("post.txt");

    offline("1.7")
        .env_remove("RUST_LOG")
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("🚀 scikit-learn 1.7 is out 🚀"));
    assert!(written.ends_with("#ML\n"));
}

#[test]
fn test_cli_output_file_verbose_reports_path() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("post.txt");

    offline("1.7")
        .args(["-v", "-o", output.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Output written to"));
}

#[test]
fn test_cli_project_override() {
    offline("1.7")
        .args(["--project", "Acme ML"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("🚀 Acme ML 1.7 is out 🚀"))
        .stdout(predicate::str::contains("Discover Acme ML 1.7 and its:"));
}

#[test]
fn test_cli_docs_url_override() {
    offline("1.7")
        .args(["--docs-url", "https://docs.example.org/dev/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://docs.example.org/dev/whats_new/v1.7.html"));
}

#[test]
fn test_cli_config_profile() {
    let tmp = TempDir::new().unwrap();
    let profile = tmp.path().join("project.txt");
    std::fs::write(
        &profile,
        "# profile for a fork\nproject: forklearn\npackage: fork-learn\nhashtags: forklearn opensource\n",
    )
    .unwrap();

    offline("1.7")
        .args(["--config", profile.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("🚀 forklearn 1.7 is out 🚀"))
        .stdout(predicate::str::contains("pip install -U fork-learn"))
        .stdout(predicate::str::ends_with("#forklearn #opensource\n"));
}

#[test]
fn test_cli_missing_config() {
    offline("1.7")
        .args(["--config", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.txt"));
}

#[test]
fn test_cli_malformed_config() {
    let tmp = TempDir::new().unwrap();
    let profile = tmp.path().join("project.txt");
    std::fs::write(&profile, "colour: blue\n").unwrap();

    offline("1.7")
        .args(["--config", profile.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown directive"));
}

#[test]
fn test_cli_missing_page_files() {
    cmd()
        .args([
            "--notes-file",
            "missing-notes.html",
            "--highlights-file",
            "missing-highlights.html",
            "1.7",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No release page could be retrieved"));
}

#[test]
fn test_cli_verbose() {
    offline("1.7")
        .arg("-v")
        .assert()
        .success()
        .stderr(predicate::str::contains("Herald"))
        .stderr(predicate::str::contains("Tag strategy"));
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("herald"));
}
