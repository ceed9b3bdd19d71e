//! CLI tests for the `tp` binary
//!
//! Every test runs with a private HOME and data directory so logs land in a
//! temp dir, and with a config that points at environment variables nobody
//! sets, so no test can reach a real provider.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"
llm:
  research-model: gpt-4o
  planning-model: o3-mini
  api-key-env: TP_CLI_TEST_UNSET_GENERATION_KEY
search:
  provider: tavily
  api-key-env: TP_CLI_TEST_UNSET_SEARCH_KEY
log-level: debug
"#;

const KYOTO: &str = r#"
destination: Kyoto
start-date: 2025-04-10
end-date: 2025-04-14
party-size: 2
interests: [food, culture]
pace: balanced
"#;

fn tp(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tp").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("TP_CLI_TEST_UNSET_GENERATION_KEY")
        .env_remove("TP_CLI_TEST_UNSET_SEARCH_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("tp.yml"), CONFIG).unwrap();
    std::fs::write(dir.path().join("kyoto.yml"), KYOTO).unwrap();
    dir
}

#[test]
fn test_plan_without_credentials_is_a_validation_error() {
    let dir = workspace();
    tp(dir.path())
        .args(["--config", "tp.yml", "plan", "kyoto.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("VALIDATION_ERROR"))
        .stderr(predicate::str::contains("missing credential: generation_api_key"));

    // no export without a finished run
    assert!(!dir.path().join("travel_itinerary.txt").exists());
}

#[test]
fn test_failure_is_reported_once() {
    let dir = workspace();
    let output = tp(dir.path())
        .args(["--config", "tp.yml", "plan", "kyoto.yml"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("missing credential: generation_api_key").count(), 1, "{}", stderr);
}

#[test]
fn test_plan_with_only_generation_key_reports_search_key() {
    let dir = workspace();
    tp(dir.path())
        .env("TP_CLI_TEST_UNSET_GENERATION_KEY", "sk-test")
        .args(["--config", "tp.yml", "plan", "kyoto.yml", "--output", "out.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing credential: search_api_key"));
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn test_plan_rejects_invalid_request() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("backwards.yml"),
        "destination: Kyoto\nstart-date: 2025-04-14\nend-date: 2025-04-10\nparty-size: 1\npace: relaxed\n",
    )
    .unwrap();

    tp(dir.path())
        .args(["--config", "tp.yml", "plan", "backwards.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("VALIDATION_ERROR"));
}

#[test]
fn test_research_without_credentials_fails() {
    let dir = workspace();
    tp(dir.path())
        .args(["--config", "tp.yml", "research", "kyoto.yml", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("VALIDATION_ERROR"));
}

#[test]
fn test_config_prints_effective_configuration() {
    let dir = workspace();
    tp(dir.path())
        .args(["--config", "tp.yml", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("research-model: gpt-4o"))
        .stdout(predicate::str::contains("provider: tavily"))
        .stdout(predicate::str::contains("TP_CLI_TEST_UNSET_SEARCH_KEY"));
}

#[test]
fn test_logs_are_written_to_data_dir() {
    let dir = workspace();
    tp(dir.path()).args(["--config", "tp.yml", "config"]).assert().success();
    assert!(dir.path().join("data/travelplanner/logs/travelplanner.log").exists());
}

#[test]
fn test_help_lists_log_location() {
    let dir = workspace();
    tp(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logs are written to:"))
        .stdout(predicate::str::contains("OPENAI_API_KEY"));
}
