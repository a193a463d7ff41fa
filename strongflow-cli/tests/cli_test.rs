use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("strongflow").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Strength training"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("measure"))
        .stdout(predicate::str::contains("dashboard"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("strongflow").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_completions_command() {
    let mut cmd = Command::cargo_bin("strongflow").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_strongflow"));
}

#[test]
fn test_config_init_and_show() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");

    Command::cargo_bin("strongflow")
        .unwrap()
        .args(["config", "init"])
        .env("STRONGFLOW_CONFIG", &config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized"));
    assert!(config.exists());

    Command::cargo_bin("strongflow")
        .unwrap()
        .args(["config", "init"])
        .env("STRONGFLOW_CONFIG", &config)
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    Command::cargo_bin("strongflow")
        .unwrap()
        .args(["config", "show"])
        .env("STRONGFLOW_CONFIG", &config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Guerriera"));
}

#[test]
fn test_whoami_when_logged_out() {
    let dir = tempdir().unwrap();

    Command::cargo_bin("strongflow")
        .unwrap()
        .arg("whoami")
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("You are not logged in"));
}

#[test]
fn test_log_requires_login() {
    let dir = tempdir().unwrap();

    Command::cargo_bin("strongflow")
        .unwrap()
        .args(["log", "--exercise", "squat", "--weight", "50", "--reps", "8"])
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_log_rejects_unknown_exercise() {
    Command::cargo_bin("strongflow")
        .unwrap()
        .args(["log", "--exercise", "curl", "--weight", "10", "--reps", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid exercise"));
}
