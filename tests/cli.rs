use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

const BINARY_NAME: &str = "driftmail";

/// Helper to get a temporary home directory
fn temp_home_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get a state file path under the temp home
fn state_file_path(dir: &tempfile::TempDir, key: &str) -> PathBuf {
    dir.path().join(".driftmail").join(format!("{}.json", key))
}

fn seed_state_file(dir: &tempfile::TempDir, key: &str, contents: &str) -> PathBuf {
    let path = state_file_path(dir, key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("Command-line arguments"));
}

#[test]
/// New command should refuse a local part the service would reject.
fn new_rejects_invalid_address() {
    let tmp = temp_home_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("new")
        .arg("--address")
        .arg("Bad!")
        .env("HOME", tmp.path())
        .assert()
        .failure()
        .stderr(contains("Invalid mailbox address"));
}

#[test]
/// Reset command should delete the persisted mailbox state files.
fn reset_deletes_state_files() {
    let tmp = temp_home_dir();
    let current = seed_state_file(
        &tmp,
        "currentMailbox",
        r#"{"address":"falcon","expiresAt":4102444800}"#,
    );
    let saved = seed_state_file(
        &tmp,
        "savedMailboxes",
        r#"[{"address":"falcon","expiresAt":4102444800}]"#,
    );
    assert!(current.exists());
    assert!(saved.exists());

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("reset")
        .env("HOME", tmp.path()) // simulate different $HOME
        .assert()
        .success()
        .stdout(contains("Reset"));

    assert!(!current.exists());
    assert!(!saved.exists());
}

#[test]
/// Reset command should succeed when there is nothing to clear.
fn reset_succeeds_with_no_state() {
    let tmp = temp_home_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("reset")
        .env("HOME", tmp.path())
        .assert()
        .success()
        .stdout(contains("Reset"));
}

#[test]
/// Address command should print the persisted mailbox when it is valid.
fn address_prints_persisted_mailbox() {
    let tmp = temp_home_dir();
    seed_state_file(
        &tmp,
        "currentMailbox",
        r#"{"address":"falcon","expiresAt":4102444800}"#,
    );

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("address")
        .env("HOME", tmp.path())
        .env_remove("DRIFTMAIL_ENVIRONMENT")
        .assert()
        .success()
        .stdout(contains("falcon@driftmail.app"));
}

#[test]
/// Address command should report when no mailbox is provisioned.
fn address_reports_missing_mailbox() {
    let tmp = temp_home_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("address")
        .env("HOME", tmp.path())
        .assert()
        .success()
        .stdout(contains("No mailbox"));
}

#[test]
/// An expired persisted mailbox is treated as absent.
fn address_ignores_expired_mailbox() {
    let tmp = temp_home_dir();
    seed_state_file(
        &tmp,
        "currentMailbox",
        r#"{"address":"falcon","expiresAt":1}"#,
    );

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("address")
        .env("HOME", tmp.path())
        .assert()
        .success()
        .stdout(contains("No mailbox"));
}
