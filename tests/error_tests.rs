//! Error scenario integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn onlyr_bin(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("onlyr").expect("binary should build");
    cmd.env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("XDG_DATA_HOME", dir.path().join("data"))
        .env("ONLYR_OPTIONS_FILE", dir.path().join("options.toml"));
    cmd
}

#[test]
fn config_get_unknown_key() {
    let dir = TempDir::new().unwrap();
    onlyr_bin(&dir)
        .args(["config", "get", "unknown_key"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown_key"))
        .stderr(predicate::str::contains("sample_rate"));
}

#[test]
fn config_set_unsupported_sample_rate() {
    let dir = TempDir::new().unwrap();
    onlyr_bin(&dir)
        .args(["config", "set", "sample_rate", "12345"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("12345"));

    assert!(!dir.path().join("options.toml").exists());
}

#[test]
fn config_set_rejects_non_numeric_value() {
    let dir = TempDir::new().unwrap();
    onlyr_bin(&dir)
        .args(["config", "set", "mp3_bit_rate", "loud"])
        .assert()
        .code(1);
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    onlyr_bin(&dir).args(["config", "init"]).assert().success();
    onlyr_bin(&dir).args(["config", "init"]).assert().code(1);
}

#[test]
fn config_set_missing_value_is_usage_error() {
    let dir = TempDir::new().unwrap();
    onlyr_bin(&dir)
        .args(["config", "set", "genre"])
        .assert()
        .code(2);
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let dir = TempDir::new().unwrap();
    onlyr_bin(&dir).arg("transcribe").assert().code(2);
}
