//! End-to-end tests for the bmi-tracker binary.
//!
//! Piped stdin is not a terminal, so the binary runs its line-oriented
//! display: every key press and every field is one input line.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create an isolated working directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// The binary, run inside `dir` with no user configuration in reach
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bmi-tracker"));
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_exit_option_ends_session() {
    let dir = setup_test_dir();

    cli(&dir)
        .write_stdin("3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI & Nutrition Tracker"));

    assert!(dir.path().join("bmi_history.db").exists());
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let dir = setup_test_dir();

    cli(&dir).write_stdin("").assert().success().code(0);
}

#[test]
fn test_entry_then_history() {
    let dir = setup_test_dir();

    cli(&dir)
        .write_stdin("1\nAlice\n170\n65\n\n2\n\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Results for Alice:"))
        .stdout(predicate::str::contains("BMI: 22.49"))
        .stdout(predicate::str::contains("Category: Normal weight: Keep it up!"))
        .stdout(predicate::str::contains("Name: Alice"));
}

#[test]
fn test_rejected_entry_is_not_saved() {
    let dir = setup_test_dir();

    cli(&dir)
        .write_stdin("1\nBob\n170\n-5\n\n2\n\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Error: Height and weight must be positive numbers!",
        ))
        .stdout(predicate::str::contains("No records yet."))
        .stdout(predicate::str::contains("Name: Bob").not());
}

#[test]
fn test_records_survive_restart() {
    let dir = setup_test_dir();

    cli(&dir)
        .write_stdin("1\nCarol\n160\n80\n\n3\n")
        .assert()
        .success();

    cli(&dir)
        .write_stdin("2\n\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Carol"))
        .stdout(predicate::str::contains("BMI: 31.25"));
}

// dirs resolves XDG_CONFIG_HOME only on Linux
#[cfg(target_os = "linux")]
#[test]
fn test_unopenable_store_exits_with_code_1() {
    let dir = setup_test_dir();
    let config_dir = dir.path().join("config").join("bmi-tracker");
    std::fs::create_dir_all(&config_dir).unwrap();
    let db_path = dir.path().join("missing").join("records.db");
    std::fs::write(
        config_dir.join("config.toml"),
        format!("[store]\ndb_path = {:?}\n", db_path.to_string_lossy()),
    )
    .unwrap();

    cli(&dir)
        .write_stdin("3\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Can't open database"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_configured_log_file_receives_events() {
    let dir = setup_test_dir();
    let config_dir = dir.path().join("config").join("bmi-tracker");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[logging]\nfile = \"tracker.log\"\nlevel = \"info\"\n",
    )
    .unwrap();

    cli(&dir)
        .write_stdin("1\nDave\n180\n80\n\n3\n")
        .assert()
        .success();

    let log = std::fs::read_to_string(dir.path().join("tracker.log")).unwrap();
    assert!(log.contains("record appended"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_unopenable_log_file_falls_back_to_no_logging() {
    let dir = setup_test_dir();
    let config_dir = dir.path().join("config").join("bmi-tracker");
    std::fs::create_dir_all(&config_dir).unwrap();
    let log_path = dir.path().join("missing").join("tracker.log");
    std::fs::write(
        config_dir.join("config.toml"),
        format!("[logging]\nfile = {:?}\n", log_path.to_string_lossy()),
    )
    .unwrap();

    cli(&dir)
        .write_stdin("1\nErin\n165\n60\n\n3\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Logging disabled"))
        .stdout(predicate::str::contains("Results for Erin:"));

    assert!(!log_path.exists());
}
