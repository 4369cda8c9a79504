//! Integration tests for the gymhud binary.
//!
//! These tests verify end-to-end behavior including:
//! - Catalog listing
//! - Metric ingestion and macro persistence
//! - Scripted speech sessions through the simulator

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI command isolated from any user config file
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gymhud"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"));
    cmd
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Voice-driven gym and macro head-up display server",
        ));
}

#[test]
fn test_catalog_lists_days() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("PUSH (say \"push\")"))
        .stdout(predicate::str::contains("Incline Bench - 3 sets x 6-10 @ 125 lbs"))
        .stdout(predicate::str::contains("WEAK (say \"weak\")"));
}

#[test]
fn test_macros_default_to_zero() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("macros")
        .assert()
        .success()
        .stdout(predicate::str::contains("Calories: 0"))
        .stdout(predicate::str::contains("Protein:  0g"));
}

#[test]
fn test_ingest_rounds_and_persists() {
    let temp_dir = setup_test_dir();
    let payload = temp_dir.path().join("payload.json");
    fs::write(
        &payload,
        r#"{"data": {"metrics": [
            {"name": "Active Energy", "data": [{"qty": 512.7}]},
            {"name": "Protein", "data": [{"qty": 41.2}]},
            {"name": "Step Count", "data": [{"qty": 8000}]}
        ]}}"#,
    )
    .unwrap();

    cli(&temp_dir)
        .arg("ingest")
        .arg(&payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 2 of 3 metric readings"))
        .stdout(predicate::str::contains("Calories: 513"));

    let cache = temp_dir.path().join("data/macro-cache.json");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&cache).unwrap()).unwrap();
    assert_eq!(json["calories"], 513);
    assert_eq!(json["protein"], 41);
    assert_eq!(json["carbs"], 0);
    assert_eq!(json["fat"], 0);

    // A later run sees the persisted snapshot
    cli(&temp_dir)
        .arg("macros")
        .assert()
        .success()
        .stdout(predicate::str::contains("Protein:  41g"));
}

#[test]
fn test_ingest_malformed_payload_is_zero_updates() {
    let temp_dir = setup_test_dir();
    let payload = temp_dir.path().join("payload.json");
    fs::write(&payload, r#"{"data": {}}"#).unwrap();

    cli(&temp_dir)
        .arg("ingest")
        .arg(&payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 0 of 0 metric readings"));
}

#[test]
fn test_ingest_missing_file_fails() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("ingest")
        .arg(temp_dir.path().join("missing.json"))
        .assert()
        .failure();
}

#[test]
fn test_simulate_workout_session() {
    let temp_dir = setup_test_dir();
    let script = "\
partial: jim
final: push day
final: done
tick
final: done
final: done
final: back
final: off
";

    let output = cli(&temp_dir)
        .arg("simulate")
        .write_stdin(script)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let output = String::from_utf8(output).unwrap();

    assert!(output.contains("SELECT DAY:\nPUSH | PULL | LEGS\nWEAK | ABS"));
    assert!(output.contains("PUSH\nIncline Bench\nSET 2/3 x 6-10\nWT: 125 LBS\nREST: 90s"));
    assert!(output.contains("REST: 89s"));
    assert!(output.contains("Cable Flys\nSET 1/3 x 8-12"));
    // "back" returns to the last set of the previous exercise and clears the timer
    assert!(output.contains("Incline Bench\nSET 3/3 x 6-10\nWT: 125 LBS\n\n> Done | Back"));
    // "off" clears the display
    assert!(output.ends_with("---\n\n"));
}

#[test]
fn test_simulate_partial_speech_does_not_progress() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("simulate")
        .write_stdin("final: gym\nfinal: legs\npartial: done\npartial: done\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("SET 1/3"))
        .stdout(predicate::str::contains("SET 2/3").not());
}

#[test]
fn test_simulate_shows_ingested_macros() {
    let temp_dir = setup_test_dir();
    let payload = temp_dir.path().join("payload.json");
    fs::write(
        &payload,
        r#"{"data": {"metrics": [{"name": "dietary_energy", "data": [{"qty": 1800}]}]}}"#,
    )
    .unwrap();
    cli(&temp_dir).arg("ingest").arg(&payload).assert().success();

    cli(&temp_dir)
        .arg("simulate")
        .write_stdin("final: macro\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("MACROS\nCAL: 1800\nPRO: 0g"));
}
