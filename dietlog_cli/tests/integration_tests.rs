//! Integration tests for the dietlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Exercise logging, presets and removal
//! - Water counting with global settings
//! - Weight history ordering and metrics
//! - CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory with an empty config file
fn setup_test_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("config.toml"), "").expect("Failed to write config");
    dir
}

/// CLI command bound to the test directory's data and config
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dietlog").expect("Failed to find dietlog binary");
    cmd.arg("--data-dir")
        .arg(data_dir(dir))
        .arg("--config")
        .arg(dir.path().join("config.toml"));
    cmd
}

fn data_dir(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("data")
}

fn read_json(path: &Path) -> serde_json::Value {
    let contents = fs::read_to_string(path).expect("Failed to read record");
    serde_json::from_str(&contents).expect("Record is not JSON")
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("dietlog")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Diet and fitness activity tracker"));
}

#[test]
fn test_preset_exercise_is_logged_with_rate() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["--date", "2024-01-01", "exercise", "preset", "Running", "--duration", "45"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged Running (45 min, 450 cal)"));

    let record = read_json(&data_dir(&dir).join("exercises-2024-01-01.json"));
    assert_eq!(record[0]["name"], "Running");
    assert_eq!(record[0]["duration"], 45);
    assert_eq!(record[0]["caloriesBurned"], 450);
}

#[test]
fn test_custom_exercise_clamps_inputs() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["--date", "2024-01-01", "exercise", "add", "Stretching"])
        .args(["--duration", "0", "--calories", "-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged Stretching (1 min, 1 cal)"));
}

#[test]
fn test_blank_exercise_name_logs_nothing() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["--date", "2024-01-01", "exercise", "add", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing logged"));

    assert!(!data_dir(&dir).join("exercises-2024-01-01.json").exists());
}

#[test]
fn test_unknown_preset_logs_nothing() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["exercise", "preset", "Rowing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown preset"));
}

#[test]
fn test_exercise_list_and_remove() {
    let dir = setup_test_dir();

    for name in ["Walking", "Yoga"] {
        cli(&dir)
            .args(["--date", "2024-01-02", "exercise", "preset", name, "--duration", "20"])
            .assert()
            .success();
    }

    cli(&dir)
        .args(["--date", "2024-01-02", "exercise", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Walking"))
        .stdout(predicate::str::contains("Total: 140 cal burned, 40 min active"));

    let record = read_json(&data_dir(&dir).join("exercises-2024-01-02.json"));
    let id = record[0]["id"].as_i64().unwrap().to_string();

    cli(&dir)
        .args(["--date", "2024-01-02", "exercise", "remove", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed exercise"));

    cli(&dir)
        .args(["--date", "2024-01-02", "exercise", "remove", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("No exercise"));

    let record = read_json(&data_dir(&dir).join("exercises-2024-01-02.json"));
    assert_eq!(record.as_array().unwrap().len(), 1);
    assert_eq!(record[0]["name"], "Yoga");
}

#[test]
fn test_exercise_presets_listed() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["exercise", "presets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HIIT"))
        .stdout(predicate::str::contains("12 cal/min"));
}

#[test]
fn test_water_counts_never_go_negative() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["--date", "2024-01-01", "water", "add", "-5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Water: 0/8 glasses (0ml, 0%)"));

    cli(&dir)
        .args(["--date", "2024-01-01", "water", "add", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Water: 3/8 glasses (750ml"));
}

#[test]
fn test_water_settings_are_shared_across_days() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["--date", "2024-01-01", "water", "add", "4"])
        .assert()
        .success();
    cli(&dir)
        .args(["water", "goal", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily goal: 4 glasses"));
    cli(&dir)
        .args(["water", "glass-size", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Glass size: 50ml"));

    cli(&dir)
        .args(["--date", "2024-01-01", "water", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Water: 4/4 glasses (200ml, 100%)"))
        .stdout(predicate::str::contains("goal reached"));

    cli(&dir)
        .args(["--date", "2024-01-02", "water", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Water: 0/4 glasses"));
}

#[test]
fn test_weight_history_and_metrics() {
    let dir = setup_test_dir();

    for (weight, on) in [("70.0", "2024-01-01"), ("69.0", "2024-01-03"), ("69.5", "2024-01-02")] {
        cli(&dir)
            .args(["weight", "add", weight, "--on", on])
            .assert()
            .success();
    }

    let output = cli(&dir)
        .args(["weight", "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let first = stdout.find("2024-01-03").unwrap();
    let second = stdout.find("2024-01-02").unwrap();
    let third = stdout.find("2024-01-01").unwrap();
    assert!(first < second && second < third);

    cli(&dir)
        .args(["weight", "metrics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current weight: 69.0 kg"))
        .stdout(predicate::str::contains("Change: -0.5 kg"))
        .stdout(predicate::str::contains("To goal: 1.0 kg below"));
}

#[test]
fn test_weight_goal() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["weight", "goal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal weight: 70.0 kg"));

    cli(&dir)
        .args(["weight", "goal", "65.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal weight: 65.5 kg"));

    cli(&dir)
        .args(["weight", "goal", "lots"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal weight: 65.5 kg"));

    let goal = read_json(&data_dir(&dir).join("goal-weight.json"));
    assert_eq!(goal.as_f64(), Some(65.5));
}

#[test]
fn test_non_numeric_weight_logs_nothing() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["weight", "add", "heavy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing logged"));

    assert!(!data_dir(&dir).join("weight-entries.json").exists());
}

#[test]
fn test_negative_weight_logs_nothing() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["weight", "add", "-5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing logged"));

    assert!(!data_dir(&dir).join("weight-entries.json").exists());
}

#[test]
fn test_today_overview_with_summary() {
    let dir = setup_test_dir();
    let summary = dir.path().join("summary.json");
    fs::write(
        &summary,
        r#"{"total_calories": 1500, "total_macros": {"protein_g": 90, "carbs_g": 160, "fat_g": 50}}"#,
    )
    .unwrap();

    cli(&dir)
        .args(["--date", "2024-01-01", "exercise", "preset", "Cycling", "--duration", "30"])
        .assert()
        .success();

    cli(&dir)
        .args(["--date", "2024-01-01", "today", "--summary"])
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("Calories: 1500 of 2000 (75%)"))
        .stdout(predicate::str::contains("500 calories remaining today"))
        .stdout(predicate::str::contains("Exercise: 240 cal burned, 30 min active"))
        .stdout(predicate::str::contains("Water: 0/8 glasses"));

    cli(&dir)
        .args(["--date", "2024-01-01", "today", "--target", "1200", "--summary"])
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("300 calories over target"));
}

#[test]
fn test_default_command_is_today() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["--date", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("── 2024-01-01 ──"))
        .stdout(predicate::str::contains("Current weight: -- kg"));
}

#[test]
fn test_config_defaults_apply() {
    let dir = setup_test_dir();
    fs::write(
        dir.path().join("config.toml"),
        "[water]\ndefault_goal_glasses = 6\n\n[progress]\ndefault_goal_kg = 80.0\n",
    )
    .unwrap();

    cli(&dir)
        .args(["water", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/6 glasses"));

    cli(&dir)
        .args(["weight", "goal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal weight: 80.0 kg"));
}

#[test]
fn test_export_weights_and_exercises() {
    let dir = setup_test_dir();

    cli(&dir)
        .args(["weight", "add", "71.2", "--on", "2024-01-05", "--notes", "post run"])
        .assert()
        .success();
    cli(&dir)
        .args(["--date", "2024-01-05", "exercise", "preset", "Swimming", "--duration", "10"])
        .assert()
        .success();

    let weights = dir.path().join("out/weights.csv");
    cli(&dir)
        .args(["export", "weights", "--out"])
        .arg(&weights)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 weight entries"));
    let csv = fs::read_to_string(&weights).unwrap();
    assert!(csv.starts_with("id,date,weight_kg,change_kg,notes"));
    assert!(csv.contains("post run"));

    let exercises = dir.path().join("out/exercises.csv");
    cli(&dir)
        .args(["export", "exercises", "--from", "2024-01-01", "--to", "2024-01-31", "--out"])
        .arg(&exercises)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 exercises"));
    let csv = fs::read_to_string(&exercises).unwrap();
    assert!(csv.contains("Swimming"));
}
