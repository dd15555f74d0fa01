//! CLI Integration Tests
//!
//! These tests run the built `smogwatch` binary against temporary databases
//! and CSV files.
//!
//! ```
//! cargo test --package smogwatch-cli --test cli_integration
//! ```

use std::path::Path;
use std::process::{Command, Output};

/// Run smogwatch with an isolated environment.
fn run_smogwatch(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_smogwatch"))
        .args(args)
        .env_remove("SMOGWATCH_DB")
        .env_remove("SMOGWATCH_SENSOR")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run smogwatch binary")
}

/// Twelve hourly readings on 2023-11-14 UTC with a steady climb.
fn write_readings(path: &Path) {
    let mut content = String::from("timestamp,aqi,pm25,pm10,co2\n");
    for i in 0..12 {
        let aqi = 60 + i;
        content.push_str(&format!(
            "{},{},{},{},{}\n",
            1_699_920_000_000_i64 + i64::from(i) * 3_600_000,
            aqi,
            15 + i,
            30 + i,
            400 + i * 5
        ));
    }
    std::fs::write(path, content).unwrap();
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_smogwatch(&["--help"]);
    assert!(output.status.success(), "Help should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["predict", "anomalies", "correlations", "trend", "analyze", "import", "watch"] {
        assert!(stdout.contains(command), "Help should list {command}");
    }
}

#[test]
fn test_version_command() {
    let output = run_smogwatch(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_command_fails() {
    let output = run_smogwatch(&["forecast"]);
    assert!(!output.status.success());
}

// =============================================================================
// CSV Source
// =============================================================================

#[test]
fn test_predict_from_csv_json() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("readings.csv");
    write_readings(&csv);

    let output = run_smogwatch(&[
        "predict",
        "--csv",
        csv.to_str().unwrap(),
        "--format",
        "json",
        "--seed",
        "42",
        "--hour",
        "12",
        "--flat",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let predictions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let predictions = predictions.as_array().unwrap();
    assert_eq!(predictions.len(), 4);
    assert_eq!(predictions[0]["metric"], "AQI");
    assert_eq!(predictions[0]["currentValue"], 71.0);
    assert_eq!(predictions[0]["timeframe"], "1 hour");
}

#[test]
fn test_predict_is_reproducible_with_seed() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("readings.csv");
    write_readings(&csv);
    let args = [
        "predict",
        "--csv",
        csv.to_str().unwrap(),
        "--format",
        "json",
        "--seed",
        "7",
        "--hour",
        "8",
    ];

    let first = run_smogwatch(&args);
    let second = run_smogwatch(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_anomalies_text_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("readings.csv");
    write_readings(&csv);

    let output = run_smogwatch(&["anomalies", "--csv", csv.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No anomalies detected."));
}

#[test]
fn test_missing_csv_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.csv");

    let output = run_smogwatch(&["predict", "--csv", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read"), "stderr: {stderr}");
}

// =============================================================================
// Database Source
// =============================================================================

#[test]
fn test_import_then_analyze() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("readings.csv");
    let db = dir.path().join("smogwatch.db");
    write_readings(&csv);
    let db = db.to_str().unwrap();

    let output = run_smogwatch(&[
        "--database",
        db,
        "import",
        csv.to_str().unwrap(),
        "--sensor",
        "S001",
        "--location",
        "Harbour",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Imported 12 of 12 rows for S001"));

    let output = run_smogwatch(&[
        "--database",
        db,
        "analyze",
        "--sensor",
        "S001",
        "--format",
        "json",
        "--computed",
        "--seed",
        "1",
    ]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["samples"], 12);
    assert_eq!(report["predictions"].as_array().unwrap().len(), 4);
    assert!(!report["correlations"].as_array().unwrap().is_empty());
}

#[test]
fn test_trend_without_previous_day() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("readings.csv");
    let db = dir.path().join("smogwatch.db");
    write_readings(&csv);
    let db = db.to_str().unwrap();

    let output = run_smogwatch(&["--database", db, "import", csv.to_str().unwrap()]);
    assert!(output.status.success());

    let output = run_smogwatch(&["--database", db, "trend", "--metric", "pm2.5", "-f", "json"]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["metric"], "PM25");
    assert_eq!(report["currentValue"], 26.0);
    assert_eq!(report["percentageChange"], 0);
    assert_eq!(report["trend"], "stable");
}

#[test]
fn test_trend_rejects_unknown_metric() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("smogwatch.db");

    let output = run_smogwatch(&["--database", db.to_str().unwrap(), "trend", "-m", "ozone"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown metric"));
}

#[test]
fn test_output_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("readings.csv");
    let out = dir.path().join("report.json");
    write_readings(&csv);

    let output = run_smogwatch(&[
        "correlations",
        "--csv",
        csv.to_str().unwrap(),
        "--format",
        "json",
        "--output",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let insights: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(insights[0]["correlation"], 0.85);
}
