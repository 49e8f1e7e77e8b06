use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_warvalue")
}

fn data_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join("bretonnia.json"),
        r#"{
            "faction_name": "Kingdom of Bretonnia",
            "units": [{
                "category": "Core",
                "base_points": 24,
                "rules": ["Blessings of the Lady"],
                "upgrades": [{"name": "Lance", "is_default": true}, {"name": "Standard", "is_default": false}],
                "models": [{"name": "Knights of the Realm", "default_weapons": ["Hand weapon", "Shield"],
                            "stats": {"M": 4, "WS": 4, "S": 3, "T": 3, "W": 1, "A": 1, "Ld": 8}}]
            }]
        }"#,
    )
    .expect("fixture should be written");
    fs::write(
        dir.path().join("equipment_prices.json"),
        r#"{"rank_and_file": {"lance": 4, "shield": 1}}"#,
    )
    .expect("fixture should be written");
    dir
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(bin())
        .args(args)
        .env_remove("WARVALUE_EQUIPMENT_PRICES")
        .env_remove("WARVALUE_RULE_PRICES")
        .env_remove("WARVALUE_WEIGHTS")
        .output()
        .expect("command should run")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn unknown_command_prints_usage() {
    let output = run(&["frobnicate"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: warvalue"));
}

#[test]
fn load_command_emits_summary_json() {
    let dir = data_dir();
    let output = run(&["load", &path_arg(dir.path())]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("load should emit json");
    assert_eq!(payload["records"], 1);
    assert_eq!(payload["files_loaded"], 1);
    assert_eq!(payload["columns"].as_array().map(Vec::len), Some(18));
}

#[test]
fn load_command_fails_on_missing_folder() {
    let dir = TempDir::new().expect("temp dir");
    let output = run(&["load", &path_arg(&dir.path().join("absent"))]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("load failed"));
}

#[test]
fn value_command_ranks_and_reports_missing_rule_table() {
    let dir = data_dir();
    let output = run(&["value", &path_arg(dir.path())]);

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("value should emit json");
    let first = &payload[0];
    assert_eq!(first["name"], "Knights of the Realm");
    assert_eq!(first["metrics"]["gear_value"], 5.0);
    assert_eq!(first["metrics"]["naked_points"], 19.0);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rules price table not found"));
}

#[test]
fn value_command_table_output() {
    let dir = data_dir();
    let output = run(&["value", &path_arg(dir.path()), "--table", "--top", "1"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert!(lines.next().unwrap_or_default().starts_with("faction\tname"));
    assert!(lines
        .next()
        .unwrap_or_default()
        .starts_with("Kingdom of Bretonnia\tKnights of the Realm\t24"));
}

#[test]
fn value_command_rejects_bad_weights() {
    let dir = data_dir();
    let weights = dir.path().join("weights.txt");
    fs::write(&weights, r#"{"w_ws": -1}"#).expect("fixture should be written");
    let output = run(&["value", &path_arg(dir.path()), "--weights", &path_arg(&weights)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid weights"));
}

#[test]
fn export_command_writes_csv() {
    let dir = data_dir();
    let out = dir.path().join("out.csv");
    let output = run(&["export", &path_arg(dir.path()), &path_arg(&out)]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("export complete: records=1"));
    let csv = fs::read_to_string(&out).expect("csv written");
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("\"Hand weapon, Lance, Shield\""));
}

#[test]
fn validate_command_returns_non_zero_on_invalid_data() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("invalid.json");
    fs::write(&path, r#"{"faction_name": "Empire", "units": 3}"#).expect("fixture should be written");

    let output = run(&["validate", &path_arg(&path)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("validation failed"));
}

#[test]
fn validate_command_passes_clean_document() {
    let dir = data_dir();
    let output = run(&["validate", &path_arg(&dir.path().join("bretonnia.json"))]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("validation passed"));
}
