//! End-to-end tests for the `evictor` binary
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn get_evictor_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_evictor"))
}

/// Run with an empty config directory and no env overrides
fn run(args: &[&str]) -> (Output, TempDir) {
    let config_home = TempDir::new().unwrap();
    let output = Command::new(get_evictor_binary())
        .args(args)
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("EVICTOR_MAX_SIZE")
        .output()
        .expect("Failed to execute command");
    (output, config_home)
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "Failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_demo_keeps_max_size_employees() {
    let (output, _config) = run(&["demo", "--seed", "7", "--json", "--log-level", "warn"]);
    let report = stdout_json(&output);

    let employees = report["employees"].as_array().unwrap();
    assert_eq!(employees.len(), 10);
    assert_eq!(report["inserted"], 30);
    assert_eq!(report["metrics"]["current_size"], 10);
    assert_eq!(report["metrics"]["evictions"], 20);

    let priorities: Vec<u64> = employees
        .iter()
        .map(|e| e["priority"].as_u64().unwrap())
        .collect();
    assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_max_size_flag_overrides_default() {
    let (output, _config) = run(&[
        "demo", "--max-size", "4", "--entries", "12", "--seed", "1", "--json",
    ]);
    let report = stdout_json(&output);

    assert_eq!(report["max_size"], 4);
    assert_eq!(report["employees"].as_array().unwrap().len(), 4);
}

#[test]
fn test_config_file_is_used() {
    let config_home = TempDir::new().unwrap();
    let dir = config_home.path().join("evictor");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.json"), r#"{"eviction": {"max_size": 3}}"#).unwrap();

    let output = Command::new(get_evictor_binary())
        .args(["demo", "--seed", "3", "--json"])
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("EVICTOR_MAX_SIZE")
        .output()
        .unwrap();
    let report = stdout_json(&output);

    assert_eq!(report["max_size"], 3);
    assert_eq!(report["employees"].as_array().unwrap().len(), 3);
}

#[test]
fn test_zero_max_size_fails() {
    let (output, _config) = run(&["demo", "--max-size", "0"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_size"));
    assert!(stderr.contains("use the default value '10'"));
}

#[test]
fn test_unknown_policy_is_rejected() {
    let (output, _config) = run(&["demo", "--policy", "lru"]);

    assert!(!output.status.success());
}

#[test]
fn test_stress_is_consistent() {
    let (output, _config) = run(&[
        "stress",
        "--threads",
        "4",
        "--entries-per-thread",
        "500",
        "--max-size",
        "32",
        "--seed",
        "11",
        "--json",
    ]);
    let report = stdout_json(&output);

    assert_eq!(report["inserted"], 2000);
    assert_eq!(report["consistent"], true);
    assert_eq!(report["within_bound"], true);
    assert_eq!(report["tracked"], report["resident"]);
}

#[test]
fn test_fifo_demo_text_output() {
    let (output, _config) = run(&["demo", "--policy", "fifo", "--seed", "5"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Employees in cache:"));
    assert!(stdout.contains("10 of 30 kept, 20 evicted"));
}
