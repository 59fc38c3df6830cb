//! Integration tests for system info and the action log.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_system_info_json() {
    let env = TestEnv::new();

    env.cad()
        .args(["system", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\""))
        .stdout(predicate::str::contains("\"backend\":\"folder\""))
        .stdout(predicate::str::contains("\"cycleCount\":0"));
}

#[test]
fn test_system_info_human() {
    let env = TestEnv::new();

    env.cad()
        .args(["system", "info", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cadence "))
        .stdout(predicate::str::contains("data dir:"));
}

#[test]
fn test_system_info_counts_cycles() {
    let env = TestEnv::with_cycle("Sprint");

    env.cad()
        .args(["system", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cycleCount\":1"))
        .stdout(predicate::str::contains("\"selectedCycleId\":\"cycle_"));
}

#[test]
fn test_log_records_commands() {
    let env = TestEnv::with_cycle("Sprint");
    env.cad().args(["goal", "add", "G"]).assert().success();
    env.cad().args(["goal", "rm", "goal_missing"]).assert().failure();

    env.cad()
        .args(["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\":\"cycle.create\""))
        .stdout(predicate::str::contains("\"command\":\"goal.add\""))
        // Failures are logged too, with their error message
        .stdout(predicate::str::contains("\"success\":false"));

    assert!(env.data_path().join("action.log").exists());
}

#[test]
fn test_log_limit() {
    let env = TestEnv::with_cycle("Sprint");
    for i in 0..5 {
        env.cad()
            .args(["goal", "add", &format!("G{}", i)])
            .assert()
            .success();
    }

    let output = env
        .cad()
        .args(["log", "--limit", "2"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = value["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Oldest-first tail of the log
    assert_eq!(entries[1]["command"], "goal.add");
}

#[test]
fn test_log_empty() {
    let env = TestEnv::new();

    env.cad()
        .args(["log", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No logged actions"));
}
