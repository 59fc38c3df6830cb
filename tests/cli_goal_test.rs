//! Integration tests for goal commands via CLI.
//!
//! Goal status and progress are never stored; they are derived from the
//! statuses of attached works at read time.

mod common;

use common::{entity_id, TestEnv};
use predicates::prelude::*;

#[test]
fn test_goal_add_json() {
    let env = TestEnv::with_cycle("Sprint");

    env.cad()
        .args(["goal", "add", "Ship v1", "--start", "2026-08-01", "--end", "2026-09-30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\":\"goal_"))
        .stdout(predicate::str::contains("\"title\":\"Ship v1\""))
        .stdout(predicate::str::contains("\"startDate\":\"2026-08-01\""));
}

#[test]
fn test_goal_add_requires_selected_cycle() {
    let env = TestEnv::new();

    env.cad()
        .args(["goal", "add", "Orphan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle"));
}

#[test]
fn test_goal_add_rejects_bad_date() {
    let env = TestEnv::with_cycle("Sprint");

    env.cad()
        .args(["goal", "add", "G", "--start", "01/08/2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn test_goal_status_derived_from_works() {
    let env = TestEnv::with_cycle("Sprint");
    let output = env.cad().args(["goal", "add", "G"]).output().unwrap();
    let goal = entity_id(&output.stdout, "goal");

    // No works yet
    env.cad()
        .args(["goal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"NOT_STARTED\""))
        .stdout(predicate::str::contains("\"progress\":0"));

    let output = env
        .cad()
        .args(["work", "add", "W1", "--goal", &goal])
        .output()
        .unwrap();
    let w1 = entity_id(&output.stdout, "work");
    let output = env
        .cad()
        .args(["work", "add", "W2", "--goal", &goal])
        .output()
        .unwrap();
    let w2 = entity_id(&output.stdout, "work");

    env.cad().args(["work", "status", &w1, "done"]).assert().success();

    // One of two done: in progress at 50%
    env.cad()
        .args(["goal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"IN_PROGRESS\""))
        .stdout(predicate::str::contains("\"progress\":50"));

    env.cad().args(["work", "status", &w2, "done"]).assert().success();

    env.cad()
        .args(["goal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"DONE\""))
        .stdout(predicate::str::contains("\"progress\":100"));
}

#[test]
fn test_goal_list_hide_done() {
    let env = TestEnv::with_cycle("Sprint");
    let output = env.cad().args(["goal", "add", "Done goal"]).output().unwrap();
    let goal = entity_id(&output.stdout, "goal");
    let output = env
        .cad()
        .args(["work", "add", "W", "--goal", &goal, "--status", "done"])
        .output()
        .unwrap();
    assert!(output.status.success());
    env.cad().args(["goal", "add", "Open goal"]).assert().success();

    env.cad()
        .args(["goal", "list", "--hide-done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Open goal"))
        .stdout(predicate::str::contains("Done goal").not());
}

#[test]
fn test_goal_rm_cascades() {
    let env = TestEnv::with_cycle("Sprint");
    let output = env.cad().args(["goal", "add", "G"]).output().unwrap();
    let goal = entity_id(&output.stdout, "goal");
    let output = env
        .cad()
        .args(["work", "add", "Attached", "--goal", &goal])
        .output()
        .unwrap();
    let work = entity_id(&output.stdout, "work");
    env.cad()
        .args(["task", "add", "T", "--work", &work])
        .assert()
        .success();
    // A work with no goal survives the cascade
    env.cad().args(["work", "add", "Free"]).assert().success();

    env.cad()
        .args(["goal", "rm", &goal])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"worksRemoved\":1"))
        .stdout(predicate::str::contains("\"tasksRemoved\":1"));

    env.cad()
        .args(["work", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Free"))
        .stdout(predicate::str::contains("Attached").not());
    env.cad()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tasks\":[]"));
}

#[test]
fn test_goal_rm_unknown_fails() {
    let env = TestEnv::with_cycle("Sprint");

    env.cad()
        .args(["goal", "rm", "goal_missing"])
        .assert()
        .failure();
}
