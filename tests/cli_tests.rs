mod common;

use common::{event, init_test_db, rwc, setup_test_db, temp_out};
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

#[test]
fn test_init_creates_database() {
    let db = setup_test_db("cli_init");

    rwc()
        .args(["--db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(fs::metadata(&db).is_ok());
}

#[test]
fn test_full_day_with_break() {
    let db = setup_test_db("cli_full_day");
    init_test_db(&db);

    event(&db, &["checkin", "emp-1"], "2025-06-02 09:05")
        .success()
        .stdout(contains("emp-1 checked in at 2025-06-02 09:05"))
        .stdout(contains("Day shift"))
        .stdout(contains("Late by 5 min"));

    event(&db, &["break", "emp-1", "start"], "2025-06-02 12:00")
        .success()
        .stdout(contains("break started"));
    event(&db, &["break", "emp-1", "end"], "2025-06-02 12:30")
        .success()
        .stdout(contains("break ended"));

    let out = rwc()
        .args(["--db", &db, "--test", "status", "emp-1", "--json"])
        .args(["--at", "2025-06-02 16:10"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let live: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(live["workedSeconds"], 23700);
    assert_eq!(live["isOnBreak"], false);
    assert_eq!(live["isOvertime"], false);

    event(&db, &["checkout", "emp-1"], "2025-06-02 16:10")
        .success()
        .stdout(contains("06h 35m"))
        .stdout(contains("Good"));

    let out = rwc()
        .args(["--db", &db, "--test", "report", "--month", "2025-06", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let records: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(records[0]["employee_id"], "emp-1");
    assert_eq!(records[0]["total_working_days"], 1);
    assert_eq!(records[0]["total_delay_minutes"], 5);
    assert_eq!(records[0]["performance_status"], "Good");
}

#[test]
fn test_invalid_transitions_fail() {
    let db = setup_test_db("cli_invalid");
    init_test_db(&db);

    event(&db, &["checkout", "emp-1"], "2025-06-02 16:00")
        .failure()
        .stderr(contains("has no open work session"));

    event(&db, &["checkin", "emp-1"], "2025-06-02 09:00").success();
    event(&db, &["checkin", "emp-1"], "2025-06-02 09:10")
        .failure()
        .stderr(contains("already has an open work session"));
    event(&db, &["break", "emp-1", "end"], "2025-06-02 10:00")
        .failure()
        .stderr(contains("is not on break"));
}

#[test]
fn test_status_without_session() {
    let db = setup_test_db("cli_idle");
    init_test_db(&db);

    rwc()
        .args(["--db", &db, "--test", "status", "nobody"])
        .assert()
        .success()
        .stdout(contains("nobody has no open work session"));

    rwc()
        .args(["--db", &db, "--test", "status", "nobody", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("null\n"));
}

#[test]
fn test_assignment_selects_night_shift() {
    let db = setup_test_db("cli_assign");
    init_test_db(&db);

    rwc()
        .args(["--db", &db, "--test", "assign", "emp-1", "2025-06-02", "--shift", "night"])
        .assert()
        .success()
        .stdout(contains("Night shift"));

    event(&db, &["checkin", "emp-1"], "2025-06-02 16:05")
        .success()
        .stdout(contains("Night shift 16:00 → 04:00"));

    rwc()
        .args(["--db", &db, "--test", "assign", "emp-1", "2025-06-03"])
        .assert()
        .failure();
}

#[test]
fn test_boundary_closes_forgotten_session() {
    let db = setup_test_db("cli_boundary");
    init_test_db(&db);

    event(&db, &["checkin", "emp-1"], "2025-06-02 20:00").success();

    rwc()
        .args(["--db", &db, "--test", "boundary", "--at", "2025-06-03 05:00"])
        .assert()
        .success()
        .stdout(contains("checked out at 2025-06-03 04:00"));

    rwc()
        .args(["--db", &db, "--test", "boundary", "--at", "2025-06-03 05:00"])
        .assert()
        .success()
        .stdout(contains("No session open past the 2025-06-03 04:00 boundary"));

    rwc()
        .args(["--db", &db, "--test", "log", "--print"])
        .assert()
        .success()
        .stdout(contains("forced_close"))
        .stdout(contains("checkin"));
}

#[test]
fn test_replay_and_retry() {
    let db = setup_test_db("cli_replay");
    init_test_db(&db);

    event(&db, &["checkin", "emp-1"], "2025-06-02 09:00").success();
    event(&db, &["checkout", "emp-1"], "2025-06-02 16:00").success();

    rwc()
        .args(["--db", &db, "--test", "replay", "emp-1", "2025-06"])
        .assert()
        .success()
        .stdout(contains("emp-1 2025-06 rebuilt: 1 day(s)"));

    rwc()
        .args(["--db", &db, "--test", "retry", "emp-1"])
        .assert()
        .success()
        .stdout(contains("No pending scores for emp-1"));

    rwc()
        .args(["--db", &db, "--test", "replay", "emp-1", "2025-6"])
        .assert()
        .failure()
        .stderr(contains("Invalid month"));
}

#[test]
fn test_report_table() {
    let db = setup_test_db("cli_report");
    init_test_db(&db);

    rwc()
        .args(["--db", &db, "--test", "report"])
        .assert()
        .success()
        .stdout(contains("No performance records found"));

    event(&db, &["checkin", "emp-1"], "2025-06-02 09:00").success();
    event(&db, &["checkout", "emp-1"], "2025-06-02 16:00").success();

    rwc()
        .args(["--db", &db, "--test", "report", "--employee", "emp-1"])
        .assert()
        .success()
        .stdout(contains("Avg score"))
        .stdout(contains("90.00"))
        .stdout(contains("Excellent"));
}

#[test]
fn test_backup_compressed() {
    let db = setup_test_db("cli_backup");
    init_test_db(&db);
    let out = temp_out("cli_backup", "sqlite");
    let zip = out.replace(".sqlite", ".zip");
    fs::remove_file(&zip).ok();

    rwc()
        .args(["--db", &db, "--test", "backup", "--file", &out, "--compress"])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    assert!(fs::metadata(&zip).is_ok());
    assert!(fs::metadata(&out).is_err());

    rwc()
        .args(["--db", &db, "--test", "backup", "--file", &out, "--compress"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn test_checkout_after_boundary_is_pinned() {
    let db = setup_test_db("cli_late_checkout");
    init_test_db(&db);

    event(&db, &["checkin", "emp-1"], "2025-06-02 09:00").success();
    event(&db, &["checkout", "emp-1"], "2025-06-03 10:00")
        .success()
        .stdout(contains("checked out at 2025-06-03 04:00"))
        .stdout(contains("19h 00m"));
}
