#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("SPRINT_PLANNER_DATA")
        .env_remove("SPRINT_PLANNER_KEY")
        .env_remove("SPRINT_PLANNER_LOG");
    cmd
}

fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = cli();
    cmd.env("SPRINT_PLANNER_STORAGE", "memory");
    cmd.write_stdin(script.to_string()).assert()
}

fn run_cli_in(dir: &Path, script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = cli();
    cmd.env("SPRINT_PLANNER_STORAGE", "file")
        .env("SPRINT_PLANNER_DATA", dir);
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_prints_dashboard_stats_on_start() {
    run_cli("quit\n")
        .success()
        .stdout(str_contains("Sprints: 4 total, 1 active | Engineers: 3 | Planned capacity: 80%"))
        .stdout(str_contains("total=8, todo=3"));
}

#[test]
fn cli_adds_and_deletes_tasks() {
    run_cli("task add 2 keerthi 3 Write the docs\ntask delete 2\nquit\n")
        .success()
        .stdout(str_contains("Added task 9."))
        .stdout(str_contains("Deleted task 2."));
}

#[test]
fn cli_reports_unknown_task() {
    run_cli("task delete 42\nquit\n")
        .success()
        .stdout(str_contains("Error: No task with id 42."));
}

#[test]
fn cli_advances_task_status() {
    run_cli("task advance 5\ntask advance 5\ntask advance 5\nquit\n")
        .success()
        .stdout(str_contains("Task 5 is now in_progress."))
        .stdout(str_contains("Task 5 is now completed."))
        .stdout(str_contains("Task 5 is already completed."));
}

#[test]
fn cli_reports_validation_errors() {
    run_cli("engineer add 150 10 Sam QA Engineer\nquit\n")
        .success()
        .stdout(str_contains("capacity must be between 0 and 100 (got 150)"));
}

#[test]
fn cli_filters_tasks() {
    run_cli("filter todo keerthi\nfilter all arpit\nquit\n")
        .success()
        .stdout(str_contains("2 of 8 tasks match."))
        .stdout(str_contains("3 of 8 tasks match."));
}

#[test]
fn cli_counts_working_days() {
    run_cli("workdays 2024-01-08 2024-01-19\nquit\n")
        .success()
        .stdout(str_contains("Working days: 10 (9 after holidays)"));
}

#[test]
fn cli_groups_holidays_by_month() {
    run_cli("holidays by-month\nquit\n")
        .success()
        .stdout(str_contains("January 2024 (2)"))
        .stdout(str_contains("February 2024 (2)"));
}

#[test]
fn cli_lists_upcoming_sprints_from_date() {
    let assert = run_cli("upcoming sprints 2024-02-10\nquit\n").success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Sprint 4 - Polish"));
    assert!(!output.contains("Sprint 3 - Integrations"));
}

#[test]
fn cli_shows_capacity_levels() {
    run_cli("capacity\nquit\n")
        .success()
        .stdout(str_contains("Arpit: 90% (overloaded)"))
        .stdout(str_contains("Keerthi: 80% (high)"))
        .stdout(str_contains("Pure: 70% (healthy)"));
}

#[test]
fn cli_unknown_command_points_to_help() {
    run_cli("frobnicate\nquit\n")
        .success()
        .stdout(str_contains("Unknown command. Type 'help'."));
}

#[test]
fn cli_file_backend_persists_between_runs() {
    let dir = tempdir().expect("temp dir");
    run_cli_in(dir.path(), "sprint add 2024-03-04 2024-03-15 Sprint 5 - Hardening\nquit\n")
        .success()
        .stdout(str_contains("Added sprint 5 (10 working days)."));
    assert!(dir.path().join("projectData.json").exists());

    run_cli_in(dir.path(), "show sprints\nquit\n")
        .success()
        .stdout(str_contains("Sprint 5 - Hardening"));

    run_cli_in(dir.path(), "reset\nshow sprints\nquit\n")
        .success()
        .stdout(str_contains("Data reset to defaults."));
}

#[test]
fn cli_exports_json() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("export.json");
    let script = format!("export json {}\nquit\n", path.display());
    run_cli(&script)
        .success()
        .stdout(str_contains("Exported to"));
    let contents = std::fs::read_to_string(&path).expect("export written");
    assert!(contents.contains("\"allocatedDays\""));
}
