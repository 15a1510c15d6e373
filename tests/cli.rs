//! Smoke tests for the user_upload binary that need no database

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_all_options() {
    let mut cmd = Command::cargo_bin("user_upload").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--create_table"))
        .stdout(predicate::str::contains("--dry_run"))
        .stdout(predicate::str::contains("--file"))
        .stdout(predicate::str::contains("PostgreSQL host"));
}

#[test]
fn help_wins_over_missing_connection_flags() {
    let mut cmd = Command::cargo_bin("user_upload").unwrap();
    cmd.args(["--dry_run", "--help"]);

    cmd.assert().success();
}

#[test]
fn missing_connection_flags_exit_with_one() {
    let mut cmd = Command::cargo_bin("user_upload").unwrap();
    cmd.args(["--file", "users.csv"]);

    cmd.assert().code(1).stdout(predicate::str::contains(
        "Database connection parameters (-h, -u, -p) are required",
    ));
}

#[test]
fn partial_connection_flags_exit_with_one() {
    let mut cmd = Command::cargo_bin("user_upload").unwrap();
    cmd.args(["-h", "localhost", "-u", "postgres", "--create_table"]);

    cmd.assert().code(1);
}

#[test]
fn unreachable_database_exits_with_one() {
    let mut cmd = Command::cargo_bin("user_upload").unwrap();
    cmd.args([
        "-h",
        "127.0.0.1:1",
        "-u",
        "postgres",
        "-p",
        "postgres",
        "--dry_run",
        "--file",
        "users.csv",
    ]);

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("Connection failed:"));
}
