//! CLI structure and group-validation behavior through the real binary.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary wired to an isolated home directory.
fn jfit(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jfit"));
    cmd.env("NO_COLOR", "1");
    cmd.env("JFIT_HOME", home.path());
    cmd
}

// --- Help and version ---

#[test]
fn no_args_shows_help() {
    let home = TempDir::new().expect("tempdir");
    // clap with arg_required_else_help prints help on stderr and exits 2
    jfit(&home)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn help_lists_the_lifecycle_commands() {
    let home = TempDir::new().expect("tempdir");
    jfit(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("stop"))
        .stdout(predicate::str::contains("restart"))
        .stdout(predicate::str::contains("remove"))
        .stdout(predicate::str::contains("logs"));
}

#[test]
fn version_flag_works() {
    let home = TempDir::new().expect("tempdir");
    jfit(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jfit"));
}

// --- Group validation without an engine ---

#[test]
fn start_rejects_an_unknown_group() {
    let home = TempDir::new().expect("tempdir");
    jfit(&home)
        .args(["start", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("group 'nope' does not exist"));
}

#[test]
fn stop_rejects_an_unassembled_group() {
    let home = TempDir::new().expect("tempdir");
    let group_dir = home.path().join("etc/core_output/g1");
    std::fs::create_dir_all(&group_dir).expect("group dir");
    std::fs::write(group_dir.join("source.env"), "DATABASE=db\n").expect("manifest");

    jfit(&home)
        .args(["stop", "g1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no compose documents found for group 'g1'"));
}

#[test]
fn remove_rejects_an_unknown_group() {
    let home = TempDir::new().expect("tempdir");
    jfit(&home)
        .args(["remove", "gone"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

// --- Argument contracts ---

#[test]
fn logs_requires_group_and_service() {
    let home = TempDir::new().expect("tempdir");
    jfit(&home).args(["logs", "g1"]).assert().code(2);
}

#[test]
fn cli_requires_group_and_service() {
    let home = TempDir::new().expect("tempdir");
    jfit(&home).args(["cli"]).assert().code(2);
}

#[test]
fn parse_reports_a_missing_input_model() {
    let home = TempDir::new().expect("tempdir");
    jfit(&home)
        .args(["parse", "missing.json", "edge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot locate input model"));
}

#[test]
fn mgd_rejects_unknown_operations() {
    let home = TempDir::new().expect("tempdir");
    jfit(&home).args(["mgd", "bounce"]).assert().code(2);
}
