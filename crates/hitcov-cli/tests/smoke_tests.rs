//! Smoke tests for the hitcov CLI

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn hitcov() -> Command {
    Command::cargo_bin("hitcov").expect("hitcov binary should exist")
}

fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("lib")).unwrap();
    fs::create_dir_all(root.join("coverage")).unwrap();
    fs::write(root.join("lib/a.dart"), "int f() {\n  return 1;\n}\n").unwrap();
    fs::write(root.join(".packages"), "app:lib/\n").unwrap();
    fs::write(
        root.join("coverage/run.json"),
        r#"{"type": "CodeCoverage", "coverage": [
            {"source": "package:app/a.dart", "hits": [1, 2, 2, 0]},
            {"source": "dart:core/int.dart", "hits": [1, 1]}
        ]}"#,
    )
    .unwrap();
    dir
}

#[test]
fn test_help_flag() {
    hitcov()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("format"))
        .stdout(predicate::str::contains("merge"));
}

#[test]
fn test_no_args_fails() {
    hitcov().assert().failure();
}

#[test]
fn test_format_lcov_to_stdout() {
    let dir = project();
    hitcov()
        .current_dir(dir.path())
        .args([
            "-q",
            "format",
            "coverage",
            "--packages",
            ".packages",
            "--base-directory",
            ".",
            "--lcov",
        ])
        .assert()
        .success()
        .stdout("SF:lib/a.dart\nDA:1,2\nDA:2,0\nLF:2\nLH:1\nend_of_record\n");
}

#[test]
fn test_format_pretty_print_to_file() {
    let dir = project();
    hitcov()
        .current_dir(dir.path())
        .args([
            "format",
            "coverage/run.json",
            "--packages",
            ".packages",
            "--base-directory",
            ".",
            "--pretty-print",
            "-o",
            "out/report.txt",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 skipped"));

    let report = fs::read_to_string(dir.path().join("out/report.txt")).unwrap();
    assert_eq!(report, "lib/a.dart\n2|int f() {\n0|  return 1;\n |}\n");
}

#[test]
fn test_format_missing_input_fails() {
    let dir = project();
    hitcov()
        .current_dir(dir.path())
        .args(["format", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_merge_to_stdout() {
    let dir = project();
    hitcov()
        .current_dir(dir.path())
        .args(["-q", "merge", "coverage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("package:app/a.dart"))
        .stdout(predicate::str::contains("CodeCoverage"));
}
