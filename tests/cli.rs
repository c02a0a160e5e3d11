use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn livesource() -> Command {
    Command::cargo_bin("livesource").expect("binary exists")
}

#[test]
fn normalize_wraps_object_literal() {
    livesource()
        .arg("normalize")
        .arg("{a:1}")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("({a:1}\n)"));
}

#[test]
fn normalize_leaves_statements_alone() {
    livesource()
        .arg("normalize")
        .arg("var x = 1; x")
        .assert()
        .success()
        .stdout("var x = 1; x\n");
}

#[test]
fn normalize_expression_mode_wraps_function() {
    livesource()
        .args(["normalize", "--expression", "function(){}"])
        .assert()
        .success()
        .stdout("(function(){})\n");
}

#[test]
fn normalize_expression_mode_rejects_statements() {
    livesource()
        .args(["normalize", "--expression", "1; 2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only one expression expected"));
}

#[test]
fn check_reads_source_file() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("snippet.js");
    fs::write(&path, "{}").expect("write snippet");

    livesource()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout("({})\n");
}

#[test]
fn check_reports_missing_file() {
    let dir = tempdir().expect("create temp dir");
    livesource()
        .arg("check")
        .arg(dir.path().join("missing.js"))
        .assert()
        .failure();
}

#[test]
fn inspect_prints_array_definition() {
    livesource()
        .args(["inspect", "[1, , 3]"])
        .assert()
        .success()
        .stdout("[1, , 3]\n");
}

#[test]
fn inspect_names_objects() {
    livesource()
        .args(["inspect", "{a: 1}"])
        .assert()
        .success()
        .stdout("$1\n");
}
