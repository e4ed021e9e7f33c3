//! `assert_cmd`-driven smoke tests for the `parsegen` CLI binary.

use assert_cmd::Command;
use std::io::Write;
use tempfile::NamedTempFile;

fn grammar_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp grammar file");
    file.write_all(json.as_bytes()).expect("write grammar json");
    file
}

#[test]
fn emits_source_to_stdout() {
    let Ok(mut cmd) = Command::cargo_bin("parsegen") else {
        eprintln!("parsegen binary not built; skipping test");
        return;
    };
    let grammar = grammar_file(
        r#"{
            "start_rule": "start",
            "rules": {
                "start": { "name": "start", "expression": { "type": "literal", "value": "abc" } }
            }
        }"#,
    );

    cmd.arg("--grammar")
        .arg(grammar.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("function parse_start()"))
        .stderr(predicates::str::contains("note: emitted"));
}

#[test]
fn writes_source_to_output_file() {
    let Ok(mut cmd) = Command::cargo_bin("parsegen") else {
        eprintln!("parsegen binary not built; skipping test");
        return;
    };
    let grammar = grammar_file(
        r#"{
            "start_rule": "start",
            "rules": {
                "start": { "name": "start", "expression": { "type": "any" } }
            }
        }"#,
    );
    let output = NamedTempFile::new().expect("create temp output file");

    cmd.arg("--grammar")
        .arg(grammar.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success();

    let written = std::fs::read_to_string(output.path()).expect("read emitted output");
    assert!(written.contains("function parse_start()"));
}

#[test]
fn start_rule_override_is_reflected_in_the_note_line() {
    let Ok(mut cmd) = Command::cargo_bin("parsegen") else {
        eprintln!("parsegen binary not built; skipping test");
        return;
    };
    let grammar = grammar_file(
        r#"{
            "start_rule": "start",
            "rules": {
                "start": { "name": "start", "expression": { "type": "any" } },
                "other": { "name": "other", "expression": { "type": "any" } }
            }
        }"#,
    );

    cmd.arg("--grammar")
        .arg(grammar.path())
        .arg("--start-rule")
        .arg("other")
        .assert()
        .success()
        .stderr(predicates::str::contains("start rule 'other'"));
}

#[test]
fn warns_about_undefined_rule_references() {
    let Ok(mut cmd) = Command::cargo_bin("parsegen") else {
        eprintln!("parsegen binary not built; skipping test");
        return;
    };
    let grammar = grammar_file(
        r#"{
            "start_rule": "start",
            "rules": {
                "start": {
                    "name": "start",
                    "expression": { "type": "rule_ref", "name": "missing" }
                }
            }
        }"#,
    );

    cmd.arg("--grammar")
        .arg(grammar.path())
        .assert()
        .success()
        .stderr(predicates::str::contains(
            "rule 'start' references undefined rule 'missing'",
        ));
}

#[test]
fn missing_grammar_file_fails_cleanly() {
    let Ok(mut cmd) = Command::cargo_bin("parsegen") else {
        eprintln!("parsegen binary not built; skipping test");
        return;
    };
    cmd.arg("--grammar")
        .arg("/nonexistent/path/grammar.json")
        .assert()
        .failure()
        .stderr(predicates::str::contains("failed to read"));
}
