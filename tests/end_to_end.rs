use std::process::Command;

use assert_cmd::prelude::*;

/// Drives the real `rocks` binary over a whole script, matching spec's
/// end-to-end scenarios (source → stdout/stderr/exit).
fn rocks() -> Command {
    Command::cargo_bin("rocks").expect("rocks binary to build")
}

#[test]
fn division_by_zero_exits_70_with_runtime_error_on_stderr() {
    rocks()
        .arg("tests/fixtures/division_by_zero.rocks")
        .assert()
        .failure()
        .code(70)
        .stderr("[line 1] Error: Division by zero.\n");
}

#[test]
fn top_level_return_exits_65_with_resolve_error_on_stderr() {
    rocks()
        .arg("tests/fixtures/top_level_return.rocks")
        .assert()
        .failure()
        .code(65)
        .stderr("[line 1] Error at 'return': Cannot return from top-level code.\n");
}

#[test]
fn too_many_arguments_exits_64() {
    rocks()
        .arg("one")
        .arg("two")
        .assert()
        .failure()
        .code(64);
}

#[test]
fn missing_script_file_exits_74() {
    rocks()
        .arg("tests/fixtures/does_not_exist.rocks")
        .assert()
        .failure()
        .code(74);
}
