//! CLI smoke tests for mortar.
//!
//! These tests verify that the commands run end to end against real
//! scratch directories and return appropriate exit codes. Scripts that
//! reach the descriptor-emission path pin their toolchain explicitly so
//! no host compiler is required.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a Command for the mortar binary.
fn mortar_cmd() -> Command {
    Command::cargo_bin("mortar").unwrap()
}

/// Create a scratch project: a build.lua with `content` and a build dir.
fn scratch_project(content: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("build")).unwrap();
    fs::write(temp.path().join("build.lua"), content).unwrap();
    temp
}

const EMIT_SCRIPT: &str = r#"
p = project("demo")
autoconfigure(p, false)
compiler(p, "cc")
sources(p, glob_files("*.c"))
build(p)
"#;

// =============================================================================
// Help & version
// =============================================================================

#[test]
fn help_flag_works() {
    mortar_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_command_reports_engine_version() {
    mortar_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.1"));
}

#[test]
fn unknown_command_fails() {
    mortar_cmd().arg("frobnicate").assert().failure();
}

// =============================================================================
// configure
// =============================================================================

#[test]
fn configure_scaffolds_build_dir_and_script() {
    let temp = TempDir::new().unwrap();

    mortar_cmd()
        .current_dir(temp.path())
        .arg("configure")
        .assert()
        .success();

    assert!(temp.path().join("build").is_dir());
    assert!(temp.path().join("build.lua").is_file());
}

#[test]
fn configure_fails_when_build_dir_exists() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("build")).unwrap();

    mortar_cmd()
        .current_dir(temp.path())
        .arg("configure")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// =============================================================================
// build
// =============================================================================

#[test]
fn build_rejects_missing_path() {
    mortar_cmd()
        .args(["build", "/no/such/place"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn build_rejects_directory_without_script() {
    let temp = TempDir::new().unwrap();

    mortar_cmd()
        .arg("build")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no build.lua found"));
}

#[test]
fn build_accepts_directory_containing_script() {
    let temp = scratch_project(EMIT_SCRIPT);
    fs::write(temp.path().join("main.c"), "int main(){}").unwrap();

    mortar_cmd().arg("build").arg(temp.path()).assert().success();

    let ninja = fs::read_to_string(temp.path().join("build/build.ninja")).unwrap();
    assert!(ninja.contains("rule cc"));
    assert!(ninja.contains("main_c.o: cc"));
    assert!(ninja.contains("demo: link"));
}

#[test]
fn build_accepts_script_path_directly() {
    let temp = scratch_project(EMIT_SCRIPT);
    fs::write(temp.path().join("main.c"), "int main(){}").unwrap();

    mortar_cmd()
        .arg("build")
        .arg(temp.path().join("build.lua"))
        .assert()
        .success();

    assert!(temp.path().join("build/build.ninja").is_file());
}

#[test]
fn build_surfaces_script_errors() {
    let temp = scratch_project("this is not lua");

    mortar_cmd()
        .arg("build")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("lua runtime error"));
}

#[test]
fn build_surfaces_version_mismatch() {
    let temp = scratch_project("version(9.9)");

    mortar_cmd()
        .arg("build")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires mortar 9.9"));
}

#[test]
fn builddir_flag_overrides_script_dir() {
    let temp = scratch_project(EMIT_SCRIPT);
    fs::write(temp.path().join("main.c"), "int main(){}").unwrap();
    fs::create_dir(temp.path().join("out")).unwrap();

    mortar_cmd()
        .arg("build")
        .arg(temp.path())
        .args(["--builddir", "out"])
        .assert()
        .success();

    assert!(temp.path().join("out/build.ninja").is_file());
    assert!(!temp.path().join("build/build.ninja").exists());
}

#[test]
fn emitted_descriptor_is_stable_across_runs() {
    let temp = scratch_project(EMIT_SCRIPT);
    fs::write(temp.path().join("main.c"), "int main(){}").unwrap();

    mortar_cmd().arg("build").arg(temp.path()).assert().success();
    let first = fs::read_to_string(temp.path().join("build/build.ninja")).unwrap();

    mortar_cmd().arg("build").arg(temp.path()).assert().success();
    let second = fs::read_to_string(temp.path().join("build/build.ninja")).unwrap();

    assert_eq!(first, second);
}
