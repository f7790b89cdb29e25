//! CLI Tests
//!
//! Runs the `schemas-to-ts` binary against a scratch project root.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn run(root: &Path, mode: &str, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemas-to-ts"))
        .current_dir(root)
        .env("NODE_ENV", mode)
        .env_remove("RUST_LOG")
        .arg("--input")
        .arg(fixture("article_category.json"))
        .arg("--root")
        .arg(root)
        .arg("--no-format")
        .args(extra)
        .output()
        .unwrap()
}

#[test]
fn test_writes_module_in_development() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), "development", &[]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let written = fs::read_to_string(dir.path().join("types/contentTypes.d.ts")).unwrap();
    assert_eq!(written, include_str!("fixtures/article_category.d.ts"));
}

#[test]
fn test_skips_unaccepted_mode() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), "production", &[]);

    assert!(output.status.success());
    assert!(!dir.path().join("types").exists());
}

#[test]
fn test_stdout_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), "development", &["--stdout"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        include_str!("fixtures/article_category.d.ts")
    );
    assert!(!dir.path().join("types").exists());
}

#[test]
fn test_check_reports_drift() {
    let dir = tempfile::tempdir().unwrap();
    let types = dir.path().join("types");
    fs::create_dir_all(&types).unwrap();
    fs::write(types.join("contentTypes.d.ts"), "export {};\n").unwrap();

    let output = run(dir.path(), "development", &["--check"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("-export {};\n"));

    // The existing file is left alone
    assert_eq!(fs::read_to_string(types.join("contentTypes.d.ts")).unwrap(), "export {};\n");

    fs::write(
        types.join("contentTypes.d.ts"),
        include_str!("fixtures/article_category.d.ts"),
    )
    .unwrap();
    let output = run(dir.path(), "development", &["--check"]);
    assert_eq!(output.status.code(), Some(0));
}
