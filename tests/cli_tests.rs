//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn ooxml_schema_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ooxml-schema"))
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("ooxml");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(ooxml_schema_bin())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn run_on_fixtures(args: &[&str]) -> Output {
    let schema = fixtures_dir();
    let mut all: Vec<&str> = args.to_vec();
    all.extend(["--schema", schema.to_str().unwrap()]);
    run(&all)
}

// ============================================================================
// Build Command Tests
// ============================================================================

#[test]
fn test_cli_build_to_file_and_query() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("grammar.json");
    let output = run(&[
        "build",
        fixtures_dir().to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "build should succeed");
    assert!(out.exists(), "grammar file should be written");

    let output = run(&["children", "w:tc", "--schema", out.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.lines().any(|l| l == "w:p"));
    assert!(stdout.lines().any(|l| l == "w:tbl"));
}

#[test]
fn test_cli_build_to_stdout() {
    let output = run(&["build", fixtures_dir().to_str().unwrap(), "--no-synthetic"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert!(json["elements"]["w:p"]["children"].is_array());
    assert!(json["elements"].get("w:settings").is_none());
}

#[test]
fn test_cli_build_missing_source() {
    let output = run(&["build", "/nonexistent/schemas"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "build of missing path should fail");
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_cli_build_verbose_logs_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("grammar.json");
    let build = |verbose: bool| {
        let mut cmd = Command::new(ooxml_schema_bin());
        cmd.env_remove("RUST_LOG")
            .args(["build", fixtures_dir().to_str().unwrap(), "-o", out.to_str().unwrap()]);
        if verbose {
            cmd.arg("-v");
        }
        cmd.output().expect("Failed to execute command")
    };

    let output = build(true);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success());
    assert!(stderr.contains("assembled"), "progress should be logged: {}", stderr);
    assert!(stderr.contains("Could not resolve complex type 'w:customXmlType'"));
    assert!(stderr.contains("1 schema warnings"));

    let output = build(false);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success());
    assert!(!stderr.contains("assembled"));
    assert!(!stderr.contains("schema warnings"));
}

// ============================================================================
// Query Command Tests
// ============================================================================

#[test]
fn test_cli_children() {
    let output = run_on_fixtures(&["children", "w:p"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines.contains(&"w:r"));
    assert!(lines.contains(&"w:bookmarkStart"));
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted, "children should be sorted");
}

#[test]
fn test_cli_children_unknown_element() {
    let output = run_on_fixtures(&["children", "w:nothing"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Unknown element 'w:nothing'"));
}

#[test]
fn test_cli_attrs_json() {
    let output = run_on_fixtures(&["attrs", "w:jc", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["w:val"]["type"], "ST_Jc");
    assert_eq!(json["w:val"]["use"], "required");
}

#[test]
fn test_cli_attrs_text() {
    let output = run_on_fixtures(&["attrs", "w:hyperlink"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("(any attribute)"));
    assert!(stdout.contains("r:id"));
}

#[test]
fn test_cli_tags_filtered() {
    let output = run_on_fixtures(&["tags", "--prefix", "w", "--has-children"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines.contains(&"w:body"));
    assert!(!lines.contains(&"w:t"));
}

#[test]
fn test_cli_namespaces() {
    let output = run_on_fixtures(&["namespaces"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("http://schemas.openxmlformats.org/wordprocessingml/2006/main"));
}

#[test]
fn test_cli_stats_json() {
    let output = run_on_fixtures(&["stats", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert!(json["totalElements"].as_u64().unwrap() > 0);
    assert!(json["byNamespace"]["w"].is_number());
}

#[test]
fn test_cli_classify() {
    let output = run_on_fixtures(&["classify", "w:tbl"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "block");

    let output = run_on_fixtures(&["classify", "w:r", "--json"]);
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["classification"], "inline");
}
