//! CLI integration tests.
//!
//! These run the built binaries via `std::process::Command` against a
//! temporary config. None of them reach the network: harvests use an empty
//! project list and report tools only read the snapshot.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Write a config whose snapshot lives at `cache_file`.
fn write_config(dir: &Path, cache_file: &Path) -> PathBuf {
    let config = serde_json::json!({
        "projects": [],
        "cache_file": cache_file,
        "products_file": fixture("redhat_products.json"),
        "api_base_url": "http://127.0.0.1:9",
    });
    let path = dir.join("config.json");
    fs::write(&path, config.to_string()).unwrap();
    path
}

fn run(bin: &str, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute binary")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("invalid UTF-8")
}

fn fixture_config(dir: &TempDir) -> PathBuf {
    write_config(dir.path(), &fixture("graph.nt"))
}

#[test]
fn every_tool_reports_its_version() {
    for bin in [
        env!("CARGO_BIN_EXE_forge2rdf"),
        env!("CARGO_BIN_EXE_forge2rdf-deps"),
        env!("CARGO_BIN_EXE_forge2rdf-map"),
        env!("CARGO_BIN_EXE_forge2rdf-overview"),
    ] {
        let out = stdout(&run(bin, &["--version"]));
        assert!(out.contains(env!("CARGO_PKG_VERSION")), "{bin}: {out}");
    }
}

#[test]
fn map_renders_fixture_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(&dir);
    let out = stdout(&run(
        env!("CARGO_BIN_EXE_forge2rdf-map"),
        &["-c", config.to_str().unwrap()],
    ));
    assert!(out.starts_with("## [kubernetes](https://api.github.com/repos/kubernetes/kubernetes)\n"));
    assert!(out.contains("## [origin](https://api.github.com/repos/openshift/origin)"));
    assert!(out.contains(" * [kubernetes](https://api.github.com/repos/kubernetes/kubernetes)"));
}

#[test]
fn overview_renders_fixture_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(&dir);
    let out = stdout(&run(
        env!("CARGO_BIN_EXE_forge2rdf-overview"),
        &["-c", config.to_str().unwrap()],
    ));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Red Hat Enterprise Linux",
            "OpenShift Enterprise includes origin which uses kubernetes",
        ]
    );
}

#[test]
fn report_without_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &dir.path().join("missing.nt"));
    for bin in [
        env!("CARGO_BIN_EXE_forge2rdf-map"),
        env!("CARGO_BIN_EXE_forge2rdf-overview"),
        env!("CARGO_BIN_EXE_forge2rdf-deps"),
    ] {
        let output = run(bin, &["-c", config.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(1), "{bin}");
        assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
    }
}

#[test]
fn missing_config_fails() {
    let output = run(
        env!("CARGO_BIN_EXE_forge2rdf-map"),
        &["-c", "/nonexistent/config.json"],
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn deps_with_no_candidates_is_quiet() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(&dir);
    let out = stdout(&run(
        env!("CARGO_BIN_EXE_forge2rdf-deps"),
        &["-c", config.to_str().unwrap(), "--language", "Rust"],
    ));
    assert_eq!(out, "");
}

#[test]
fn harvest_writes_overlay_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("tmp").join("database.nt");
    let config = write_config(dir.path(), &snapshot);

    let output = run(
        env!("CARGO_BIN_EXE_forge2rdf"),
        &["-c", config.to_str().unwrap(), "-q"],
    );
    assert_eq!(stdout(&output), "");
    assert!(output.stderr.is_empty());

    let text = fs::read_to_string(&snapshot).unwrap();
    assert!(text.contains(
        "<https://www.redhat.com/> <http://schema.org/version/3.1/legalName> \"Red Hat, Inc.\" ."
    ));
    assert!(text.contains(
        "<https://access.redhat.com/products/red-hat-enterprise-linux/> <http://schema.org/version/3.1/name> \"Red Hat Enterprise Linux\" ."
    ));

    // A second run adds nothing new.
    let before = text.lines().filter(|l| !l.starts_with('#')).count();
    stdout(&run(
        env!("CARGO_BIN_EXE_forge2rdf"),
        &["-c", config.to_str().unwrap(), "-q"],
    ));
    let after = fs::read_to_string(&snapshot).unwrap();
    assert_eq!(after.lines().filter(|l| !l.starts_with('#')).count(), before);
}

#[test]
fn disabled_cache_policy_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("database.nt");
    let config = write_config(dir.path(), &snapshot);

    let output = run(
        env!("CARGO_BIN_EXE_forge2rdf"),
        &[
            "-c",
            config.to_str().unwrap(),
            "--cache-policy",
            "disabled",
        ],
    );
    stdout(&output);
    assert!(!snapshot.exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Harvested 0 project(s)"));
}

#[test]
fn verbose_turtle_dump() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &dir.path().join("database.nt"));
    let out = stdout(&run(
        env!("CARGO_BIN_EXE_forge2rdf"),
        &["-c", config.to_str().unwrap(), "-v", "-q", "-f", "turtle"],
    ));
    assert!(out.contains("@prefix so: <http://schema.org/version/3.1/> ."));
    assert!(out.contains("so:legalName"));
}

#[test]
fn unknown_dump_format_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &dir.path().join("database.nt"));
    let output = run(
        env!("CARGO_BIN_EXE_forge2rdf"),
        &["-c", config.to_str().unwrap(), "-v", "-f", "rdfxml"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown format: rdfxml"));
}

#[test]
fn harvest_picks_up_seed_file_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(
        fixture("redhat_products.json"),
        dir.path().join("redhat_products.json"),
    )
    .unwrap();
    let config = serde_json::json!({
        "projects": [],
        "cache_file": "tmp/database.nt",
        "api_base_url": "http://127.0.0.1:9",
    });
    fs::write(dir.path().join("config.json"), config.to_string()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_forge2rdf"))
        .arg("-q")
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    stdout(&output);

    let text = fs::read_to_string(dir.path().join("tmp/database.nt")).unwrap();
    assert!(text.contains(
        "<https://access.redhat.com/products/red-hat-enterprise-linux/> <http://schema.org/version/3.1/applicationCategory> \"Platforms\" ."
    ));

    let overview = Command::new(env!("CARGO_BIN_EXE_forge2rdf-overview"))
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    let out = stdout(&overview);
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec!["OpenShift Enterprise", "Red Hat Enterprise Linux"]
    );
}
