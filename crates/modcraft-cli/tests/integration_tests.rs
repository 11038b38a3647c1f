//! Integration tests for the modcraft binary.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary isolated from the user's config file and environment.
fn modcraft(sandbox: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("modcraft");
    cmd.env("XDG_CONFIG_HOME", sandbox.join("xdg"))
        .env("HOME", sandbox)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("MODCRAFT_LOG")
        .env_remove("MODCRAFT_HOOKS__ENABLED")
        .env_remove("MODCRAFT_PROJECT__MODULE_PREFIX")
        .current_dir(sandbox);
    cmd
}

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap_or_else(|e| panic!("reading {path}: {e}"))
}

#[test]
fn help_lists_commands() {
    let tmp = TempDir::new().unwrap();
    modcraft(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn version_flag() {
    let tmp = TempDir::new().unwrap();
    modcraft(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn list_shows_every_builtin() {
    let tmp = TempDir::new().unwrap();
    modcraft(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("NAME"))
        .stdout(predicate::str::contains("platform:base"))
        .stdout(predicate::str::contains("http:gin"))
        .stdout(predicate::str::contains("http:chi"))
        .stdout(predicate::str::contains("grpc:server"))
        .stdout(predicate::str::contains("db:gorm"))
        .stdout(predicate::str::contains("feature:makefile"));
}

#[test]
fn list_json_is_sorted_by_name() {
    let tmp = TempDir::new().unwrap();
    let out = modcraft(tmp.path())
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let modules: Vec<serde_json::Value> = serde_json::from_slice(&out.stdout).unwrap();
    let names: Vec<&str> = modules.iter().map(|m| m["name"].as_str().unwrap()).collect();
    assert_eq!(names.len(), 8);
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert!(modules.iter().all(|m| m["version"].is_string()));
}

#[test]
fn list_filters_by_tag() {
    let tmp = TempDir::new().unwrap();
    modcraft(tmp.path())
        .args(["list", "--tag", "http", "--format", "list"])
        .assert()
        .success()
        .stdout("http:chi\nhttp:gin\n");
}

#[test]
fn new_generates_base_project() {
    let tmp = TempDir::new().unwrap();
    modcraft(tmp.path())
        .args(["new", "demo", "--no-hooks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project 'demo' created!"));

    let root = tmp.path().join("demo");
    assert!(read(&root, "go.mod").starts_with("module github.com/you/demo\n"));
    assert!(root.join("cmd/demo/main.go").is_file());
    assert!(read(&root, "internal/platform/di/root.go").contains("return fx.Options("));
    assert!(read(&root, "config/config.yml").contains("demo"));
    assert!(!root.join(".git").exists());
}

#[test]
fn new_with_modules_and_values() {
    let tmp = TempDir::new().unwrap();
    modcraft(tmp.path())
        .args([
            "new",
            "orders",
            "--module",
            "github.com/acme/orders",
            "--with",
            "http:chi,db:gorm",
            "--set",
            "gorm.driver=postgres",
            "--output",
            "services",
            "--no-hooks",
        ])
        .assert()
        .success();

    let root = tmp.path().join("services/orders");
    let root_go = read(&root, "internal/platform/di/root.go");
    assert!(root_go.contains("\"github.com/acme/orders/internal/adapters/inbound/http/chi\""));
    assert!(root_go.contains("gormdb.Module()"));

    let go_mod = read(&root, "go.mod");
    assert!(go_mod.contains("github.com/go-chi/chi/v5 v5.0.12"));
    assert!(go_mod.contains("gorm.io/driver/postgres"));
    assert!(read(&root, "config/config.yml").contains("postgres"));
}

#[test]
fn new_dry_run_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    modcraft(tmp.path())
        .args(["new", "demo", "--with", "http:gin", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("platform:base"))
        .stdout(predicate::str::contains("http:gin"));
    assert!(!tmp.path().join("demo").exists());
}

#[test]
fn add_to_generated_project_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    modcraft(tmp.path())
        .args(["new", "demo", "--no-hooks"])
        .assert()
        .success();
    let root = tmp.path().join("demo");

    modcraft(tmp.path())
        .args(["add", "http:gin", "--dir", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("applied http:gin"))
        .stdout(predicate::str::contains("skipped platform:base"));

    let root_go = read(&root, "internal/platform/di/root.go");
    assert!(root_go.contains("httpgin.Module()"));
    assert!(read(&root, "go.mod").contains("github.com/gin-gonic/gin v1.10.0"));
    assert!(read(&root, "config/config.yml").contains(":8080"));

    modcraft(tmp.path())
        .args(["add", "http:gin", "--dir", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to do"));
    assert_eq!(read(&root, "internal/platform/di/root.go"), root_go);
}

#[test]
fn add_reads_module_path_from_go_mod() {
    let tmp = TempDir::new().unwrap();
    modcraft(tmp.path())
        .args(["new", "svc", "--module", "example.org/team/svc", "--no-hooks"])
        .assert()
        .success();

    modcraft(&tmp.path().join("svc"))
        .args(["add", "grpc:server"])
        .assert()
        .success();

    let root_go = read(&tmp.path().join("svc"), "internal/platform/di/root.go");
    assert!(root_go.contains("\"example.org/team/svc/internal/adapters/inbound/grpc/server\""));
}

#[test]
fn completions_for_bash() {
    let tmp = TempDir::new().unwrap();
    modcraft(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modcraft"));
}

#[test]
fn config_get_respects_environment() {
    let tmp = TempDir::new().unwrap();
    modcraft(tmp.path())
        .args(["config", "get", "hooks.enabled"])
        .assert()
        .success()
        .stdout("true\n");

    modcraft(tmp.path())
        .env("MODCRAFT_HOOKS__ENABLED", "false")
        .args(["config", "get", "hooks.enabled"])
        .assert()
        .success()
        .stdout("false\n");
}

#[test]
fn config_file_sets_module_prefix() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("modcraft.toml");
    fs::write(&config, "[project]\nmodule_prefix = \"gitlab.com/acme\"\n").unwrap();

    modcraft(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["new", "billing", "--no-hooks"])
        .assert()
        .success();

    assert!(read(&tmp.path().join("billing"), "go.mod").starts_with("module gitlab.com/acme/billing\n"));
}
