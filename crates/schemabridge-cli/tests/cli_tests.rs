//! CLI integration tests for schemabridge.
//!
//! These tests verify command-line argument parsing, help output,
//! command output and exit codes for various error conditions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

/// Get a command for the schemabridge binary.
fn cmd() -> Command {
    Command::cargo_bin("schemabridge").unwrap()
}

const SHOP_YAML: &str = r#"
name: shop
tables:
  - name: users
    fields:
      - { name: id, data_type: integer, nullable: false }
      - { name: email, data_type: "varchar(255)" }
      - { name: status, data_type: user_status }
triggers:
  - name: audit_users
    definition: EXECUTE FUNCTION audit()
types:
  - name: user_status
    category: enum
    values: [active, inactive]
"#;

fn schema_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(SHOP_YAML.as_bytes()).unwrap();
    file
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("databases"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("matrix"))
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("init-config"));
}

#[test]
fn test_convert_subcommand_help() {
    cmd()
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--schema"))
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("analysis-only"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("schemabridge"));
}

#[test]
fn test_global_flags_exist() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-json"))
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("--verbosity"));
}

#[test]
fn test_missing_subcommand_fails() {
    cmd().assert().failure();
}

// =============================================================================
// Catalog Commands
// =============================================================================

#[test]
fn test_databases_lists_registry() {
    cmd()
        .arg("databases")
        .assert()
        .success()
        .stdout(predicate::str::contains("postgresql"))
        .stdout(predicate::str::contains("mongodb"))
        .stdout(predicate::str::contains("[document]"));
}

#[test]
fn test_databases_json() {
    let output = cmd().args(["--output-json", "databases"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|db| db["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"neo4j"));
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_resolve_type() {
    cmd()
        .args(["resolve", "--from", "postgresql", "--to", "mysql", "varchar(255)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("varchar(255) -> varchar(255)"));
}

#[test]
fn test_resolve_unknown_type_exit_code() {
    cmd()
        .args(["resolve", "--from", "postgresql", "--to", "mysql", "frobnicator"])
        .assert()
        .code(5);
}

#[test]
fn test_matrix_output() {
    cmd()
        .args(["matrix", "--from", "postgresql", "--to", "mongodb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Complexity: complex"))
        .stdout(predicate::str::contains("denormalization"));
}

#[test]
fn test_matrix_json_with_alias() {
    let output = cmd()
        .args(["--output-json", "matrix", "--from", "PG", "--to", "mongo"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["source_db"], "postgresql");
    assert_eq!(json["target_db"], "mongodb");
    assert_eq!(json["compatibility"], "incompatible");
}

#[test]
fn test_unknown_database_exit_code() {
    cmd()
        .args(["matrix", "--from", "postgresql", "--to", "nosuchdb"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("nosuchdb"));
}

#[test]
fn test_path_direct() {
    cmd()
        .args(["path", "--from", "mysql", "--to", "mariadb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mysql -> mariadb (trivial)"));
}

// =============================================================================
// Convert Tests
// =============================================================================

#[test]
fn test_convert_to_mongodb() {
    let schema = schema_file();
    let output = cmd()
        .args(["--output-json", "convert", "--from", "postgresql", "--to", "mongodb"])
        .arg("--schema")
        .arg(schema.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["schema"]["collections"][0]["name"], "users");
    assert_eq!(json["report"]["object_stats"]["trigger"]["dropped"], 1);
}

#[test]
fn test_convert_writes_output_file() {
    let schema = schema_file();
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("converted.json");
    cmd()
        .args(["convert", "--from", "postgresql", "--to", "mysql"])
        .arg("--schema")
        .arg(schema.path())
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversion completed!"));

    let content = std::fs::read_to_string(&out).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["tables"][0]["fields"][2]["data_type"], "ENUM('active', 'inactive')");
}

#[test]
fn test_convert_analysis_only() {
    let schema = schema_file();
    cmd()
        .args(["convert", "--from", "postgresql", "--to", "neo4j", "--mode", "analysis-only"])
        .arg("--schema")
        .arg(schema.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Analysis completed!"));
}

#[test]
fn test_convert_same_database_fails() {
    let schema = schema_file();
    cmd()
        .args(["convert", "--from", "postgresql", "--to", "postgres"])
        .arg("--schema")
        .arg(schema.path())
        .assert()
        .code(3);
}

#[test]
fn test_convert_missing_schema_file() {
    cmd()
        .args(["convert", "--from", "postgresql", "--to", "mysql", "--schema", "/nonexistent/schema.yaml"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_convert_with_preferences() {
    let schema = schema_file();
    let mut prefs = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(prefs, "excluded_object_types: [trigger]").unwrap();
    let output = cmd()
        .args(["--output-json", "convert", "--from", "postgresql", "--to", "mongodb"])
        .arg("--schema")
        .arg(schema.path())
        .arg("--preferences")
        .arg(prefs.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["report"]["object_stats"]["trigger"]["skipped"], 1);
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_init_config_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schemabridge.yaml");
    cmd()
        .args(["init-config", "--output"])
        .arg(&path)
        .assert()
        .success();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("estimator"));
    assert!(content.contains("fail_on_impossible"));

    // Refuses to overwrite without --force
    cmd()
        .args(["init-config", "--output"])
        .arg(&path)
        .assert()
        .code(2);
    cmd()
        .args(["init-config", "--force", "--output"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_invalid_config_exit_code() {
    let mut config = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(config, "estimator:\n  success_rates:\n    trivial: 1.5").unwrap();
    cmd()
        .arg("--config")
        .arg(config.path())
        .arg("databases")
        .assert()
        .code(2);
}

#[test]
fn test_invalid_mode_rejected() {
    let schema = schema_file();
    cmd()
        .args(["convert", "--from", "postgresql", "--to", "mysql", "--mode", "turbo"])
        .arg("--schema")
        .arg(schema.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("turbo"));
}
