//! SQLite integration tests for the schemascope CLI.
//!
//! These tests create temporary SQLite databases and run the binary against
//! them.

use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use crate::{run_cli, run_cli_success, stdout_json, table_names};

/// Create a test SQLite database with sample tables.
fn create_test_db(path: &Path) {
    let conn = Connection::open(path).expect("open sqlite db");

    conn.execute_batch(
        r#"
        CREATE TABLE users (
            id INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email VARCHAR(255),
            active BOOLEAN NOT NULL DEFAULT 1
        );

        CREATE TABLE orders (
            id INTEGER PRIMARY KEY NOT NULL,
            user_id INTEGER NOT NULL REFERENCES users(id),
            total DECIMAL(10,2) NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE order_items (
            id INTEGER PRIMARY KEY,
            order_id INTEGER NOT NULL REFERENCES orders(id),
            product_name TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            price REAL NOT NULL
        );
        "#,
    )
    .expect("create test tables");
}

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.display())
}

#[test]
fn test_sqlite_whole_schema_json() {
    let dir = tempdir().expect("create temp dir");
    let db_path = dir.path().join("test.db");
    create_test_db(&db_path);

    let output = run_cli_success(&["--url", &sqlite_url(&db_path), "-f", "json"]);
    let snapshot = stdout_json(&output);

    assert_eq!(snapshot["schema"], "main");
    assert_eq!(snapshot["dialect"], "sqlite");
    assert_eq!(
        table_names(&snapshot),
        vec!["order_items", "orders", "users"]
    );

    let users = &snapshot["tables"][2];
    let id = &users["columns"][0];
    assert_eq!(id["name"], "id");
    assert_eq!(id["notNull"], true);
    assert_eq!(id["dataType"]["sqlType"], "integer");
    assert_eq!(id["codec"], "number");
    assert_eq!(users["columns"][3]["codec"], "boolean");
}

#[test]
fn test_sqlite_bulk_matches_parallel() {
    let dir = tempdir().expect("create temp dir");
    let db_path = dir.path().join("test.db");
    create_test_db(&db_path);
    let url = sqlite_url(&db_path);

    let parallel = stdout_json(&run_cli_success(&["--url", &url, "-f", "json", "-j", "2"]));
    let bulk = stdout_json(&run_cli_success(&[
        "--url",
        &url,
        "-f",
        "json",
        "--strategy",
        "bulk",
    ]));

    assert_eq!(parallel["tables"], bulk["tables"]);
}

#[test]
fn test_sqlite_list_tables() {
    let dir = tempdir().expect("create temp dir");
    let db_path = dir.path().join("test.db");
    create_test_db(&db_path);

    let output = run_cli_success(&["--url", &sqlite_url(&db_path), "--list", "-f", "json", "-c"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        r#"{"schema":"main","tables":["order_items","orders","users"]}"#
    );
}

#[test]
fn test_sqlite_exists_reports_missing_tables() {
    let dir = tempdir().expect("create temp dir");
    let db_path = dir.path().join("test.db");
    create_test_db(&db_path);
    let url = sqlite_url(&db_path);

    let output = run_cli_success(&["--url", &url, "--exists", "users", "orders"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("main.users: found"));
    assert!(stdout.contains("main.orders: found"));

    let output = run_cli(&["--url", &url, "--exists", "users", "ghosts"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("main.ghosts: missing"));
}

#[test]
fn test_sqlite_named_tables_to_file() {
    let dir = tempdir().expect("create temp dir");
    let db_path = dir.path().join("test.db");
    let out_path = dir.path().join("snapshot.json");
    create_test_db(&db_path);

    let output = run_cli(&[
        "--url",
        &sqlite_url(&db_path),
        "-f",
        "json",
        "-o",
        out_path.to_str().unwrap(),
        "orders",
        "missing_table",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing_table"), "stderr: {stderr}");

    let written = fs::read_to_string(&out_path).expect("read snapshot");
    let snapshot: serde_json::Value = serde_json::from_str(&written).expect("valid json");
    assert_eq!(table_names(&snapshot), vec!["orders"]);
    let total = &snapshot["tables"][0]["columns"][2];
    assert_eq!(total["name"], "total");
    assert_eq!(total["dataType"]["name"], "decimal(10,2)");
    assert_eq!(total["dataType"]["sqlType"], "decimal");
}

#[test]
fn test_sqlite_table_output() {
    let dir = tempdir().expect("create temp dir");
    let db_path = dir.path().join("test.db");
    create_test_db(&db_path);

    let output = run_cli_success(&["--url", &sqlite_url(&db_path), "users"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SchemaScope Catalog"));
    assert!(stdout.contains("Schema: main (sqlite) | 1 tables | 4 columns"));
    assert!(stdout.contains("varchar(255)"));
}

#[test]
fn test_unsupported_url_is_config_error() {
    let output = run_cli(&["--url", "oracle://localhost/db"]);
    assert_eq!(output.status.code(), Some(66));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("schemascope: error:"));
}

#[test]
fn test_json_schema_without_url() {
    let output = run_cli_success(&["--json-schema", "-c"]);
    let schema = stdout_json(&output);
    assert_eq!(schema["title"], "SchemaSnapshot");
}
