//! JSON output formatting.

use schemascope_core::SchemaSnapshot;
use serde::Serialize;
use serde_json::json;

fn render<T: Serialize + ?Sized>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

/// Format the snapshot as JSON.
///
/// If `compact` is true, outputs minified JSON without whitespace.
pub fn format_json(snapshot: &SchemaSnapshot, compact: bool) -> serde_json::Result<String> {
    render(snapshot, compact)
}

/// JSON schema describing [`format_json`] output.
pub fn format_json_schema(compact: bool) -> serde_json::Result<String> {
    render(&schemars::schema_for!(SchemaSnapshot), compact)
}

pub fn format_names_json(schema: &str, names: &[String], compact: bool) -> serde_json::Result<String> {
    render(&json!({ "schema": schema, "tables": names }), compact)
}

pub fn format_existence_json(
    schema: &str,
    results: &[(String, bool)],
    compact: bool,
) -> serde_json::Result<String> {
    let tables: serde_json::Map<String, serde_json::Value> = results
        .iter()
        .map(|(name, exists)| (name.clone(), json!(exists)))
        .collect();
    render(&json!({ "schema": schema, "tables": tables }), compact)
}
