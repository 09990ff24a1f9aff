//! Serializable result of one introspection run.

use super::table::TableMetadata;
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// All tables of one schema as introspected at `collected_at`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSnapshot {
    /// Schema name the catalog queries were scoped to.
    pub schema: String,

    /// Dialect that produced the catalog SQL.
    pub dialect: String,

    /// RFC 3339 timestamp of the introspection run.
    pub collected_at: String,

    /// Tables sorted by name.
    pub tables: Vec<TableMetadata>,
}

impl SchemaSnapshot {
    /// Builds a snapshot stamped with the current time, sorting tables by name.
    pub fn new(
        schema: impl Into<String>,
        dialect: impl Into<String>,
        mut tables: Vec<TableMetadata>,
    ) -> Self {
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            schema: schema.into(),
            dialect: dialect.into(),
            collected_at: Utc::now().to_rfc3339(),
            tables,
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableMetadata> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns().len()).sum()
    }
}
