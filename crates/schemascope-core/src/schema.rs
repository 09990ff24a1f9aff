//! Schema metadata: the capability-resolution root for introspection.

use crate::dialect::Dialect;
use crate::feature::{Feature, FeatureRegistry};
use crate::types::TableMetadata;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// A database schema: its name, dialect, optional capabilities and the
/// tables loaded into it so far.
pub struct SchemaMetadata {
    name: String,
    dialect: Arc<dyn Dialect>,
    features: FeatureRegistry,
    tables: DashMap<String, TableMetadata>,
}

impl SchemaMetadata {
    pub fn new(name: impl Into<String>, dialect: Arc<dyn Dialect>) -> Self {
        Self {
            name: name.into(),
            dialect,
            features: FeatureRegistry::new(),
            tables: DashMap::new(),
        }
    }

    /// Builder-style capability registration.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.register(feature);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    /// A fresh table bound to this schema, alias set to its name.
    pub fn new_table(&self, name: &str) -> TableMetadata {
        TableMetadata::new(name)
    }

    /// Stores a table, returning the one it replaced.
    pub fn add_table(&self, table: TableMetadata) -> Option<TableMetadata> {
        self.tables.insert(table.name.clone(), table)
    }

    pub fn table(&self, name: &str) -> Option<TableMetadata> {
        self.tables.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn remove_table(&self, name: &str) -> Option<TableMetadata> {
        self.tables.remove(name).map(|(_, table)| table)
    }

    /// Loaded tables sorted by name.
    pub fn tables(&self) -> Vec<TableMetadata> {
        let mut tables: Vec<_> = self.tables.iter().map(|e| e.value().clone()).collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        tables
    }

    /// Loaded table names sorted.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tables.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl fmt::Debug for SchemaMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaMetadata")
            .field("name", &self.name)
            .field("dialect", &self.dialect.name())
            .field("features", &self.features)
            .field("tables", &self.tables.len())
            .finish()
    }
}
