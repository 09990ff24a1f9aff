//! Table, column and index metadata.

use super::data_type::DataType;
use super::property::{Properties, PropertyValue, OLD_NAME_PROPERTY};
use crate::codec::ValueCodec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

/// One introspected table.
///
/// Once returned by a parser this is a complete snapshot; it is not kept in
/// sync with the database.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    pub name: String,

    /// Display alias, defaults to the name.
    pub alias: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Columns in catalog order, unique by name.
    #[serde(default)]
    columns: Vec<ColumnMetadata>,

    /// Position of each column in `columns`, keyed by name.
    #[serde(skip)]
    positions: HashMap<String, usize>,

    #[serde(default)]
    pub indexes: Vec<IndexMetadata>,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            alias: name.clone(),
            name,
            comment: None,
            columns: Vec::new(),
            positions: HashMap::new(),
            indexes: Vec::new(),
        }
    }

    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.alias = alias.into();
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    /// Adds a column, replacing any existing column with the same name.
    pub fn add_column(&mut self, column: ColumnMetadata) {
        // Deserialized tables arrive without positions.
        if self.positions.len() != self.columns.len() {
            self.positions = self
                .columns
                .iter()
                .enumerate()
                .map(|(index, c)| (c.name.clone(), index))
                .collect();
        }

        match self.positions.get(&column.name) {
            Some(&index) => self.columns[index] = column,
            None => {
                self.positions.insert(column.name.clone(), self.columns.len());
                self.columns.push(column);
            }
        }
    }

    /// Columns in catalog order.
    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    pub fn add_index(&mut self, index: IndexMetadata) {
        self.indexes.push(index);
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        if self.positions.len() == self.columns.len() {
            self.positions.get(name).and_then(|&index| self.columns.get(index))
        } else {
            self.columns.iter().find(|c| c.name == name)
        }
    }

    /// Case-insensitive column lookup.
    pub fn find_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// One introspected column with its type already resolved.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default)]
    pub not_null: bool,

    #[serde(default)]
    pub length: i64,

    #[serde(default)]
    pub precision: i64,

    #[serde(default)]
    pub scale: i64,

    pub data_type: DataType,

    /// Resolved value codec, serialized by name.
    #[serde(
        rename = "codec",
        default,
        skip_deserializing,
        serialize_with = "serialize_codec_name",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub value_codec: Option<Arc<dyn ValueCodec>>,

    /// Dialect-specific extras not promoted to fields.
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            comment: None,
            not_null: false,
            length: 0,
            precision: 0,
            scale: 0,
            data_type,
            value_codec: None,
            properties: Properties::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_not_null(mut self, not_null: bool) -> Self {
        self.not_null = not_null;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Name as first seen in the catalog, used downstream to detect renames.
    pub fn old_name(&self) -> Option<&str> {
        self.property(OLD_NAME_PROPERTY).and_then(PropertyValue::as_str)
    }

    pub fn set_value_codec(&mut self, codec: Arc<dyn ValueCodec>) {
        self.value_codec = Some(codec);
    }

    pub fn codec_name(&self) -> Option<&str> {
        self.value_codec.as_deref().map(|codec| codec.name())
    }
}

fn serialize_codec_name<S>(codec: &Option<Arc<dyn ValueCodec>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match codec {
        Some(codec) => serializer.serialize_some(codec.name()),
        None => serializer.serialize_none(),
    }
}

/// Sort direction of an indexed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndexColumn {
    pub name: String,
    #[serde(default)]
    pub sort: SortOrder,
}

/// One index, keyed to its table by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetadata {
    pub name: String,
    pub table_name: String,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub columns: Vec<IndexColumn>,
}

impl IndexMetadata {
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            unique: false,
            primary_key: false,
            columns: Vec::new(),
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.unique = true;
        self
    }

    pub fn with_column(mut self, name: impl Into<String>, sort: SortOrder) -> Self {
        self.columns.push(IndexColumn {
            name: name.into(),
            sort,
        });
        self
    }
}
