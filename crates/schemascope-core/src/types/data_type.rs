//! Normalized, vendor-independent column types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vendor-independent type classification.
///
/// These represent the fundamental SQL type categories that dialect-native
/// type names are mapped onto.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    Integer,
    Decimal,
    Float,
    Text,
    Boolean,
    Timestamp,
    Date,
    Time,
    Binary,
    Json,
    Array,
    Uuid,
    #[default]
    Unknown,
}

impl SqlType {
    /// Returns the canonical type name as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SqlType::Integer => "integer",
            SqlType::Decimal => "decimal",
            SqlType::Float => "float",
            SqlType::Text => "text",
            SqlType::Boolean => "boolean",
            SqlType::Timestamp => "timestamp",
            SqlType::Date => "date",
            SqlType::Time => "time",
            SqlType::Binary => "binary",
            SqlType::Json => "json",
            SqlType::Array => "array",
            SqlType::Uuid => "uuid",
            SqlType::Unknown => "unknown",
        }
    }

    pub const fn is_numeric(&self) -> bool {
        matches!(self, SqlType::Integer | SqlType::Decimal | SqlType::Float)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column's resolved type: the native name plus its normalized category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataType {
    /// Lower-cased native type name as reported by the catalog.
    pub name: String,
    /// Normalized category.
    pub sql_type: SqlType,
}

impl DataType {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.sql_type)
        } else {
            write!(f, "{} ({})", self.name, self.sql_type)
        }
    }
}

/// Strips size/precision arguments and modifiers: `varchar(255)` -> `varchar`,
/// `int unsigned` -> `int`, `timestamp with time zone` -> `timestamp`.
pub fn base_type_name(type_name: &str) -> String {
    let lower = type_name.trim().to_ascii_lowercase();
    let base = lower.split('(').next().unwrap_or_default();
    base.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Maps a native type name onto a normalized category.
///
/// This is the dialect-neutral baseline; dialects layer their own rules on
/// top of it. The lookup is case-insensitive and ignores size arguments.
///
/// ```
/// use schemascope_core::{normalize_type_name, SqlType};
///
/// assert_eq!(normalize_type_name("INT64"), Some(SqlType::Integer));
/// assert_eq!(normalize_type_name("varchar(100)"), Some(SqlType::Text));
/// assert_eq!(normalize_type_name("UNKNOWN_TYPE"), None);
/// ```
pub fn normalize_type_name(type_name: &str) -> Option<SqlType> {
    let base = base_type_name(type_name);
    match base.as_str() {
        "array" => Some(SqlType::Array),
        "binary" | "varbinary" | "bytea" | "blob" | "bytes" | "tinyblob" | "mediumblob"
        | "longblob" | "image" => Some(SqlType::Binary),
        "bool" | "boolean" | "bit" => Some(SqlType::Boolean),
        "date" => Some(SqlType::Date),
        "decimal" | "numeric" | "number" | "money" | "dec" => Some(SqlType::Decimal),
        "float" | "float4" | "float8" | "double" | "real" => Some(SqlType::Float),
        "int" | "int4" | "integer" | "int64" | "bigint" | "smallint" | "tinyint" | "int2"
        | "int8" | "mediumint" | "serial" | "bigserial" | "smallserial" => Some(SqlType::Integer),
        "json" | "jsonb" | "variant" | "object" => Some(SqlType::Json),
        "varchar" | "char" | "text" | "string" | "nvarchar" | "nchar" | "character"
        | "tinytext" | "mediumtext" | "longtext" | "clob" | "bpchar" | "enum" | "set"
        | "citext" | "name" => Some(SqlType::Text),
        "time" | "timetz" => Some(SqlType::Time),
        "timestamp" | "timestamptz" | "datetime" | "datetime2" | "timestamp_ntz"
        | "timestamp_ltz" | "timestamp_tz" => Some(SqlType::Timestamp),
        "uuid" | "uniqueidentifier" => Some(SqlType::Uuid),
        _ => None,
    }
}
