//! Per-vendor catalog SQL and type conversion.
//!
//! The engine never branches on the database vendor. Everything
//! vendor-specific lives behind the [`Dialect`] trait, which is chosen once
//! when a [`crate::SchemaMetadata`] is built.
//!
//! Templates use `#{schema}` and `#{table}` named placeholders (see
//! [`crate::SqlRequest::template`]). Passing `None` as the table to
//! [`Dialect::table_meta_sql`] or [`Dialect::table_comment_sql`] selects the
//! all-tables variant: it must project a `table_name` column and filter with
//! `LIKE #{table}` so that a `%%` wildcard matches every table.

mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::executor::PlaceholderStyle;
use crate::types::DataType;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Vendor-specific catalog SQL plus native type conversion.
pub trait Dialect: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns one row with a numeric `total` column; params `schema`, `table`.
    fn table_exists_sql(&self) -> String;

    /// Returns one `name` column per table; param `schema`.
    fn all_tables_sql(&self) -> String;

    /// Returns `comment` (and `table_name` for the all-tables variant).
    fn table_comment_sql(&self, table: Option<&str>) -> String;

    /// Returns one row per column with `name`, `data_type`, `data_length`,
    /// `data_precision`, `data_scale`, `not_null` and `comment` columns.
    fn table_meta_sql(&self, table: Option<&str>) -> String;

    /// Maps a lower-cased native type string onto a [`DataType`].
    fn convert_data_type(&self, native: &str) -> DataType;
}

/// Comparison used against `#{table}`: exact for one table, `LIKE` for all.
pub(crate) fn table_filter(table: Option<&str>) -> &'static str {
    match table {
        Some(_) => "=",
        None => "LIKE",
    }
}

/// Supported database vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    Postgres,
    Mysql,
    Sqlite,
}

impl DialectKind {
    /// Infer the vendor from a connection URL.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::Postgres)
        } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Some(Self::Mysql)
        } else if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }

    pub fn dialect(&self) -> Arc<dyn Dialect> {
        match self {
            Self::Postgres => Arc::new(PostgresDialect),
            Self::Mysql => Arc::new(MysqlDialect),
            Self::Sqlite => Arc::new(SqliteDialect),
        }
    }

    pub fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            Self::Postgres => PlaceholderStyle::Numbered,
            Self::Mysql | Self::Sqlite => PlaceholderStyle::QuestionMark,
        }
    }

    /// Schema to introspect when none is given.
    ///
    /// MySQL schemas are databases, so the database named in the URL path is
    /// used; `None` when the URL names no database.
    pub fn default_schema(&self, url: &str) -> Option<String> {
        match self {
            Self::Postgres => Some("public".to_string()),
            Self::Sqlite => Some("main".to_string()),
            Self::Mysql => {
                let without_query = url.split(['?', '#']).next().unwrap_or_default();
                let after_scheme = without_query
                    .split_once("://")
                    .map_or(without_query, |(_, rest)| rest);
                let (_, path) = after_scheme.split_once('/')?;
                let database = path.trim_matches('/');
                (!database.is_empty()).then(|| database.to_string())
            }
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unknown dialect: {other}")),
        }
    }
}
