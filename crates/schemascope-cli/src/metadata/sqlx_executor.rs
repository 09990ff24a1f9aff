//! SQLx-backed SQL executor for live catalog queries.
//!
//! Supports PostgreSQL, MySQL, and SQLite databases through the `Any` driver.

use schemascope_core::{
    DialectKind, IntrospectError, PlaceholderStyle, Row, SqlExecutor, SqlRequest, Value,
};
use sqlx::any::{AnyArguments, AnyPoolOptions, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Column, Row as _, ValueRef};
use tokio::runtime::Runtime;

use super::MetadataError;

/// Executes catalog queries on an [`AnyPool`], blocking on an owned runtime.
///
/// The executor is shared by the parse workers; each call blocks its calling
/// thread until the query completes.
pub struct SqlxExecutor {
    pool: AnyPool,
    runtime: Runtime,
    style: PlaceholderStyle,
}

impl SqlxExecutor {
    /// Connect to the database at `url`.
    ///
    /// `max_connections` caps the pool; `None` keeps the SQLx default.
    ///
    /// # Errors
    /// Returns an error if the URL scheme is not supported, the runtime cannot
    /// start, or the connection fails.
    pub fn connect(url: &str, max_connections: Option<u32>) -> Result<Self, MetadataError> {
        let kind = DialectKind::from_url(url)
            .ok_or_else(|| MetadataError::UnsupportedUrl(url.to_string()))?;

        sqlx::any::install_default_drivers();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("schemascope-sqlx")
            .build()
            .map_err(MetadataError::Runtime)?;

        let mut options = AnyPoolOptions::new();
        if let Some(max) = max_connections {
            options = options.max_connections(max);
        }
        let pool = runtime
            .block_on(options.connect(url))
            .map_err(MetadataError::Connect)?;

        tracing::debug!(dialect = %kind, "connected to database");

        Ok(Self {
            pool,
            runtime,
            style: kind.placeholder_style(),
        })
    }

    async fn fetch(&self, request: &SqlRequest) -> Result<Vec<AnyRow>, sqlx::Error> {
        let sql = request.sql(self.style);
        let query = request
            .parameters()
            .fold(sqlx::query(&sql), |query, value| bind(query, value));
        query.fetch_all(&self.pool).await
    }
}

fn bind<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    value: &Value,
) -> Query<'q, Any, AnyArguments<'q>> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(b) => query.bind(*b),
        Value::Int(i) => query.bind(*i),
        Value::Float(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.clone()),
    }
}

/// Convert one cell, handling the different representations drivers report.
fn cell(row: &AnyRow, index: usize) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }
    if let Ok(val) = row.try_get::<i64, _>(index) {
        return Ok(Value::Int(val));
    }
    if let Ok(val) = row.try_get::<i32, _>(index) {
        return Ok(Value::Int(val.into()));
    }
    if let Ok(val) = row.try_get::<f64, _>(index) {
        return Ok(Value::Float(val));
    }
    if let Ok(val) = row.try_get::<bool, _>(index) {
        return Ok(Value::Bool(val));
    }
    if let Ok(val) = row.try_get::<String, _>(index) {
        return Ok(Value::Text(val));
    }
    // MySQL reports some information_schema text columns as binary
    if let Ok(val) = row.try_get::<Vec<u8>, _>(index) {
        return Ok(Value::Text(String::from_utf8_lossy(&val).into_owned()));
    }
    Ok(Value::Null)
}

fn convert_row(row: &AnyRow) -> Result<Row, sqlx::Error> {
    let mut out = Row::new();
    for column in row.columns() {
        out.push(column.name(), cell(row, column.ordinal())?);
    }
    Ok(out)
}

impl SqlExecutor for SqlxExecutor {
    fn select(&self, request: &SqlRequest) -> Result<Vec<Row>, IntrospectError> {
        tracing::trace!(sql = request.template_sql(), "running catalog query");
        let rows = self
            .runtime
            .block_on(self.fetch(request))
            .map_err(IntrospectError::execution)?;
        rows.iter()
            .map(convert_row)
            .collect::<Result<_, _>>()
            .map_err(IntrospectError::execution)
    }
}
