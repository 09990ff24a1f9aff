//! The catalog introspection engine.
//!
//! [`TableMetadataParser`] turns catalog query results into [`TableMetadata`]
//! through the schema's registered [`SqlExecutor`]. Two strategies load a
//! whole schema:
//!
//! - [`TableMetadataParser::parse_all`] enumerates table names and parses each
//!   table independently on a rayon worker.
//! - [`TableMetadataParser::fast_parse_all`] runs the column, comment and
//!   index queries once for every table and merges the result sets by table
//!   name.
//!
//! Neither is wired in implicitly; callers choose with [`ParseStrategy`].

mod bulk;
mod wrapper;

pub use wrapper::ColumnMetadataWrapper;

use crate::error::IntrospectError;
use crate::executor::{select_list, Params, SqlExecutor, SqlRequest, Value};
use crate::schema::SchemaMetadata;
use crate::types::{SchemaSnapshot, TableMetadata};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
#[cfg(feature = "tracing")]
use tracing::{debug, debug_span};

const SCHEMA_PARAM: &str = "schema";
const TABLE_PARAM: &str = "table";

/// Tuning knobs for [`TableMetadataParser`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserOptions {
    /// Worker threads for [`TableMetadataParser::parse_all`]. `None` runs on
    /// the global rayon pool.
    pub parallelism: Option<usize>,
}

impl ParserOptions {
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
}

/// How a whole schema is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStrategy {
    /// One existence check and three catalog queries per table, fanned out
    /// across workers.
    #[default]
    Parallel,
    /// One wildcard query per result set, merged by table name.
    Bulk,
}

impl ParseStrategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ParseStrategy::Parallel => "parallel",
            ParseStrategy::Bulk => "bulk",
        }
    }
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads table, column, comment and index metadata for one schema.
pub struct TableMetadataParser {
    schema: Arc<SchemaMetadata>,
    executor: Arc<dyn SqlExecutor>,
    options: ParserOptions,
    pool: Option<ThreadPool>,
}

impl TableMetadataParser {
    pub fn new(schema: Arc<SchemaMetadata>) -> Result<Self, IntrospectError> {
        Self::with_options(schema, ParserOptions::default())
    }

    /// Resolves the executor capability and, when `options.parallelism` is
    /// set, builds a dedicated worker pool.
    pub fn with_options(
        schema: Arc<SchemaMetadata>,
        options: ParserOptions,
    ) -> Result<Self, IntrospectError> {
        let executor = schema
            .features()
            .sql_executor()
            .ok_or_else(|| IntrospectError::NoExecutor {
                schema: schema.name().to_string(),
            })?;

        let pool = match options.parallelism {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads.max(1))
                    .thread_name(|index| format!("schemascope-parse-{index}"))
                    .build()?,
            ),
            None => None,
        };

        Ok(Self {
            schema,
            executor,
            options,
            pool,
        })
    }

    pub fn schema(&self) -> &Arc<SchemaMetadata> {
        &self.schema
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    fn params(&self, table: &str) -> Params {
        let mut params = Params::new();
        params.insert(SCHEMA_PARAM.to_string(), Value::from(self.schema.name()));
        params.insert(TABLE_PARAM.to_string(), Value::from(table));
        params
    }

    /// True iff the catalog reports a positive `total` for `name`.
    ///
    /// An empty result or a NULL total counts as absent. Executor failures
    /// still propagate.
    pub fn table_exists(&self, name: &str) -> Result<bool, IntrospectError> {
        let request = SqlRequest::template(self.schema.dialect().table_exists_sql(), &self.params(name));
        let total = self
            .executor
            .select_one(&request)?
            .and_then(|row| row.get_i64("total"));
        Ok(total.is_some_and(|total| total > 0))
    }

    /// Every table name in the schema, in catalog order.
    pub fn list_all_table_names(&self) -> Result<Vec<String>, IntrospectError> {
        let mut params = Params::new();
        params.insert(SCHEMA_PARAM.to_string(), Value::from(self.schema.name()));
        let request = SqlRequest::template(self.schema.dialect().all_tables_sql(), &params);

        Ok(self
            .executor
            .select(&request)?
            .into_iter()
            .filter_map(|row| row.get_string("name"))
            .collect())
    }

    /// Parses a single table, or returns `Ok(None)` when it does not exist.
    ///
    /// Comment and indexes are applied only after every column is loaded.
    pub fn parse_by_name(&self, name: &str) -> Result<Option<TableMetadata>, IntrospectError> {
        #[cfg(feature = "tracing")]
        let _span = debug_span!("parse_table", schema = self.schema.name(), table = name).entered();

        if !self.table_exists(name)? {
            #[cfg(feature = "tracing")]
            debug!(table = name, "table does not exist");
            return Ok(None);
        }

        let dialect = self.schema.dialect();
        let features = self.schema.features();
        let params = self.params(name);
        let codecs = features.value_codec_factory();
        let wrapper = ColumnMetadataWrapper::new(dialect, codecs.as_deref());

        let mut table = self.schema.new_table(name);

        let columns_request = SqlRequest::template(dialect.table_meta_sql(Some(name)), &params);
        for column in select_list(self.executor.as_ref(), &columns_request, &wrapper)? {
            table.add_column(column);
        }

        let comment_request = SqlRequest::template(dialect.table_comment_sql(Some(name)), &params);
        if let Some(comment) = self
            .executor
            .select_one(&comment_request)?
            .and_then(|row| row.get_string("comment"))
        {
            table.set_comment(comment);
        }

        if let Some(indexes) = features.index_parser() {
            for index in indexes.parse_table_index(name)? {
                table.add_index(index);
            }
        }

        Ok(Some(table))
    }

    /// Parses every table concurrently, one [`Self::parse_by_name`] per name.
    ///
    /// Tables dropped between enumeration and parsing are left out. Output
    /// order is unspecified.
    pub fn parse_all(&self) -> Result<Vec<TableMetadata>, IntrospectError> {
        #[cfg(feature = "tracing")]
        let _span = debug_span!("parse_all", schema = self.schema.name()).entered();

        let names = self.list_all_table_names()?;
        let parse = || {
            names
                .par_iter()
                .map(|name| self.parse_by_name(name))
                .collect::<Result<Vec<_>, _>>()
        };
        let parsed = match &self.pool {
            Some(pool) => pool.install(parse),
            None => parse(),
        }?;

        Ok(parsed.into_iter().flatten().collect())
    }

    pub fn parse_with(&self, strategy: ParseStrategy) -> Result<Vec<TableMetadata>, IntrospectError> {
        match strategy {
            ParseStrategy::Parallel => self.parse_all(),
            ParseStrategy::Bulk => self.fast_parse_all(),
        }
    }

    /// Parses the whole schema and stores every table in the schema's table
    /// store. Returns the number of tables loaded.
    pub fn load_into_schema(&self, strategy: ParseStrategy) -> Result<usize, IntrospectError> {
        let tables = self.parse_with(strategy)?;
        let count = tables.len();
        for table in tables {
            self.schema.add_table(table);
        }
        Ok(count)
    }

    /// Parses the whole schema into a serializable snapshot.
    pub fn snapshot(&self, strategy: ParseStrategy) -> Result<SchemaSnapshot, IntrospectError> {
        let tables = self.parse_with(strategy)?;
        Ok(SchemaSnapshot::new(
            self.schema.name(),
            self.schema.dialect().name(),
            tables,
        ))
    }
}

impl fmt::Debug for TableMetadataParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableMetadataParser")
            .field("schema", &self.schema.name())
            .field("options", &self.options)
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}
