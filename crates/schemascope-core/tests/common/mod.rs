#![allow(dead_code)]

use schemascope_core::{
    DataType, DefaultValueCodecFactory, Dialect, Feature, IndexMetadata, IndexMetadataParser,
    IntrospectError, MysqlDialect, Row, RowConsumer, SchemaMetadata, SqlExecutor, SqlRequest,
    Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Catalog query kinds, recognized by the leading keyword of [`CatalogDialect`] templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Exists,
    Tables,
    Comment,
    Columns,
}

/// A catalog query as the executor received it.
#[derive(Debug, Clone, PartialEq)]
pub struct Issued {
    pub query: Query,
    pub table: Option<String>,
    pub schema: Option<String>,
}

/// Dialect with keyword-tagged templates so the in-memory executor can
/// dispatch on them. Type conversion follows MySQL.
#[derive(Debug, Default)]
pub struct CatalogDialect;

impl Dialect for CatalogDialect {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn table_exists_sql(&self) -> String {
        "EXISTS schema = #{schema} AND table = #{table}".to_string()
    }

    fn all_tables_sql(&self) -> String {
        "TABLES schema = #{schema}".to_string()
    }

    fn table_comment_sql(&self, table: Option<&str>) -> String {
        match table {
            Some(_) => "COMMENT schema = #{schema} AND table = #{table}".to_string(),
            None => "COMMENT schema = #{schema} AND table LIKE #{table}".to_string(),
        }
    }

    fn table_meta_sql(&self, table: Option<&str>) -> String {
        match table {
            Some(_) => "COLUMNS schema = #{schema} AND table = #{table}".to_string(),
            None => "COLUMNS schema = #{schema} AND table LIKE #{table}".to_string(),
        }
    }

    fn convert_data_type(&self, native: &str) -> DataType {
        MysqlDialect.convert_data_type(native)
    }
}

#[derive(Debug, Clone)]
pub struct CatalogTable {
    pub name: String,
    pub comment: Option<String>,
    pub columns: Vec<Row>,
}

/// In-memory catalog serving [`CatalogDialect`] queries.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: Vec<CatalogTable>,
    /// Listed by name enumeration but reported absent by the existence check.
    vanished: Vec<String>,
    extra_comments: Vec<Row>,
    extra_columns: Vec<Row>,
    fail_on: Option<Query>,
    stream_threads: usize,
    issued: Mutex<Vec<Issued>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: &str, comment: Option<&str>, columns: Vec<Row>) -> Self {
        self.tables.push(CatalogTable {
            name: name.to_string(),
            comment: comment.map(str::to_string),
            columns,
        });
        self
    }

    pub fn vanished(mut self, name: &str) -> Self {
        self.vanished.push(name.to_string());
        self
    }

    /// Comment row returned only by the all-tables comment query.
    pub fn extra_comment(mut self, row: Row) -> Self {
        self.extra_comments.push(row);
        self
    }

    /// Column row returned verbatim by the all-tables column query.
    pub fn extra_column(mut self, row: Row) -> Self {
        self.extra_columns.push(row);
        self
    }

    pub fn fail_on(mut self, query: Query) -> Self {
        self.fail_on = Some(query);
        self
    }

    /// Deliver streamed rows from `threads` concurrent threads.
    pub fn stream_threads(mut self, threads: usize) -> Self {
        self.stream_threads = threads;
        self
    }

    pub fn issued(&self) -> Vec<Issued> {
        self.issued.lock().unwrap().clone()
    }

    pub fn issued_for(&self, query: Query) -> usize {
        self.issued().iter().filter(|i| i.query == query).count()
    }

    pub fn clear(&self) {
        self.issued.lock().unwrap().clear();
    }

    fn classify(request: &SqlRequest) -> Query {
        let sql = request.template_sql();
        if sql.starts_with("EXISTS") {
            Query::Exists
        } else if sql.starts_with("TABLES") {
            Query::Tables
        } else if sql.starts_with("COMMENT") {
            Query::Comment
        } else {
            Query::Columns
        }
    }

    fn matches(pattern: Option<&str>, name: &str) -> bool {
        match pattern {
            Some("%%") | None => true,
            Some(pattern) => pattern == name,
        }
    }

    fn rows(&self, query: Query, table: Option<&str>) -> Vec<Row> {
        let wildcard = table == Some("%%");
        let matching = self.tables.iter().filter(|t| Self::matches(table, &t.name));
        match query {
            Query::Exists => {
                let total = self
                    .tables
                    .iter()
                    .filter(|t| Some(t.name.as_str()) == table)
                    .count();
                vec![Row::new().with("total", total as i64)]
            }
            Query::Tables => self
                .tables
                .iter()
                .map(|t| t.name.as_str())
                .chain(self.vanished.iter().map(String::as_str))
                .map(|name| Row::new().with("name", name))
                .collect(),
            Query::Comment => {
                let mut rows: Vec<Row> = matching
                    .map(|t| {
                        Row::new()
                            .with("table_name", t.name.as_str())
                            .with("comment", t.comment.clone())
                    })
                    .collect();
                if wildcard {
                    rows.extend(self.extra_comments.iter().cloned());
                }
                rows
            }
            Query::Columns => {
                let mut rows: Vec<Row> = matching
                    .flat_map(|t| {
                        t.columns
                            .iter()
                            .map(move |c| c.clone().with("table_name", t.name.as_str()))
                    })
                    .collect();
                if wildcard {
                    rows.extend(self.extra_columns.iter().cloned());
                }
                rows
            }
        }
    }
}

impl SqlExecutor for Catalog {
    fn select(&self, request: &SqlRequest) -> Result<Vec<Row>, IntrospectError> {
        let query = Self::classify(request);
        let table = request.parameter("table").and_then(Value::as_text);
        self.issued.lock().unwrap().push(Issued {
            query,
            table: table.clone(),
            schema: request.parameter("schema").and_then(Value::as_text),
        });

        if self.fail_on == Some(query) {
            return Err(IntrospectError::execution_message(format!(
                "connection reset during {query:?}"
            )));
        }
        Ok(self.rows(query, table.as_deref()))
    }

    fn for_each_row(
        &self,
        request: &SqlRequest,
        consumer: &RowConsumer<'_>,
    ) -> Result<(), IntrospectError> {
        let rows = self.select(request)?;
        if self.stream_threads <= 1 {
            return rows.into_iter().try_for_each(consumer);
        }

        let chunk = rows.len().div_ceil(self.stream_threads).max(1);
        std::thread::scope(|scope| {
            let workers: Vec<_> = rows
                .chunks(chunk)
                .map(|part| {
                    scope.spawn(move || part.iter().cloned().try_for_each(consumer))
                })
                .collect();
            workers
                .into_iter()
                .map(|worker| worker.join().expect("stream worker panicked"))
                .collect::<Result<(), _>>()
        })
    }
}

/// Index parser over a fixed list of indexes.
#[derive(Debug, Default)]
pub struct FixedIndexes {
    indexes: Vec<IndexMetadata>,
    pub per_table_calls: AtomicUsize,
    pub bulk_calls: AtomicUsize,
}

impl FixedIndexes {
    pub fn new(indexes: Vec<IndexMetadata>) -> Self {
        Self {
            indexes,
            ..Self::default()
        }
    }

    pub fn per_table_calls(&self) -> usize {
        self.per_table_calls.load(Ordering::SeqCst)
    }
}

impl IndexMetadataParser for FixedIndexes {
    fn parse_table_index(&self, table: &str) -> Result<Vec<IndexMetadata>, IntrospectError> {
        self.per_table_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .indexes
            .iter()
            .filter(|index| index.table_name == table)
            .cloned()
            .collect())
    }

    fn parse_all(&self) -> Result<Vec<IndexMetadata>, IntrospectError> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.indexes.clone())
    }
}

/// A column row in the shape the catalog queries project.
pub fn column(name: &str, data_type: &str, not_null: &str) -> Row {
    Row::new()
        .with("name", name)
        .with("data_type", data_type)
        .with("not_null", not_null)
}

/// Schema `app` backed by `catalog`, with optional indexes and codecs.
pub fn schema(
    catalog: &Arc<Catalog>,
    indexes: Option<Arc<FixedIndexes>>,
    codecs: bool,
) -> Arc<SchemaMetadata> {
    let mut schema = SchemaMetadata::new("app", Arc::new(CatalogDialect))
        .with_feature(Feature::SqlExecutor(catalog.clone()));
    if let Some(indexes) = indexes {
        schema = schema.with_feature(Feature::IndexParser(indexes));
    }
    if codecs {
        schema = schema.with_feature(Feature::ValueCodecFactory(Arc::new(
            DefaultValueCodecFactory,
        )));
    }
    Arc::new(schema)
}

/// Row with its cells in a different order.
pub fn permuted(row: &Row, order: &[usize]) -> Row {
    let cells: Vec<(String, Value)> = row
        .iter()
        .map(|(label, value)| (label.to_string(), value.clone()))
        .collect();
    order.iter().map(|&i| cells[i].clone()).collect()
}
