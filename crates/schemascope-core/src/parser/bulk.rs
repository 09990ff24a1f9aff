//! Whole-schema parsing with one query per result set.

use super::{ColumnMetadataWrapper, TableMetadataParser};
use crate::error::IntrospectError;
use crate::executor::{Row, RowWrapper, SqlRequest};
use crate::types::TableMetadata;
use dashmap::DashMap;
#[cfg(feature = "tracing")]
use tracing::{debug, debug_span};

/// `LIKE` pattern matching every table name.
const ALL_TABLES: &str = "%%";

fn owning_table(row: &Row) -> Option<String> {
    row.get_string("table_name")
        .or_else(|| row.get_string("table-name"))
}

impl TableMetadataParser {
    /// Loads every table with a single column query, a single comment query
    /// and one bulk index lookup.
    ///
    /// Column rows are aggregated into a map keyed by table name. Rows may be
    /// delivered from several executor threads; each table is created exactly
    /// once. Comment and index entries for tables absent from the column
    /// result are dropped. Output order is unspecified.
    pub fn fast_parse_all(&self) -> Result<Vec<TableMetadata>, IntrospectError> {
        #[cfg(feature = "tracing")]
        let _span = debug_span!("fast_parse_all", schema = self.schema.name()).entered();

        let dialect = self.schema.dialect();
        let features = self.schema.features();
        let params = self.params(ALL_TABLES);
        let codecs = features.value_codec_factory();
        let wrapper = ColumnMetadataWrapper::new(dialect, codecs.as_deref());
        let tables: DashMap<String, TableMetadata> = DashMap::new();

        let columns_request = SqlRequest::template(dialect.table_meta_sql(None), &params);
        self.executor.for_each_row(&columns_request, &|row: Row| {
            let table_name = owning_table(&row).ok_or(IntrospectError::MissingField("table_name"))?;
            let column = wrapper.wrap_row(row)?;
            tables
                .entry(table_name.clone())
                .or_insert_with(|| self.schema.new_table(&table_name))
                .add_column(column);
            Ok(())
        })?;

        let comments_request = SqlRequest::template(dialect.table_comment_sql(None), &params);
        self.executor.for_each_row(&comments_request, &|row: Row| {
            let (Some(table_name), Some(comment)) = (owning_table(&row), row.get_string("comment"))
            else {
                return Ok(());
            };
            match tables.get_mut(&table_name) {
                Some(mut table) => table.set_comment(comment),
                None => {
                    #[cfg(feature = "tracing")]
                    debug!(table = %table_name, "skipping comment for unknown table");
                }
            }
            Ok(())
        })?;

        if let Some(indexes) = features.index_parser() {
            for index in indexes.parse_all()? {
                match tables.get_mut(&index.table_name) {
                    Some(mut table) => table.add_index(index),
                    None => {
                        #[cfg(feature = "tracing")]
                        debug!(table = %index.table_name, index = %index.name, "skipping index for unknown table");
                    }
                }
            }
        }

        Ok(tables.into_iter().map(|(_, table)| table).collect())
    }
}
