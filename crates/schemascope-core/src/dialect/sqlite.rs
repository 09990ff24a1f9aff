//! SQLite catalog queries (`pragma_table_list` + `pragma_table_info`).
//!
//! `#{schema}` names an attached database (`main`, `temp` or an `ATTACH`
//! alias). SQLite has no table comments, so comment queries return NULL for
//! every table.

use super::{table_filter, Dialect};
use crate::types::{normalize_type_name, DataType, SqlType};

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn table_exists_sql(&self) -> String {
        r#"
            SELECT COUNT(1) AS total
            FROM pragma_table_list
            WHERE schema = #{schema} AND type = 'table' AND name = #{table}
        "#
        .to_string()
    }

    fn all_tables_sql(&self) -> String {
        r#"
            SELECT name FROM pragma_table_list
            WHERE schema = #{schema} AND type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
        "#
        .to_string()
    }

    fn table_comment_sql(&self, table: Option<&str>) -> String {
        format!(
            r#"
            SELECT name AS table_name, NULL AS comment
            FROM pragma_table_list
            WHERE schema = #{{schema}} AND type = 'table' AND name {op} #{{table}}
            "#,
            op = table_filter(table)
        )
    }

    fn table_meta_sql(&self, table: Option<&str>) -> String {
        format!(
            r#"
            SELECT
                t.name AS table_name,
                p.name AS name,
                p.type AS data_type,
                p."notnull" AS not_null,
                p.pk AS primary_key,
                p.dflt_value AS default_value
            FROM pragma_table_list t, pragma_table_info(t.name, t.schema) p
            WHERE t.schema = #{{schema}}
                AND t.type = 'table'
                AND t.name NOT LIKE 'sqlite_%'
                AND t.name {op} #{{table}}
            ORDER BY t.name, p.cid
            "#,
            op = table_filter(table)
        )
    }

    /// Applies SQLite's column affinity rules after the common type names.
    fn convert_data_type(&self, native: &str) -> DataType {
        let name = native.trim().to_ascii_lowercase();
        let sql_type = if name.is_empty() {
            SqlType::Unknown
        } else if let Some(sql_type) = normalize_type_name(&name) {
            sql_type
        } else if name.contains("int") {
            SqlType::Integer
        } else if name.contains("char") || name.contains("clob") || name.contains("text") {
            SqlType::Text
        } else if name.contains("blob") {
            SqlType::Binary
        } else if name.contains("real") || name.contains("floa") || name.contains("doub") {
            SqlType::Float
        } else {
            SqlType::Decimal
        };
        DataType::new(name, sql_type)
    }
}
