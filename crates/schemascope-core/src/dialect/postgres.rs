//! PostgreSQL catalog queries (`information_schema` + `pg_catalog`).

use super::{table_filter, Dialect};
use crate::types::{base_type_name, normalize_type_name, DataType, SqlType};

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn table_exists_sql(&self) -> String {
        r#"
            SELECT CAST(COUNT(1) AS INTEGER) AS total
            FROM information_schema.tables
            WHERE table_schema = #{schema} AND table_name = #{table}
        "#
        .to_string()
    }

    fn all_tables_sql(&self) -> String {
        r#"
            SELECT CAST(table_name AS VARCHAR) AS name
            FROM information_schema.tables
            WHERE table_schema = #{schema}
            ORDER BY table_name
        "#
        .to_string()
    }

    fn table_comment_sql(&self, table: Option<&str>) -> String {
        format!(
            r#"
            SELECT
                CAST(c.relname AS VARCHAR) AS table_name,
                CAST(obj_description(c.oid, 'pg_class') AS VARCHAR) AS comment
            FROM pg_catalog.pg_class c
            JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
            WHERE n.nspname = #{{schema}}
                AND c.relkind IN ('r', 'p', 'v', 'm', 'f')
                AND c.relname {op} #{{table}}
            "#,
            op = table_filter(table)
        )
    }

    fn table_meta_sql(&self, table: Option<&str>) -> String {
        format!(
            r#"
            SELECT
                CAST(c.table_name AS VARCHAR) AS table_name,
                CAST(c.column_name AS VARCHAR) AS name,
                CAST(c.udt_name AS VARCHAR) AS data_type,
                CAST(c.character_maximum_length AS INTEGER) AS data_length,
                CAST(c.numeric_precision AS INTEGER) AS data_precision,
                CAST(c.numeric_scale AS INTEGER) AS data_scale,
                CASE WHEN c.is_nullable = 'YES' THEN 0 ELSE 1 END AS not_null,
                CAST(col_description(
                    format('%I.%I', c.table_schema, c.table_name)::regclass::oid,
                    c.ordinal_position
                ) AS VARCHAR) AS comment,
                CAST(c.column_default AS VARCHAR) AS default_value
            FROM information_schema.columns c
            WHERE c.table_schema = #{{schema}} AND c.table_name {op} #{{table}}
            ORDER BY c.table_name, c.ordinal_position
            "#,
            op = table_filter(table)
        )
    }

    fn convert_data_type(&self, native: &str) -> DataType {
        let name = native.trim().to_ascii_lowercase();
        // udt names of array columns carry a leading underscore: `_int4`
        let sql_type = if name.starts_with('_') {
            SqlType::Array
        } else {
            match base_type_name(&name).as_str() {
                "oid" | "xid" => SqlType::Integer,
                "inet" | "cidr" | "macaddr" | "interval" | "xml" | "tsvector" => SqlType::Text,
                "varbit" => SqlType::Binary,
                _ => normalize_type_name(&name).unwrap_or(SqlType::Unknown),
            }
        };
        DataType::new(name, sql_type)
    }
}
