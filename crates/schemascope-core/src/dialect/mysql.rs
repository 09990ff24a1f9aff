//! MySQL / MariaDB catalog queries.

use super::{table_filter, Dialect};
use crate::types::{base_type_name, normalize_type_name, DataType, SqlType};

#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn table_exists_sql(&self) -> String {
        r#"
            SELECT COUNT(1) AS total
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = #{schema} AND TABLE_NAME = #{table}
        "#
        .to_string()
    }

    fn all_tables_sql(&self) -> String {
        r#"
            SELECT TABLE_NAME AS `name`
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = #{schema}
            ORDER BY TABLE_NAME
        "#
        .to_string()
    }

    fn table_comment_sql(&self, table: Option<&str>) -> String {
        format!(
            r#"
            SELECT
                TABLE_NAME AS `table_name`,
                NULLIF(TABLE_COMMENT, '') AS `comment`
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = #{{schema}} AND TABLE_NAME {op} #{{table}}
            "#,
            op = table_filter(table)
        )
    }

    fn table_meta_sql(&self, table: Option<&str>) -> String {
        format!(
            r#"
            SELECT
                TABLE_NAME AS `table_name`,
                COLUMN_NAME AS `name`,
                COLUMN_TYPE AS `data_type`,
                CAST(CHARACTER_MAXIMUM_LENGTH AS SIGNED) AS `data_length`,
                CAST(NUMERIC_PRECISION AS SIGNED) AS `data_precision`,
                CAST(NUMERIC_SCALE AS SIGNED) AS `data_scale`,
                CASE WHEN IS_NULLABLE = 'YES' THEN 0 ELSE 1 END AS `not_null`,
                NULLIF(COLUMN_COMMENT, '') AS `comment`,
                NULLIF(EXTRA, '') AS `extra`
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = #{{schema}} AND TABLE_NAME {op} #{{table}}
            ORDER BY TABLE_NAME, ORDINAL_POSITION
            "#,
            op = table_filter(table)
        )
    }

    fn convert_data_type(&self, native: &str) -> DataType {
        let name = native.trim().to_ascii_lowercase();
        let sql_type = match base_type_name(&name).as_str() {
            "tinyint" if name.starts_with("tinyint(1)") => SqlType::Boolean,
            "bit" if name == "bit" || name.starts_with("bit(1)") => SqlType::Boolean,
            "bit" => SqlType::Binary,
            "year" => SqlType::Integer,
            "geometry" | "point" | "linestring" | "polygon" => SqlType::Binary,
            _ => normalize_type_name(&name).unwrap_or(SqlType::Unknown),
        };
        DataType::new(name, sql_type)
    }
}
