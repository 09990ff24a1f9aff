//! Human-readable table output formatting.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use schemascope_core::{ColumnMetadata, IndexMetadata, SchemaSnapshot, SortOrder, TableMetadata};
use std::fmt::Write;
use tabled::builder::Builder;
use tabled::settings::Style;

const COLUMN_HEADERS: [&str; 8] = [
    "Column", "Type", "Category", "Null", "Length", "Precision/Scale", "Codec", "Comment",
];

/// Whether to emit ANSI colors on stdout.
pub fn use_colors(requested: bool) -> bool {
    requested && std::io::stdout().is_terminal()
}

/// Format the snapshot as human-readable text.
pub fn format_table(snapshot: &SchemaSnapshot, colored: bool) -> String {
    let mut out = String::new();

    write_header(&mut out, colored);
    write_summary(&mut out, snapshot, colored);
    for table in &snapshot.tables {
        write_table(&mut out, table, colored);
    }

    out
}

/// Format table names, one per line.
pub fn format_names(schema: &str, names: &[String], colored: bool) -> String {
    let mut out = String::new();
    let title = format!("Tables in {schema} ({})", names.len());
    if colored {
        writeln!(out, "{}", title.bold()).unwrap();
    } else {
        writeln!(out, "{title}").unwrap();
    }
    for name in names {
        writeln!(out, "  {name}").unwrap();
    }
    out
}

/// Format per-table existence results.
pub fn format_existence(schema: &str, results: &[(String, bool)], colored: bool) -> String {
    let mut out = String::new();
    for (name, exists) in results {
        let status = match (exists, colored) {
            (true, true) => "found".green().to_string(),
            (true, false) => "found".to_string(),
            (false, true) => "missing".red().to_string(),
            (false, false) => "missing".to_string(),
        };
        writeln!(out, "{schema}.{name}: {status}").unwrap();
    }
    out
}

fn write_header(out: &mut String, colored: bool) {
    let title = "SchemaScope Catalog";
    let line = "═".repeat(50);

    if colored {
        writeln!(out, "{}", title.bold()).unwrap();
        writeln!(out, "{}", line.dimmed()).unwrap();
    } else {
        writeln!(out, "{title}").unwrap();
        writeln!(out, "{line}").unwrap();
    }
}

fn write_summary(out: &mut String, snapshot: &SchemaSnapshot, colored: bool) {
    let stats = format!(
        "Schema: {} ({}) | {} tables | {} columns",
        snapshot.schema,
        snapshot.dialect,
        snapshot.tables.len(),
        snapshot.column_count()
    );

    if colored {
        writeln!(out, "{}", stats.cyan()).unwrap();
    } else {
        writeln!(out, "{stats}").unwrap();
    }
    writeln!(out).unwrap();
}

fn write_table(out: &mut String, table: &TableMetadata, colored: bool) {
    let title = match &table.comment {
        Some(comment) => format!("{} - {comment}", table.name),
        None => table.name.clone(),
    };
    if colored {
        writeln!(out, "{}", title.bold()).unwrap();
    } else {
        writeln!(out, "{title}").unwrap();
    }

    if table.columns().is_empty() {
        writeln!(out, "  (no columns)").unwrap();
    } else {
        let mut builder = Builder::default();
        builder.push_record(COLUMN_HEADERS.map(String::from));
        for column in table.columns() {
            builder.push_record(column_record(column));
        }
        let mut grid = builder.build();
        grid.with(Style::sharp());
        writeln!(out, "{grid}").unwrap();
    }

    for index in &table.indexes {
        writeln!(out, "  {}", describe_index(index)).unwrap();
    }
    writeln!(out).unwrap();
}

fn column_record(column: &ColumnMetadata) -> Vec<String> {
    let numeric = if column.precision > 0 || column.scale > 0 {
        format!("{},{}", column.precision, column.scale)
    } else {
        String::new()
    };
    vec![
        column.name.clone(),
        column.data_type.name.clone(),
        column.data_type.sql_type.to_string(),
        if column.not_null { "NOT NULL" } else { "" }.to_string(),
        if column.length > 0 {
            column.length.to_string()
        } else {
            String::new()
        },
        numeric,
        column.codec_name().unwrap_or_default().to_string(),
        column.comment.clone().unwrap_or_default(),
    ]
}

fn describe_index(index: &IndexMetadata) -> String {
    let kind = if index.primary_key {
        "PRIMARY KEY"
    } else if index.unique {
        "UNIQUE INDEX"
    } else {
        "INDEX"
    };
    let columns: Vec<String> = index
        .columns
        .iter()
        .map(|c| match c.sort {
            SortOrder::Asc => c.name.clone(),
            SortOrder::Desc => format!("{} DESC", c.name),
        })
        .collect();
    format!("{kind} {} ({})", index.name, columns.join(", "))
}
