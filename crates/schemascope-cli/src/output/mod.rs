//! Output formatting modules.

pub mod json;
pub mod table;

pub use json::{format_existence_json, format_json, format_json_schema, format_names_json};
pub use table::{format_existence, format_names, format_table, use_colors};
