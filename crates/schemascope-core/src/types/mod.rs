//! Metadata model produced by catalog introspection.
//!
//! Tables, columns and indexes are plain data: the parsers populate them
//! through builder-style mutators and hand them back as finished snapshots.

mod data_type;
mod property;
mod snapshot;
mod table;

pub use data_type::{base_type_name, normalize_type_name, DataType, SqlType};
pub use property::{Properties, PropertyValue, OLD_NAME_PROPERTY, TABLE_NAME_PROPERTY};
pub use snapshot::SchemaSnapshot;
pub use table::{ColumnMetadata, IndexColumn, IndexMetadata, SortOrder, TableMetadata};
