pub mod codec;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod feature;
pub mod parser;
pub mod schema;
pub mod types;

// Re-export main types and functions
pub use codec::{BooleanValueCodec, DefaultValueCodecFactory, NumberValueCodec, ValueCodec, ValueCodecFactory};
pub use dialect::{Dialect, DialectKind, MysqlDialect, PostgresDialect, SqliteDialect};
pub use error::{BoxError, IntrospectError};
pub use executor::{
    select_list, Params, PlaceholderStyle, Row, RowConsumer, RowWrapper, SqlExecutor, SqlRequest,
    Value,
};
pub use feature::{Feature, FeatureId, FeatureRegistry, IndexMetadataParser};
pub use parser::{ColumnMetadataWrapper, ParseStrategy, ParserOptions, TableMetadataParser};
pub use schema::SchemaMetadata;

// Re-export types explicitly
pub use types::{
    base_type_name,
    normalize_type_name,
    ColumnMetadata,
    DataType,
    IndexColumn,
    IndexMetadata,
    Properties,
    PropertyValue,
    SchemaSnapshot,
    SortOrder,
    SqlType,
    TableMetadata,
    OLD_NAME_PROPERTY,
    TABLE_NAME_PROPERTY,
};
