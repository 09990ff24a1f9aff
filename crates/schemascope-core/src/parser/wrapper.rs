//! Row-to-column wrapping with catalog label normalization.
//!
//! Catalog result rows arrive as arbitrary `(label, value)` pairs whose labels
//! are dialect-defined. [`ColumnMetadataWrapper`] folds each pair into a
//! private [`ColumnDraft`], then finalizes the draft once per row: numeric
//! attributes are coerced, the native type is converted through the dialect
//! and a value codec is resolved. Finalizing only after every pair has been
//! applied is what makes the result independent of column order in the row.

use crate::codec::ValueCodecFactory;
use crate::dialect::Dialect;
use crate::error::IntrospectError;
use crate::executor::{RowWrapper, Value};
use crate::types::{ColumnMetadata, Properties, PropertyValue, OLD_NAME_PROPERTY, TABLE_NAME_PROPERTY};

const DATA_TYPE: &str = "data_type";
const DATA_LENGTH: &str = "data_length";
const DATA_PRECISION: &str = "data_precision";
const DATA_SCALE: &str = "data_scale";
const NOT_NULL: &str = "not_null";

/// A column whose type has not been resolved yet. Never leaves this module.
#[derive(Debug, Default)]
pub struct ColumnDraft {
    name: Option<String>,
    comment: Option<String>,
    not_null: bool,
    properties: Properties,
}

impl ColumnDraft {
    fn int_property(&self, key: &str) -> i64 {
        self.properties
            .get(key)
            .and_then(PropertyValue::as_i64)
            .unwrap_or(0)
    }
}

/// Wraps catalog column rows into finalized [`ColumnMetadata`].
pub struct ColumnMetadataWrapper<'a> {
    dialect: &'a dyn Dialect,
    codecs: Option<&'a dyn ValueCodecFactory>,
}

impl<'a> ColumnMetadataWrapper<'a> {
    pub fn new(dialect: &'a dyn Dialect, codecs: Option<&'a dyn ValueCodecFactory>) -> Self {
        Self { dialect, codecs }
    }
}

impl RowWrapper for ColumnMetadataWrapper<'_> {
    type Instance = ColumnDraft;
    type Output = ColumnMetadata;

    fn new_row_instance(&self) -> ColumnDraft {
        ColumnDraft::default()
    }

    /// Labels match case-insensitively. Names, old names and comments keep
    /// the catalog's case; only the native type string is lowercased.
    fn wrap_column(&self, draft: &mut ColumnDraft, label: &str, value: Value) {
        let label = label.to_ascii_lowercase();
        match label.as_str() {
            "name" => {
                if let Some(name) = value.as_text() {
                    draft
                        .properties
                        .insert(OLD_NAME_PROPERTY.to_string(), PropertyValue::Text(name.clone()));
                    draft.name = Some(name);
                }
            }
            "table_name" | "table-name" => {
                if let Some(table) = PropertyValue::from_value(value) {
                    draft.properties.insert(TABLE_NAME_PROPERTY.to_string(), table);
                }
            }
            "comment" => draft.comment = value.as_text(),
            NOT_NULL => {
                draft.not_null = value.as_text().as_deref() == Some("1");
                draft
                    .properties
                    .insert(label, PropertyValue::Boolean(draft.not_null));
            }
            _ => {
                if let Some(property) = PropertyValue::from_value(value) {
                    draft.properties.insert(label, property);
                }
            }
        }
    }

    fn completed_wrap_row(&self, draft: ColumnDraft) -> Result<ColumnMetadata, IntrospectError> {
        let native = draft
            .properties
            .get(DATA_TYPE)
            .map(|t| t.to_string().to_lowercase())
            .unwrap_or_default();
        let length = draft.int_property(DATA_LENGTH);
        let precision = draft.int_property(DATA_PRECISION);
        let scale = draft.int_property(DATA_SCALE);

        let name = draft
            .name
            .filter(|name| !name.is_empty())
            .ok_or(IntrospectError::MissingField("name"))?;

        let mut column = ColumnMetadata::new(name, self.dialect.convert_data_type(&native));
        column.comment = draft.comment;
        column.not_null = draft.not_null;
        column.length = length;
        column.precision = precision;
        column.scale = scale;
        column.properties = draft.properties;

        if let Some(codec) = self
            .codecs
            .and_then(|factory| factory.create_value_codec(&column))
        {
            column.set_value_codec(codec);
        }

        Ok(column)
    }
}
