//! Value codecs resolved per column.
//!
//! A codec converts between a column's stored representation and the value an
//! application works with. Codecs are optional: a schema without a
//! [`ValueCodecFactory`] simply produces columns without one.

use crate::executor::Value;
use crate::types::{ColumnMetadata, SqlType};
use std::fmt;
use std::sync::Arc;

/// Encoder/decoder between stored and application-level values.
pub trait ValueCodec: fmt::Debug + Send + Sync {
    /// Stable codec name, used when serializing column metadata.
    fn name(&self) -> &str;

    /// Application value -> stored value.
    fn encode(&self, value: Value) -> Value;

    /// Stored value -> application value.
    fn decode(&self, value: Value) -> Value;
}

/// Resolves a codec for a finalized column, if one applies.
pub trait ValueCodecFactory: Send + Sync {
    fn create_value_codec(&self, column: &ColumnMetadata) -> Option<Arc<dyn ValueCodec>>;
}

/// Parses textual numbers; integral columns decode to [`Value::Int`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberValueCodec;

impl ValueCodec for NumberValueCodec {
    fn name(&self) -> &str {
        "number"
    }

    fn encode(&self, value: Value) -> Value {
        self.decode(value)
    }

    fn decode(&self, value: Value) -> Value {
        match value {
            Value::Text(text) => {
                let trimmed = text.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    Value::Int(i)
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    Value::Float(f)
                } else {
                    Value::Text(text)
                }
            }
            Value::Bool(b) => Value::Int(i64::from(b)),
            other => other,
        }
    }
}

/// Maps `0`/`1`, `"true"`/`"false"` and `"y"`/`"n"` onto booleans.
///
/// Encodes to integers so dialects without a native boolean round-trip.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanValueCodec;

impl ValueCodec for BooleanValueCodec {
    fn name(&self) -> &str {
        "boolean"
    }

    fn encode(&self, value: Value) -> Value {
        match self.decode(value) {
            Value::Bool(b) => Value::Int(i64::from(b)),
            other => other,
        }
    }

    fn decode(&self, value: Value) -> Value {
        match value {
            Value::Int(i) => Value::Bool(i != 0),
            Value::Float(f) => Value::Bool(f != 0.0),
            Value::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "t" | "y" | "yes" => Value::Bool(true),
                "0" | "false" | "f" | "n" | "no" => Value::Bool(false),
                _ => Value::Text(text),
            },
            other => other,
        }
    }
}

/// Number and boolean codecs keyed on the normalized column type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValueCodecFactory;

impl ValueCodecFactory for DefaultValueCodecFactory {
    fn create_value_codec(&self, column: &ColumnMetadata) -> Option<Arc<dyn ValueCodec>> {
        match column.data_type.sql_type {
            SqlType::Integer | SqlType::Decimal | SqlType::Float => Some(Arc::new(NumberValueCodec)),
            SqlType::Boolean => Some(Arc::new(BooleanValueCodec)),
            _ => None,
        }
    }
}
