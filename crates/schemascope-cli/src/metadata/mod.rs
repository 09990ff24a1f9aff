//! Live database connections for catalog introspection.
//!
//! This module wires a [`SchemaMetadata`] to a real database: it picks the
//! dialect from the connection URL, registers an SQLx-backed executor and the
//! default value codecs.

#[cfg(feature = "metadata-provider")]
mod sqlx_executor;

#[cfg(feature = "metadata-provider")]
pub use sqlx_executor::SqlxExecutor;

use schemascope_core::DialectKind;
#[cfg(feature = "metadata-provider")]
use schemascope_core::{DefaultValueCodecFactory, Feature, SchemaMetadata};
#[cfg(feature = "metadata-provider")]
use std::sync::Arc;
use thiserror::Error;

/// Failure to reach a database before any catalog query runs.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("unsupported database URL scheme: {0}")]
    UnsupportedUrl(String),

    #[error("cannot determine schema for {0} connection; pass --schema")]
    NoDefaultSchema(DialectKind),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[cfg(feature = "metadata-provider")]
    #[error("failed to connect: {0}")]
    Connect(#[source] sqlx::Error),
}

/// Connection target resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: DialectKind,
    pub schema: String,
}

impl Target {
    /// Resolve the dialect from `url` and the schema from `schema` or the
    /// dialect's default.
    pub fn resolve(url: &str, schema: Option<String>) -> Result<Self, MetadataError> {
        let kind = DialectKind::from_url(url)
            .ok_or_else(|| MetadataError::UnsupportedUrl(url.to_string()))?;
        let schema = schema
            .or_else(|| kind.default_schema(url))
            .ok_or(MetadataError::NoDefaultSchema(kind))?;
        Ok(Self { kind, schema })
    }
}

/// Connect to `url` and build the schema the parser introspects.
#[cfg(feature = "metadata-provider")]
pub fn connect_schema(
    url: &str,
    target: &Target,
    max_connections: Option<u32>,
) -> Result<Arc<SchemaMetadata>, MetadataError> {
    let executor = SqlxExecutor::connect(url, max_connections)?;
    let schema = SchemaMetadata::new(target.schema.clone(), target.kind.dialect())
        .with_feature(Feature::SqlExecutor(Arc::new(executor)))
        .with_feature(Feature::ValueCodecFactory(Arc::new(DefaultValueCodecFactory)));
    Ok(Arc::new(schema))
}
