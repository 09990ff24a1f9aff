//! Error types for catalog introspection.
//!
//! # Error Handling Strategy
//!
//! Every engine operation returns `Result<T, IntrospectError>`. Failures coming
//! from the query-execution collaborator (connectivity, malformed SQL,
//! permissions, timeouts) are reported as [`IntrospectError::Execution`] and are
//! never retried here.
//!
//! Some conditions are deliberately *not* errors:
//!
//! - A table that does not exist yields `Ok(None)` from
//!   [`crate::TableMetadataParser::parse_by_name`].
//! - A missing optional capability (index parser, value codec factory) only
//!   skips that enrichment.
//! - Bulk comment or index rows that reference an unknown table are dropped.

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed source error carried by [`IntrospectError::Execution`].
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Error raised while introspecting a database catalog.
#[derive(Debug, Error)]
pub enum IntrospectError {
    /// The query-execution collaborator failed to run a catalog query.
    #[error("catalog query failed: {message}")]
    Execution {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A catalog row lacks a field the engine cannot do without.
    #[error("catalog row is missing required field `{0}`")]
    MissingField(&'static str),

    /// The schema has no SQL executor registered in its feature registry.
    #[error("no SQL executor registered for schema `{schema}`")]
    NoExecutor { schema: String },

    /// The bounded worker pool for parallel parsing could not be built.
    #[error("failed to build parse worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl IntrospectError {
    /// Wraps a driver error as an execution failure.
    pub fn execution(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self::Execution {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates an execution failure from a plain message.
    pub fn execution_message(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when the error originates from the execution collaborator.
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }
}
