//! Optional capabilities attached to a schema.
//!
//! A schema "may have" an SQL executor, an index parser or a value codec
//! factory. Each is registered under a [`FeatureId`] and looked up by that
//! id; a lookup that finds nothing is an ordinary `None`, never an error.

use crate::codec::ValueCodecFactory;
use crate::error::IntrospectError;
use crate::executor::SqlExecutor;
use crate::types::IndexMetadata;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces index metadata for one table or for a whole schema.
pub trait IndexMetadataParser: Send + Sync {
    fn parse_table_index(&self, table: &str) -> Result<Vec<IndexMetadata>, IntrospectError>;

    fn parse_all(&self) -> Result<Vec<IndexMetadata>, IntrospectError>;
}

/// Identifier of a pluggable capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureId {
    SqlExecutor,
    IndexParser,
    ValueCodecFactory,
}

impl FeatureId {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FeatureId::SqlExecutor => "sql-executor",
            FeatureId::IndexParser => "index-parser",
            FeatureId::ValueCodecFactory => "value-codec-factory",
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered capability provider.
#[derive(Clone)]
pub enum Feature {
    SqlExecutor(Arc<dyn SqlExecutor>),
    IndexParser(Arc<dyn IndexMetadataParser>),
    ValueCodecFactory(Arc<dyn ValueCodecFactory>),
}

impl Feature {
    pub fn id(&self) -> FeatureId {
        match self {
            Feature::SqlExecutor(_) => FeatureId::SqlExecutor,
            Feature::IndexParser(_) => FeatureId::IndexParser,
            Feature::ValueCodecFactory(_) => FeatureId::ValueCodecFactory,
        }
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Feature").field(&self.id()).finish()
    }
}

/// Capability registry keyed by [`FeatureId`]. At most one provider per id.
#[derive(Clone, Default)]
pub struct FeatureRegistry {
    features: HashMap<FeatureId, Feature>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `feature`, returning the provider it replaced.
    pub fn register(&mut self, feature: Feature) -> Option<Feature> {
        self.features.insert(feature.id(), feature)
    }

    pub fn remove(&mut self, id: FeatureId) -> Option<Feature> {
        self.features.remove(&id)
    }

    pub fn find(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    pub fn contains(&self, id: FeatureId) -> bool {
        self.features.contains_key(&id)
    }

    pub fn sql_executor(&self) -> Option<Arc<dyn SqlExecutor>> {
        match self.find(FeatureId::SqlExecutor)? {
            Feature::SqlExecutor(executor) => Some(Arc::clone(executor)),
            _ => None,
        }
    }

    pub fn index_parser(&self) -> Option<Arc<dyn IndexMetadataParser>> {
        match self.find(FeatureId::IndexParser)? {
            Feature::IndexParser(parser) => Some(Arc::clone(parser)),
            _ => None,
        }
    }

    pub fn value_codec_factory(&self) -> Option<Arc<dyn ValueCodecFactory>> {
        match self.find(FeatureId::ValueCodecFactory)? {
            Feature::ValueCodecFactory(factory) => Some(Arc::clone(factory)),
            _ => None,
        }
    }

    /// Registered ids in a stable order.
    pub fn ids(&self) -> Vec<FeatureId> {
        let mut ids: Vec<_> = self.features.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ids()).finish()
    }
}
