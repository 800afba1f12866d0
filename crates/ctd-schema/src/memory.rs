use std::collections::BTreeMap;

use ctd_types::NodePath;

use crate::classification::SchemaClassification;
use crate::error::{SchemaError, SchemaResult};
use crate::oracle::SchemaOracle;

/// In-memory, map-based schema oracle.
///
/// Intended for tests and embedding. Classifications are registered up
/// front under exact node paths; lookups clone the stored classification.
/// Real deployments back [`SchemaOracle`] with a compiled schema model
/// instead.
#[derive(Clone, Debug, Default)]
pub struct InMemorySchema {
    entries: BTreeMap<NodePath, SchemaClassification>,
}

impl InMemorySchema {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the classification for an exact path, replacing any
    /// previous entry.
    pub fn register(&mut self, path: NodePath, classification: SchemaClassification) {
        self.entries.insert(path, classification);
    }

    /// Number of registered paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered paths in sorted order.
    pub fn paths(&self) -> Vec<NodePath> {
        self.entries.keys().cloned().collect()
    }
}

impl SchemaOracle for InMemorySchema {
    fn classify(&self, path: &NodePath) -> SchemaResult<SchemaClassification> {
        self.entries
            .get(path)
            .cloned()
            .ok_or_else(|| SchemaError::NotFound { path: path.clone() })
    }
}
