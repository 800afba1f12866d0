use ctd_types::NodePath;

use crate::classification::SchemaClassification;
use crate::error::SchemaResult;

/// Classifies config nodes by path.
///
/// All implementations must satisfy these invariants:
/// - Deterministic within one engine call: the classification for a path
///   must not change while a diff/merge/compare/filter is running.
/// - Safe for concurrent reads. Engines never write through the oracle.
/// - A path that is not part of the schema is `SchemaError::NotFound`, not
///   a guess; engines cannot proceed without kind knowledge.
pub trait SchemaOracle: Send + Sync {
    /// Classify the node at `path`.
    fn classify(&self, path: &NodePath) -> SchemaResult<SchemaClassification>;

    /// Returns `true` if the oracle knows `path`.
    fn knows(&self, path: &NodePath) -> bool {
        self.classify(path).is_ok()
    }
}
