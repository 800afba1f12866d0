use tracing::debug;

use ctd_types::{ConfigTree, NodeId, NodePath};

use crate::error::{ValidationError, ValidationResult};
use crate::oracle::SchemaOracle;

/// Check the plain-config invariant over a whole tree.
///
/// A validated tree carries no edit metadata anywhere (delta halves exist
/// to carry it; plain configs never do) and every node classifies under
/// the oracle. The first violation is returned with its path. Engines do
/// not re-run this on every call; it is a boundary step after decoding or
/// programmatic construction.
pub fn validate(tree: &ConfigTree, oracle: &dyn SchemaOracle) -> ValidationResult<()> {
    debug!(nodes = tree.node_count(), "validating config tree");
    let root = tree.root();
    if !tree.edit(root).is_empty() {
        return Err(ValidationError::EditMetadata {
            path: NodePath::root(),
        });
    }
    for child in tree.children(root) {
        validate_node(tree, *child, &NodePath::root(), oracle)?;
    }
    Ok(())
}

fn validate_node(
    tree: &ConfigTree,
    id: NodeId,
    parent_path: &NodePath,
    oracle: &dyn SchemaOracle,
) -> ValidationResult<()> {
    let path = parent_path.child(tree.name(id).clone());
    if !tree.edit(id).is_empty() {
        return Err(ValidationError::EditMetadata { path });
    }
    oracle.classify(&path)?;
    for child in tree.children(id) {
        validate_node(tree, *child, &path, oracle)?;
    }
    Ok(())
}
