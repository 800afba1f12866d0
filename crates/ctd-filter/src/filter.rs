//! Ancestor-preserving projection of a config tree.

use std::collections::HashSet;

use tracing::debug;

use ctd_schema::{NodeKind, SchemaOracle};
use ctd_types::{ConfigTree, NodeId, NodeName, NodePath};

use crate::error::FilterResult;
use crate::query::{PathQuery, QueryEvaluator};

/// Project `tree` down to the subtrees rooted at `matches`.
///
/// Matched nodes are copied verbatim with their whole subtree. Ancestors
/// of a match become bare interior nodes so each copy stays attached at
/// its original path; ancestors that are list entries keep their key
/// leaves so the entry stays addressable. Everything else is dropped.
///
/// Ids in `matches` must be nodes of `tree`. An empty `matches` yields
/// an empty tree; a match on the root yields a verbatim clone.
pub fn filter(
    tree: &ConfigTree,
    matches: &[NodeId],
    oracle: &dyn SchemaOracle,
) -> FilterResult<ConfigTree> {
    debug!(matches = matches.len(), "projecting filtered tree");
    let matched: HashSet<NodeId> = matches.iter().copied().collect();
    if matched.contains(&tree.root()) {
        return Ok(tree.clone());
    }
    let mut ancestors = HashSet::new();
    for m in &matched {
        let mut cursor = tree.parent(*m);
        while let Some(node) = cursor {
            if !ancestors.insert(node) {
                break;
            }
            cursor = tree.parent(node);
        }
    }

    let mut projection = Projection {
        src: tree,
        out: ConfigTree::new(),
        matched,
        ancestors,
        oracle,
    };
    let src_root = tree.root();
    let out_root = projection.out.root();
    projection.project(src_root, out_root, &NodePath::root(), &[])?;
    Ok(projection.out)
}

/// Evaluate `query` with the built-in [`PathQuery`] dialect and project
/// the matches.
pub fn filter_query(
    tree: &ConfigTree,
    query: &str,
    oracle: &dyn SchemaOracle,
) -> FilterResult<ConfigTree> {
    let matches = PathQuery.evaluate(tree, query)?;
    filter(tree, &matches, oracle)
}

struct Projection<'a> {
    src: &'a ConfigTree,
    out: ConfigTree,
    matched: HashSet<NodeId>,
    ancestors: HashSet<NodeId>,
    oracle: &'a dyn SchemaOracle,
}

impl Projection<'_> {
    /// Walk `s_node`'s children in document order, copying matches and
    /// descending through ancestors. `skip` names children the caller
    /// already emitted (key leaves of a list shell).
    fn project(
        &mut self,
        s_node: NodeId,
        out_node: NodeId,
        path: &NodePath,
        skip: &[NodeName],
    ) -> FilterResult<()> {
        let src = self.src;
        for child in src.children(s_node) {
            let name = src.name(*child);
            if skip.contains(name) {
                continue;
            }
            if self.matched.contains(child) {
                self.out.copy_from(src, *child, out_node);
                continue;
            }
            if !self.ancestors.contains(child) {
                continue;
            }
            let child_path = path.child(name.clone());
            let classification = self.oracle.classify(&child_path)?;
            let shell = self.out.add_child(out_node, name.clone());
            let mut keys: Vec<NodeName> = Vec::new();
            if classification.kind == NodeKind::List {
                for key_child in src.children(*child) {
                    if classification.is_key_leaf(src.name(*key_child)) {
                        self.out.copy_from(src, *key_child, shell);
                    }
                }
                keys = classification.key_leaves.clone();
            }
            self.project(*child, shell, &child_path, &keys)?;
        }
        Ok(())
    }
}
