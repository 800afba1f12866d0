//! Structural subset comparison between config trees.
//!
//! `le(a, b)` holds when everything `a` says is also said by `b`: same
//! names, values, and edit metadata, every `a` child having exactly one
//! recursive peer in `b`, and user-ordered sequences of `a` appearing in
//! `b` in the same relative order. The relation induces a partial order;
//! trees can be incomparable.

use tracing::debug;

use ctd_schema::SchemaOracle;
use ctd_types::{ConfigTree, Delta, NodeId, NodePath};

use crate::error::DiffResult;
use crate::peers::unique_peer;

/// Outcome of comparing two config trees under the subset partial order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigOrdering {
    /// `a` is a strict subset of `b`.
    Less,
    /// The trees are structurally equal.
    Equal,
    /// `b` is a strict subset of `a`.
    Greater,
    /// Neither is a subset of the other.
    Incomparable,
}

/// Returns `true` iff `a` is a structural subset of `b`.
pub fn le(a: &ConfigTree, b: &ConfigTree, oracle: &dyn SchemaOracle) -> DiffResult<bool> {
    node_le(a, a.root(), b, b.root(), oracle, &NodePath::root())
}

/// Returns `true` iff the trees are structurally equal.
///
/// Sibling order is ignored except for user-ordered sequences.
pub fn equal(a: &ConfigTree, b: &ConfigTree, oracle: &dyn SchemaOracle) -> DiffResult<bool> {
    Ok(le(a, b, oracle)? && le(b, a, oracle)?)
}

/// Compare two trees under the subset partial order.
pub fn compare(
    a: &ConfigTree,
    b: &ConfigTree,
    oracle: &dyn SchemaOracle,
) -> DiffResult<ConfigOrdering> {
    debug!("comparing config trees");
    let ab = le(a, b, oracle)?;
    let ba = le(b, a, oracle)?;
    Ok(match (ab, ba) {
        (true, true) => ConfigOrdering::Equal,
        (true, false) => ConfigOrdering::Less,
        (false, true) => ConfigOrdering::Greater,
        (false, false) => ConfigOrdering::Incomparable,
    })
}

/// Returns `true` iff two deltas are equivalent half by half.
pub fn delta_equal(d1: &Delta, d2: &Delta, oracle: &dyn SchemaOracle) -> DiffResult<bool> {
    Ok(equal(d1.forward(), d2.forward(), oracle)? && equal(d1.reverse(), d2.reverse(), oracle)?)
}

/// Structural equality for one matched node pair.
pub(crate) fn nodes_equal(
    at: &ConfigTree,
    a: NodeId,
    bt: &ConfigTree,
    b: NodeId,
    oracle: &dyn SchemaOracle,
    path: &NodePath,
) -> DiffResult<bool> {
    Ok(node_le(at, a, bt, b, oracle, path)? && node_le(bt, b, at, a, oracle, path)?)
}

/// Subset check for one matched node pair.
///
/// `path` locates the pair (root path for the synthetic roots).
pub(crate) fn node_le(
    at: &ConfigTree,
    a: NodeId,
    bt: &ConfigTree,
    b: NodeId,
    oracle: &dyn SchemaOracle,
    path: &NodePath,
) -> DiffResult<bool> {
    if at.name(a) != bt.name(b) || at.value(a) != bt.value(b) || at.edit(a) != bt.edit(b) {
        return Ok(false);
    }

    for child in at.children(a) {
        let child_path = path.child(at.name(*child).clone());
        let classification = oracle.classify(&child_path)?;
        let Some(peer) = unique_peer(at, *child, bt, b, &classification, &child_path)? else {
            return Ok(false);
        };

        // User-ordered members must keep their immediate same-tag
        // predecessor across the match, not just the member set.
        if classification.is_user_ordered() {
            if let Some(elder) = preceding_same_tag(at, a, *child) {
                let Some(elder_peer) =
                    unique_peer(at, elder, bt, b, &classification, &child_path)?
                else {
                    return Ok(false);
                };
                if preceding_same_tag(bt, b, peer) != Some(elder_peer) {
                    return Ok(false);
                }
            }
        }

        if !node_le(at, *child, bt, peer, oracle, &child_path)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// The nearest earlier sibling carrying the same tag as `node`, if any.
fn preceding_same_tag(tree: &ConfigTree, parent: NodeId, node: NodeId) -> Option<NodeId> {
    let position = tree.child_index(parent, node)?;
    let name = tree.name(node);
    tree.children(parent)[..position]
        .iter()
        .rev()
        .find(|c| tree.name(**c) == name)
        .copied()
}
