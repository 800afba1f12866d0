//! Sibling positioning for sequence nodes.
//!
//! User-ordered lists and leaf-lists carry `insert` hints that pin an
//! entry relative to its same-tag siblings. The helpers here translate a
//! hint into a concrete index in the parent's child list and move the
//! entry there.

use ctd_schema::{NodeKind, SchemaClassification};
use ctd_types::{ConfigTree, InsertAnchor, InsertHint, NodeId, NodeName, NodePath};

use crate::error::{MergeError, MergeResult};

/// Moves `node` to the position demanded by `hint` among its same-tag
/// siblings under `parent`.
///
/// `node` must already be a child of `parent`. `before`/`after` require an
/// `anchor` identifying the reference sibling; the anchor form must match
/// the node kind (a value for leaf-lists, key leaves for lists). An anchor
/// that resolves to `node` itself leaves the tree untouched.
pub(crate) fn place(
    tree: &mut ConfigTree,
    parent: NodeId,
    node: NodeId,
    hint: InsertHint,
    anchor: Option<&InsertAnchor>,
    classification: &SchemaClassification,
    path: &NodePath,
) -> MergeResult<()> {
    let name = tree.name(node).clone();
    let order = order_without(tree, parent, node);
    let index = match hint {
        InsertHint::First => {
            match order.iter().position(|c| tree.name(*c) == &name) {
                Some(first) => first,
                None => return Ok(()),
            }
        }
        InsertHint::Last => {
            match order.iter().rposition(|c| tree.name(*c) == &name) {
                Some(last) => last + 1,
                None => return Ok(()),
            }
        }
        InsertHint::Before | InsertHint::After => {
            let anchor = anchor.ok_or_else(|| MergeError::MissingInsertAttribute {
                path: path.clone(),
                insert: hint,
            })?;
            // Resolved against all siblings, node included, so an anchor
            // naming the node itself is recognized rather than rejected.
            let siblings = tree.children(parent).to_vec();
            let target =
                resolve_anchor(tree, &siblings, &name, anchor, classification, hint, path)?;
            if target == node {
                return Ok(());
            }
            let at = order
                .iter()
                .position(|c| *c == target)
                .ok_or_else(|| MergeError::AnchorNotFound { path: path.clone() })?;
            if hint == InsertHint::Before {
                at
            } else {
                at + 1
            }
        }
    };
    tree.move_child(parent, node, index);
    Ok(())
}

/// Index just past the last same-tag sibling of `node`, or `None` when no
/// other instance of the tag exists under `parent`.
///
/// New sequence entries without an insert hint land here so that list
/// entries stay contiguous.
pub(crate) fn index_after_last_same_tag(
    tree: &ConfigTree,
    parent: NodeId,
    node: NodeId,
) -> Option<usize> {
    let name = tree.name(node).clone();
    let order = order_without(tree, parent, node);
    order
        .iter()
        .rposition(|c| tree.name(*c) == &name)
        .map(|last| last + 1)
}

/// Child list of `parent` with `node` filtered out.
///
/// `ConfigTree::move_child` interprets the destination index against the
/// list after removal, so position math happens on this view.
fn order_without(tree: &ConfigTree, parent: NodeId, node: NodeId) -> Vec<NodeId> {
    tree.children(parent)
        .iter()
        .copied()
        .filter(|c| *c != node)
        .collect()
}

fn resolve_anchor(
    tree: &ConfigTree,
    siblings: &[NodeId],
    name: &NodeName,
    anchor: &InsertAnchor,
    classification: &SchemaClassification,
    hint: InsertHint,
    path: &NodePath,
) -> MergeResult<NodeId> {
    let malformed = || MergeError::MissingInsertAttribute {
        path: path.clone(),
        insert: hint,
    };
    match (classification.kind, anchor) {
        (NodeKind::LeafList, InsertAnchor::Value(value)) => siblings
            .iter()
            .copied()
            .find(|c| tree.name(*c) == name && tree.value(*c).unwrap_or("") == value.as_str())
            .ok_or_else(|| MergeError::AnchorNotFound { path: path.clone() }),
        (NodeKind::List, InsertAnchor::Keys(pairs)) => {
            let complete = classification
                .key_leaves
                .iter()
                .all(|key| pairs.iter().any(|(name, _)| name == key));
            if !complete {
                return Err(malformed());
            }
            siblings
                .iter()
                .copied()
                .find(|c| tree.name(*c) == name && keys_match(tree, *c, classification, pairs))
                .ok_or_else(|| MergeError::AnchorNotFound { path: path.clone() })
        }
        _ => Err(malformed()),
    }
}

/// True when every key leaf of `entry` carries the value named in `pairs`.
fn keys_match(
    tree: &ConfigTree,
    entry: NodeId,
    classification: &SchemaClassification,
    pairs: &[(NodeName, String)],
) -> bool {
    classification.key_leaves.iter().all(|key| {
        pairs
            .iter()
            .find(|(name, _)| name == key)
            .is_some_and(|(_, value)| {
                tree.children(entry)
                    .iter()
                    .any(|c| tree.name(*c) == key && tree.value(*c).unwrap_or("") == value.as_str())
            })
    })
}
