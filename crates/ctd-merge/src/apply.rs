//! Delta application and plain-config combination.
//!
//! Both operations walk a base tree and a second tree in lockstep, pairing
//! children with the diff crate's peer matcher and folding the right-hand
//! side into a copy of the base. Applying a delta half honors the edit
//! operations and insert hints its nodes carry; combining two plain
//! configs takes their union and reports disagreeing leaves instead of
//! silently picking a side.

use std::collections::HashMap;

use tracing::debug;

use ctd_diff::partition_children;
use ctd_schema::{NodeKind, SchemaClassification, SchemaOracle};
use ctd_types::{ConfigTree, Delta, EditOperation, NodeId, NodePath};

use crate::error::{MergeError, MergeResult};
use crate::position::{index_after_last_same_tag, place};

/// Apply the forward half of `delta` to `base`, producing the target
/// config the delta was computed against.
///
/// `base` is not modified; the result is a fresh tree carrying no edit
/// metadata. Fails when an edit cannot apply, e.g. `create` on a node
/// that already exists or `delete` on one that does not.
pub fn apply(
    base: &ConfigTree,
    delta: &Delta,
    oracle: &dyn SchemaOracle,
) -> MergeResult<ConfigTree> {
    debug!(nodes = base.node_count(), "applying forward half");
    merge_trees(base, delta.forward(), oracle, MergeMode::Delta)
}

/// Apply the reverse half of `delta` to `base`, undoing a prior
/// [`apply`] of the same delta.
pub fn revert(
    base: &ConfigTree,
    delta: &Delta,
    oracle: &dyn SchemaOracle,
) -> MergeResult<ConfigTree> {
    debug!(nodes = base.node_count(), "applying reverse half");
    merge_trees(base, delta.reverse(), oracle, MergeMode::Delta)
}

/// Union of two plain configs.
///
/// Subtrees present on one side only are copied into the result; leaves
/// present on both sides must agree, otherwise
/// [`MergeError::ConflictingConfig`] names the first disagreement.
pub fn combine(
    a: &ConfigTree,
    b: &ConfigTree,
    oracle: &dyn SchemaOracle,
) -> MergeResult<ConfigTree> {
    debug!("combining configs");
    merge_trees(a, b, oracle, MergeMode::Combine)
}

/// How a matched leaf without an explicit operation is treated.
#[derive(Clone, Copy, PartialEq, Eq)]
enum MergeMode {
    /// Both inputs are plain configs; disagreeing leaves conflict.
    Combine,
    /// The right input is a delta half; its leaves overwrite.
    Delta,
}

fn merge_trees(
    base: &ConfigTree,
    other: &ConfigTree,
    oracle: &dyn SchemaOracle,
    mode: MergeMode,
) -> MergeResult<ConfigTree> {
    let mut build = MergeBuild {
        sum: base.clone(),
        other,
        oracle,
        mode,
    };
    let sum_root = build.sum.root();
    build.node_add(sum_root, other.root(), &NodePath::root())?;
    Ok(build.sum)
}

/// State threaded through the recursive merge.
///
/// `sum` starts as a clone of the base tree and is edited in place, so
/// node ids from the base remain valid throughout.
struct MergeBuild<'a> {
    sum: ConfigTree,
    other: &'a ConfigTree,
    oracle: &'a dyn SchemaOracle,
    mode: MergeMode,
}

impl MergeBuild<'_> {
    /// Fold the children of `o` (in the other tree) into `s` (in the sum).
    ///
    /// Children are visited in the other tree's document order so that
    /// sibling repositioning sees the effect of earlier hints.
    fn node_add(&mut self, s: NodeId, o: NodeId, path: &NodePath) -> MergeResult<()> {
        let other = self.other;
        let partition = partition_children(&self.sum, s, other, o, self.oracle, path)?;
        let peer_of: HashMap<NodeId, NodeId> = partition
            .matched
            .iter()
            .map(|(sum_child, other_child)| (*other_child, *sum_child))
            .collect();
        for oc in other.children(o) {
            let child_path = path.child(other.name(*oc).clone());
            let classification = self.oracle.classify(&child_path)?;
            match peer_of.get(oc).copied() {
                None => self.add_absent(s, *oc, &classification, &child_path)?,
                Some(sc) => self.add_matched(s, sc, *oc, &classification, &child_path)?,
            }
        }
        Ok(())
    }

    /// A child of the other tree with no peer in the sum.
    fn add_absent(
        &mut self,
        parent: NodeId,
        oc: NodeId,
        classification: &SchemaClassification,
        path: &NodePath,
    ) -> MergeResult<()> {
        let other = self.other;
        let edit = other.edit(oc);
        match edit.operation {
            Some(EditOperation::Delete) => {
                return Err(MergeError::DataMissing { path: path.clone() });
            }
            Some(EditOperation::Remove) => return Ok(()),
            None
            | Some(EditOperation::Merge | EditOperation::Replace | EditOperation::Create) => {}
        }
        debug!(path = %path, "grafting subtree");
        let copied = self.sum.copy_stripped_from(other, oc, parent);
        if classification.is_user_ordered() {
            if let Some(hint) = edit.insert {
                return place(
                    &mut self.sum,
                    parent,
                    copied,
                    hint,
                    edit.anchor.as_ref(),
                    classification,
                    path,
                );
            }
        }
        // Unhinted sequence entries stay contiguous with their tag.
        if classification.kind.is_sequence() {
            if let Some(index) = index_after_last_same_tag(&self.sum, parent, copied) {
                self.sum.move_child(parent, copied, index);
            }
        }
        Ok(())
    }

    /// A child of the other tree whose peer `sc` exists in the sum.
    fn add_matched(
        &mut self,
        parent: NodeId,
        sc: NodeId,
        oc: NodeId,
        classification: &SchemaClassification,
        path: &NodePath,
    ) -> MergeResult<()> {
        let other = self.other;
        let edit = other.edit(oc);
        match classification.kind {
            NodeKind::Leaf => self.merge_leaf(sc, oc, path),
            NodeKind::LeafList => match edit.operation {
                None | Some(EditOperation::Merge | EditOperation::Replace) => {
                    // Matched by value, so only the position can change.
                    if classification.is_user_ordered() {
                        if let Some(hint) = edit.insert {
                            place(
                                &mut self.sum,
                                parent,
                                sc,
                                hint,
                                edit.anchor.as_ref(),
                                classification,
                                path,
                            )?;
                        }
                    }
                    Ok(())
                }
                Some(EditOperation::Create) => {
                    Err(MergeError::DataExists { path: path.clone() })
                }
                Some(EditOperation::Delete | EditOperation::Remove) => {
                    self.sum.detach(sc);
                    Ok(())
                }
            },
            NodeKind::Container => self.merge_interior(parent, sc, oc, path),
            NodeKind::List => {
                let removal = edit.operation.is_some_and(|op| op.is_removal());
                if !removal && classification.is_user_ordered() {
                    if let Some(hint) = edit.insert {
                        place(
                            &mut self.sum,
                            parent,
                            sc,
                            hint,
                            edit.anchor.as_ref(),
                            classification,
                            path,
                        )?;
                    }
                }
                self.merge_interior(parent, sc, oc, path)
            }
        }
    }

    fn merge_leaf(&mut self, sc: NodeId, oc: NodeId, path: &NodePath) -> MergeResult<()> {
        let other = self.other;
        match other.edit(oc).operation {
            None => match self.mode {
                MergeMode::Delta => {
                    self.sum.set_value(sc, other.value(oc).map(str::to_owned));
                    Ok(())
                }
                MergeMode::Combine => {
                    if self.sum.value(sc) != other.value(oc) {
                        return Err(MergeError::ConflictingConfig {
                            path: path.clone(),
                            existing: self.sum.value(sc).map(str::to_owned),
                            incoming: other.value(oc).map(str::to_owned),
                        });
                    }
                    Ok(())
                }
            },
            Some(EditOperation::Merge | EditOperation::Replace) => {
                self.sum.set_value(sc, other.value(oc).map(str::to_owned));
                Ok(())
            }
            Some(EditOperation::Create) => Err(MergeError::DataExists { path: path.clone() }),
            Some(EditOperation::Delete | EditOperation::Remove) => {
                self.sum.detach(sc);
                Ok(())
            }
        }
    }

    /// Shared operation dispatch for matched containers and list entries.
    fn merge_interior(
        &mut self,
        parent: NodeId,
        sc: NodeId,
        oc: NodeId,
        path: &NodePath,
    ) -> MergeResult<()> {
        let other = self.other;
        match other.edit(oc).operation {
            None | Some(EditOperation::Merge) => self.node_add(sc, oc, path),
            Some(EditOperation::Replace) => {
                debug!(path = %path, "replacing subtree");
                let index = self.sum.child_index(parent, sc);
                self.sum.detach(sc);
                let copied = self.sum.copy_stripped_from(other, oc, parent);
                if let Some(index) = index {
                    self.sum.move_child(parent, copied, index);
                }
                Ok(())
            }
            Some(EditOperation::Create) => Err(MergeError::DataExists { path: path.clone() }),
            Some(EditOperation::Delete | EditOperation::Remove) => {
                self.sum.detach(sc);
                Ok(())
            }
        }
    }
}
