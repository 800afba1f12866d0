//! Delta computation between two config trees.
//!
//! `diff(source, target)` produces a [`Delta`] whose forward half rewrites
//! `source` into `target` and whose reverse half undoes it. Both halves are
//! built fresh: removed subtrees become identity-only delete markers in one
//! half and full restoring copies in the other, changed leaves carry one
//! value per half, unchanged subtrees are omitted, and user-ordered
//! sequences that moved get their whole remaining membership materialized
//! with insert hints.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use ctd_schema::{NodeKind, SchemaClassification, SchemaOracle};
use ctd_types::{
    ConfigTree, Delta, EditOperation, InsertAnchor, InsertHint, NodeId, NodeName, NodePath,
};

use crate::compare::nodes_equal;
use crate::error::DiffResult;
use crate::peers::{key_values, partition_children, ChildPartition};

/// Compute the delta that rewrites `source` into `target`.
///
/// Neither input is mutated. Equal trees yield an empty delta.
pub fn diff(
    source: &ConfigTree,
    target: &ConfigTree,
    oracle: &dyn SchemaOracle,
) -> DiffResult<Delta> {
    debug!(
        source_nodes = source.node_count(),
        target_nodes = target.node_count(),
        "computing config delta"
    );
    let mut build = DiffBuild {
        source,
        target,
        oracle,
        forward: ConfigTree::new(),
        reverse: ConfigTree::new(),
    };
    let fwd_root = build.forward.root();
    let rev_root = build.reverse.root();
    build.diff_node(
        source.root(),
        target.root(),
        fwd_root,
        rev_root,
        &NodePath::root(),
        &[],
    )?;
    Ok(Delta::new(build.forward, build.reverse))
}

struct DiffBuild<'a> {
    source: &'a ConfigTree,
    target: &'a ConfigTree,
    oracle: &'a dyn SchemaOracle,
    forward: ConfigTree,
    reverse: ConfigTree,
}

impl DiffBuild<'_> {
    /// Diff one matched node pair, appending fragments under the given
    /// half parents. `entry_keys` are the key-leaf names of the pair when
    /// it is a list entry, empty otherwise.
    fn diff_node(
        &mut self,
        s: NodeId,
        t: NodeId,
        fwd_parent: NodeId,
        rev_parent: NodeId,
        path: &NodePath,
        entry_keys: &[NodeName],
    ) -> DiffResult<()> {
        let partition =
            partition_children(self.source, s, self.target, t, self.oracle, path)?;

        // Nodes materialized per side child, consulted by the user-ordered
        // pass so it can reuse fragments instead of duplicating them.
        let mut in_forward: HashMap<NodeId, NodeId> = HashMap::new();
        let mut in_reverse: HashMap<NodeId, NodeId> = HashMap::new();
        let mut user_tags: Vec<NodeName> = Vec::new();

        for child in &partition.only_in_left {
            let child_path = path.child(self.source.name(*child).clone());
            let classification = self.oracle.classify(&child_path)?;
            delete_marker(
                &mut self.forward,
                self.source,
                *child,
                fwd_parent,
                &classification,
                &child_path,
            )?;
            let copy = self.reverse.copy_from(self.source, *child, rev_parent);
            in_reverse.insert(*child, copy);
            note_user_tag(&mut user_tags, &classification, self.source.name(*child));
        }

        for child in &partition.only_in_right {
            let child_path = path.child(self.target.name(*child).clone());
            let classification = self.oracle.classify(&child_path)?;
            let copy = self.forward.copy_from(self.target, *child, fwd_parent);
            in_forward.insert(*child, copy);
            delete_marker(
                &mut self.reverse,
                self.target,
                *child,
                rev_parent,
                &classification,
                &child_path,
            )?;
            note_user_tag(&mut user_tags, &classification, self.target.name(*child));
        }

        for (cs, ct) in &partition.matched {
            let name = self.source.name(*cs).clone();
            let child_path = path.child(name.clone());
            let classification = self.oracle.classify(&child_path)?;
            note_user_tag(&mut user_tags, &classification, &name);

            match classification.kind {
                NodeKind::Leaf => {
                    let source_value = self.source.value(*cs);
                    let target_value = self.target.value(*ct);
                    if source_value != target_value {
                        let f =
                            add_scalar(&mut self.forward, fwd_parent, name.clone(), target_value);
                        in_forward.insert(*ct, f);
                        let r = add_scalar(&mut self.reverse, rev_parent, name, source_value);
                        in_reverse.insert(*cs, r);
                    } else if entry_keys.contains(&name) {
                        // Key leaves ride along in both halves as identity
                        // context for the enclosing list entry.
                        add_scalar(&mut self.forward, fwd_parent, name.clone(), target_value);
                        add_scalar(&mut self.reverse, rev_parent, name, source_value);
                    }
                }
                NodeKind::LeafList => {
                    // A leaf-list peer implies equal values; any order
                    // change is handled by the user-ordered pass below.
                }
                NodeKind::Container | NodeKind::List => {
                    if !nodes_equal(self.source, *cs, self.target, *ct, self.oracle, &child_path)?
                    {
                        // Pass-through parents: same name, no operation,
                        // so nested fragments keep their path context.
                        let f = self.forward.add_child(fwd_parent, name.clone());
                        let r = self.reverse.add_child(rev_parent, name);
                        in_forward.insert(*ct, f);
                        in_reverse.insert(*cs, r);
                        self.diff_node(
                            *cs,
                            *ct,
                            f,
                            r,
                            &child_path,
                            &classification.key_leaves,
                        )?;
                    }
                }
            }
        }

        for tag in &user_tags {
            let tag_path = path.child(tag.clone());
            let classification = self.oracle.classify(&tag_path)?;
            let s_members = tag_members(self.source, s, tag);
            let t_members = tag_members(self.target, t, tag);
            if !order_changed(&s_members, &t_members, &partition) {
                continue;
            }
            debug!(tag = %tag, "user-ordered sequence changed, emitting insert hints");
            hint_sequence(
                &mut self.forward,
                fwd_parent,
                self.target,
                &t_members,
                &in_forward,
                &classification,
                &tag_path,
            )?;
            hint_sequence(
                &mut self.reverse,
                rev_parent,
                self.source,
                &s_members,
                &in_reverse,
                &classification,
                &tag_path,
            )?;
        }
        Ok(())
    }
}

fn tag_members(side: &ConfigTree, parent: NodeId, tag: &NodeName) -> Vec<NodeId> {
    side.children(parent)
        .iter()
        .copied()
        .filter(|c| side.name(*c) == tag)
        .collect()
}

/// Whether a user-ordered tag needs insert hints: true when its membership
/// differs between the sides, or when the peers of the surviving source
/// members no longer appear in the same relative order on the target side.
fn order_changed(s_members: &[NodeId], t_members: &[NodeId], partition: &ChildPartition) -> bool {
    let matched_pairs: HashMap<NodeId, NodeId> = partition.matched.iter().copied().collect();
    let matched_targets: HashSet<NodeId> = partition.matched.iter().map(|(_, ct)| *ct).collect();
    let s_matched: Vec<NodeId> = s_members
        .iter()
        .copied()
        .filter(|m| matched_pairs.contains_key(m))
        .collect();
    let t_matched: Vec<NodeId> = t_members
        .iter()
        .copied()
        .filter(|m| matched_targets.contains(m))
        .collect();

    if s_matched.len() != s_members.len() || t_matched.len() != t_members.len() {
        return true;
    }
    let projected: Vec<NodeId> = s_matched
        .iter()
        .filter_map(|m| matched_pairs.get(m).copied())
        .collect();
    projected != t_matched
}

/// Append an identity-only delete marker for `node` to a delta half.
///
/// The marker carries just enough to find the node again at apply time:
/// nothing beyond the name for leafs and containers, the scalar value for
/// leaf-lists, the key leaves for lists.
fn delete_marker(
    half: &mut ConfigTree,
    side: &ConfigTree,
    node: NodeId,
    parent: NodeId,
    classification: &SchemaClassification,
    path: &NodePath,
) -> DiffResult<NodeId> {
    let marker = half.add_child(parent, side.name(node).clone());
    half.edit_mut(marker).operation = Some(EditOperation::Delete);
    match classification.kind {
        NodeKind::Leaf | NodeKind::Container => {}
        NodeKind::LeafList => half.set_value(marker, side.value(node).map(str::to_string)),
        NodeKind::List => {
            for (key, value) in key_values(side, node, &classification.key_leaves, path)? {
                half.add_leaf(marker, key, value);
            }
        }
    }
    Ok(marker)
}

fn add_scalar(
    half: &mut ConfigTree,
    parent: NodeId,
    name: NodeName,
    value: Option<&str>,
) -> NodeId {
    let id = half.add_child(parent, name);
    half.set_value(id, value.map(str::to_string));
    id
}

fn note_user_tag(
    tags: &mut Vec<NodeName>,
    classification: &SchemaClassification,
    name: &NodeName,
) {
    if classification.is_user_ordered() && !tags.contains(name) {
        tags.push(name.clone());
    }
}

/// Materialize the full membership of a user-ordered tag in one half, in
/// the side's document order, and stamp insert hints onto it: `first` at
/// position zero, `after` the immediate predecessor everywhere else.
fn hint_sequence(
    half: &mut ConfigTree,
    half_parent: NodeId,
    side: &ConfigTree,
    members: &[NodeId],
    materialized: &HashMap<NodeId, NodeId>,
    classification: &SchemaClassification,
    tag_path: &NodePath,
) -> DiffResult<()> {
    let mut placed: Vec<NodeId> = Vec::with_capacity(members.len());
    for member in members {
        let id = match materialized.get(member) {
            Some(id) => *id,
            None => {
                // Identity-only entry for a member that content diffing
                // left out.
                let id = half.add_child(half_parent, side.name(*member).clone());
                match classification.kind {
                    NodeKind::LeafList => {
                        half.set_value(id, side.value(*member).map(str::to_string));
                    }
                    NodeKind::List => {
                        for (key, value) in
                            key_values(side, *member, &classification.key_leaves, tag_path)?
                        {
                            half.add_leaf(id, key, value);
                        }
                    }
                    NodeKind::Leaf | NodeKind::Container => {}
                }
                id
            }
        };
        placed.push(id);
    }

    for (index, id) in placed.iter().enumerate() {
        let anchor = if index == 0 {
            None
        } else {
            let predecessor = members[index - 1];
            Some(match classification.kind {
                NodeKind::List => InsertAnchor::Keys(key_values(
                    side,
                    predecessor,
                    &classification.key_leaves,
                    tag_path,
                )?),
                _ => InsertAnchor::Value(side.value(predecessor).unwrap_or("").to_string()),
            })
        };
        // Each member moves to the tail in turn, leaving the sequence in
        // document order behind the rest of the half's children.
        let end = half.children(half_parent).len();
        half.move_child(half_parent, *id, end);
        let edit = half.edit_mut(*id);
        match anchor {
            None => edit.insert = Some(InsertHint::First),
            Some(anchor) => {
                edit.insert = Some(InsertHint::After);
                edit.anchor = Some(anchor);
            }
        }
    }
    Ok(())
}
