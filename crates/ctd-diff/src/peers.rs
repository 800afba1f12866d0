//! Peer matching between sibling sets of two trees.
//!
//! A node's *peer* is its structural counterpart under the matching rule
//! for its schema kind: leafs and containers match by name, leaf-lists by
//! name and value, lists by name and key-leaf tuple. Matching is pure; the
//! callers decide what a zero/one/many result means.

use ctd_schema::{NodeKind, SchemaClassification, SchemaOracle};
use ctd_types::{ConfigTree, NodeId, NodeName, NodePath};

use crate::error::{DiffError, DiffResult};

/// Key-leaf values of a list entry, paired with their names in schema key
/// order.
///
/// Each key leaf must appear exactly once under the entry; a valueless key
/// leaf contributes an empty string.
pub fn key_values(
    tree: &ConfigTree,
    entry: NodeId,
    keys: &[NodeName],
    path: &NodePath,
) -> DiffResult<Vec<(NodeName, String)>> {
    let mut values = Vec::with_capacity(keys.len());
    for key in keys {
        let mut found: Option<NodeId> = None;
        for child in tree.children(entry) {
            if tree.name(*child) == key {
                if found.is_some() {
                    return Err(DiffError::DuplicateKeyLeaf {
                        path: path.clone(),
                        key: key.clone(),
                    });
                }
                found = Some(*child);
            }
        }
        let Some(leaf) = found else {
            return Err(DiffError::MissingKeyLeaf {
                path: path.clone(),
                key: key.clone(),
            });
        };
        values.push((key.clone(), tree.value(leaf).unwrap_or("").to_string()));
    }
    Ok(values)
}

/// All peers of `node` among the children of `other_parent` in `other`.
///
/// `path` locates `node` (and therefore the candidates, which share its
/// tag) for error context. Zero or one peer is the well-formed outcome;
/// more than one means malformed input, reported by [`unique_peer`].
pub fn peers(
    tree: &ConfigTree,
    node: NodeId,
    other: &ConfigTree,
    other_parent: NodeId,
    classification: &SchemaClassification,
    path: &NodePath,
) -> DiffResult<Vec<NodeId>> {
    let name = tree.name(node);
    let candidates: Vec<NodeId> = other
        .children(other_parent)
        .iter()
        .copied()
        .filter(|c| other.name(*c) == name)
        .collect();

    match classification.kind {
        NodeKind::Leaf | NodeKind::Container => Ok(candidates),
        NodeKind::LeafList => Ok(candidates
            .into_iter()
            .filter(|c| other.value(*c) == tree.value(node))
            .collect()),
        NodeKind::List => {
            let node_keys = key_values(tree, node, &classification.key_leaves, path)?;
            let mut matched = Vec::new();
            for candidate in candidates {
                let candidate_keys =
                    key_values(other, candidate, &classification.key_leaves, path)?;
                if candidate_keys == node_keys {
                    matched.push(candidate);
                }
            }
            Ok(matched)
        }
    }
}

/// The single peer of `node` under `other_parent`, if any.
///
/// More than one match is a [`DiffError::NotUniquePeer`].
pub fn unique_peer(
    tree: &ConfigTree,
    node: NodeId,
    other: &ConfigTree,
    other_parent: NodeId,
    classification: &SchemaClassification,
    path: &NodePath,
) -> DiffResult<Option<NodeId>> {
    let mut matched = peers(tree, node, other, other_parent, classification, path)?;
    match matched.len() {
        0 => Ok(None),
        1 => Ok(matched.pop()),
        _ => Err(DiffError::NotUniquePeer { path: path.clone() }),
    }
}

/// Children of two matched parents, split by peer relation.
#[derive(Debug, Default)]
pub struct ChildPartition {
    /// Left children with no peer on the right, in document order.
    pub only_in_left: Vec<NodeId>,
    /// Right children with no peer on the left, in document order.
    pub only_in_right: Vec<NodeId>,
    /// Matched `(left, right)` pairs, in left document order.
    pub matched: Vec<(NodeId, NodeId)>,
}

impl ChildPartition {
    /// Returns `true` when both sides matched completely.
    pub fn is_fully_matched(&self) -> bool {
        self.only_in_left.is_empty() && self.only_in_right.is_empty()
    }
}

/// Partition the children of two matched parents into peers and leftovers.
///
/// Uniqueness is checked from both directions: a child with several peers
/// on the *other* side fails, and so does a child whose peer is claimed by
/// several children on *this* side (e.g. duplicated leaf-list values).
pub fn partition_children(
    left: &ConfigTree,
    left_parent: NodeId,
    right: &ConfigTree,
    right_parent: NodeId,
    oracle: &dyn SchemaOracle,
    parent_path: &NodePath,
) -> DiffResult<ChildPartition> {
    let mut partition = ChildPartition::default();

    for child in left.children(left_parent) {
        let path = parent_path.child(left.name(*child).clone());
        let classification = oracle.classify(&path)?;
        match unique_peer(left, *child, right, right_parent, &classification, &path)? {
            None => partition.only_in_left.push(*child),
            Some(peer) => partition.matched.push((*child, peer)),
        }
    }

    for child in right.children(right_parent) {
        let path = parent_path.child(right.name(*child).clone());
        let classification = oracle.classify(&path)?;
        if unique_peer(right, *child, left, left_parent, &classification, &path)?.is_none() {
            partition.only_in_right.push(*child);
        }
    }

    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctd_schema::InMemorySchema;

    fn name(s: &str) -> NodeName {
        NodeName::unqualified(s)
    }

    fn path(segments: &[&str]) -> NodePath {
        segments.iter().map(|s| name(s)).collect()
    }

    /// Schema: `iface` container, `speed` leaf, `dns` leaf-list,
    /// `acl` list keyed by `id`, `rule` list keyed by `proto` + `port`.
    fn schema() -> InMemorySchema {
        let mut schema = InMemorySchema::new();
        schema.register(path(&["iface"]), SchemaClassification::container());
        schema.register(path(&["iface", "speed"]), SchemaClassification::leaf());
        schema.register(path(&["iface", "dns"]), SchemaClassification::leaf_list());
        schema.register(
            path(&["iface", "acl"]),
            SchemaClassification::list([name("id")]),
        );
        schema.register(
            path(&["iface", "acl", "id"]),
            SchemaClassification::leaf(),
        );
        schema.register(
            path(&["iface", "rule"]),
            SchemaClassification::list([name("proto"), name("port")]),
        );
        schema
    }

    fn empty_iface(tree: &mut ConfigTree) -> NodeId {
        let root = tree.root();
        tree.add_child(root, name("iface"))
    }

    fn add_acl(tree: &mut ConfigTree, iface: NodeId, id: &str) -> NodeId {
        let acl = tree.add_child(iface, name("acl"));
        tree.add_leaf(acl, name("id"), id);
        acl
    }

    // ---- Kind-specific matching ----

    #[test]
    fn leaf_matches_by_name() {
        let mut a = ConfigTree::new();
        let ia = empty_iface(&mut a);
        let speed_a = a.add_leaf(ia, name("speed"), "10");

        let mut b = ConfigTree::new();
        let ib = empty_iface(&mut b);
        let speed_b = b.add_leaf(ib, name("speed"), "100");

        let class = SchemaClassification::leaf();
        let p = path(&["iface", "speed"]);
        let found = peers(&a, speed_a, &b, ib, &class, &p).unwrap();
        // Differing values still match: a leaf's identity is its name.
        assert_eq!(found, vec![speed_b]);
    }

    #[test]
    fn leaf_list_matches_by_value() {
        let mut a = ConfigTree::new();
        let ia = empty_iface(&mut a);
        let dns_a = a.add_leaf(ia, name("dns"), "8.8.8.8");

        let mut b = ConfigTree::new();
        let ib = empty_iface(&mut b);
        b.add_leaf(ib, name("dns"), "1.1.1.1");
        let dns_b = b.add_leaf(ib, name("dns"), "8.8.8.8");

        let class = SchemaClassification::leaf_list();
        let p = path(&["iface", "dns"]);
        assert_eq!(peers(&a, dns_a, &b, ib, &class, &p).unwrap(), vec![dns_b]);
    }

    #[test]
    fn list_matches_by_key_tuple() {
        let mut a = ConfigTree::new();
        let ia = empty_iface(&mut a);
        let acl1 = add_acl(&mut a, ia, "1");

        let mut b = ConfigTree::new();
        let ib = empty_iface(&mut b);
        add_acl(&mut b, ib, "2");
        let acl1_b = add_acl(&mut b, ib, "1");

        let class = SchemaClassification::list([name("id")]);
        let p = path(&["iface", "acl"]);
        assert_eq!(peers(&a, acl1, &b, ib, &class, &p).unwrap(), vec![acl1_b]);
    }

    #[test]
    fn multi_key_list_requires_whole_tuple() {
        let mut a = ConfigTree::new();
        let ia = empty_iface(&mut a);
        let rule = a.add_child(ia, name("rule"));
        a.add_leaf(rule, name("proto"), "tcp");
        a.add_leaf(rule, name("port"), "22");

        let mut b = ConfigTree::new();
        let ib = empty_iface(&mut b);
        let half = b.add_child(ib, name("rule"));
        b.add_leaf(half, name("proto"), "tcp");
        b.add_leaf(half, name("port"), "80");

        let class = SchemaClassification::list([name("proto"), name("port")]);
        let p = path(&["iface", "rule"]);
        assert!(peers(&a, rule, &b, ib, &class, &p).unwrap().is_empty());
    }

    // ---- Malformed entries ----

    #[test]
    fn missing_key_leaf_is_an_error() {
        let mut a = ConfigTree::new();
        let ia = empty_iface(&mut a);
        let acl = a.add_child(ia, name("acl"));

        let p = path(&["iface", "acl"]);
        let err = key_values(&a, acl, &[name("id")], &p).unwrap_err();
        assert_eq!(
            err,
            DiffError::MissingKeyLeaf {
                path: p,
                key: name("id"),
            }
        );
    }

    #[test]
    fn duplicate_key_leaf_is_an_error() {
        let mut a = ConfigTree::new();
        let ia = empty_iface(&mut a);
        let acl = a.add_child(ia, name("acl"));
        a.add_leaf(acl, name("id"), "1");
        a.add_leaf(acl, name("id"), "1");

        let p = path(&["iface", "acl"]);
        let err = key_values(&a, acl, &[name("id")], &p).unwrap_err();
        assert_eq!(
            err,
            DiffError::DuplicateKeyLeaf {
                path: p,
                key: name("id"),
            }
        );
    }

    #[test]
    fn duplicate_key_tuples_make_peer_ambiguous() {
        let mut a = ConfigTree::new();
        let ia = empty_iface(&mut a);
        let acl = add_acl(&mut a, ia, "7");

        let mut b = ConfigTree::new();
        let ib = empty_iface(&mut b);
        add_acl(&mut b, ib, "7");
        add_acl(&mut b, ib, "7");

        let class = SchemaClassification::list([name("id")]);
        let p = path(&["iface", "acl"]);
        let err = unique_peer(&a, acl, &b, ib, &class, &p).unwrap_err();
        assert_eq!(err, DiffError::NotUniquePeer { path: p });
    }

    // ---- Partitioning ----

    #[test]
    fn partition_splits_children() {
        let mut a = ConfigTree::new();
        let ia = empty_iface(&mut a);
        let speed = a.add_leaf(ia, name("speed"), "10");
        let acl1 = add_acl(&mut a, ia, "1");
        let acl3 = add_acl(&mut a, ia, "3");

        let mut b = ConfigTree::new();
        let ib = empty_iface(&mut b);
        let speed_b = b.add_leaf(ib, name("speed"), "100");
        let acl2 = add_acl(&mut b, ib, "2");
        let acl1_b = add_acl(&mut b, ib, "1");

        let partition =
            partition_children(&a, ia, &b, ib, &schema(), &path(&["iface"])).unwrap();
        assert_eq!(partition.only_in_left, vec![acl3]);
        assert_eq!(partition.only_in_right, vec![acl2]);
        assert_eq!(partition.matched, vec![(speed, speed_b), (acl1, acl1_b)]);
        assert!(!partition.is_fully_matched());
    }

    #[test]
    fn partition_catches_ambiguity_from_the_left_side() {
        // Two identical leaf-list values on the left both claim the single
        // right instance; the right-to-left pass reports the ambiguity.
        let mut a = ConfigTree::new();
        let ia = empty_iface(&mut a);
        a.add_leaf(ia, name("dns"), "8.8.8.8");
        a.add_leaf(ia, name("dns"), "8.8.8.8");

        let mut b = ConfigTree::new();
        let ib = empty_iface(&mut b);
        b.add_leaf(ib, name("dns"), "8.8.8.8");

        let err = partition_children(&a, ia, &b, ib, &schema(), &path(&["iface"])).unwrap_err();
        assert_eq!(
            err,
            DiffError::NotUniquePeer {
                path: path(&["iface", "dns"]),
            }
        );
    }

    #[test]
    fn partition_propagates_schema_not_found() {
        let mut a = ConfigTree::new();
        let ia = empty_iface(&mut a);
        a.add_leaf(ia, name("mtu"), "1500");

        let mut b = ConfigTree::new();
        let ib = empty_iface(&mut b);

        let err = partition_children(&a, ia, &b, ib, &schema(), &path(&["iface"])).unwrap_err();
        assert!(matches!(err, DiffError::Schema(_)));
    }
}
