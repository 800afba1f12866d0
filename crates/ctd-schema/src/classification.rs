use serde::{Deserialize, Serialize};

use ctd_types::NodeName;

/// Schema kind of a config node.
///
/// Closed set: every engine dispatches on it with an exhaustive `match`, so
/// adding a kind is a compile-visible change at every call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Single scalar; at most one instance per name under a parent.
    Leaf,
    /// Repeatable scalar; instances are identified by value.
    LeafList,
    /// Single interior node; at most one instance per name under a parent.
    Container,
    /// Repeatable interior node; instances are identified by key leaves.
    List,
}

impl NodeKind {
    /// Returns `true` for kinds that may repeat under one parent.
    pub fn is_sequence(&self) -> bool {
        matches!(self, NodeKind::LeafList | NodeKind::List)
    }

    /// Returns `true` for kinds that carry a scalar value.
    pub fn has_value(&self) -> bool {
        matches!(self, NodeKind::Leaf | NodeKind::LeafList)
    }
}

/// Whether sibling order of a sequence kind is meaningful.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderedBy {
    /// Order is chosen by the device; edits need not preserve it.
    #[default]
    System,
    /// Order is part of the configuration and must be reproduced.
    User,
}

/// Access mode of a schema node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    ReadOnly,
    #[default]
    ReadWrite,
    WriteOnly,
}

/// Schema classification of one config node path.
///
/// The oracle's answer for a path: the node kind, its ordering, its access
/// mode, and (for lists) the ordered key-leaf names forming an entry's
/// identity tuple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaClassification {
    pub kind: NodeKind,
    pub ordered_by: OrderedBy,
    pub access: AccessMode,
    /// Key-leaf names in schema order. Empty for non-list kinds.
    pub key_leaves: Vec<NodeName>,
}

impl SchemaClassification {
    fn new(kind: NodeKind, key_leaves: Vec<NodeName>) -> Self {
        Self {
            kind,
            ordered_by: OrderedBy::default(),
            access: AccessMode::default(),
            key_leaves,
        }
    }

    /// A system-ordered, read-write leaf.
    pub fn leaf() -> Self {
        Self::new(NodeKind::Leaf, Vec::new())
    }

    /// A system-ordered, read-write leaf-list.
    pub fn leaf_list() -> Self {
        Self::new(NodeKind::LeafList, Vec::new())
    }

    /// A read-write container.
    pub fn container() -> Self {
        Self::new(NodeKind::Container, Vec::new())
    }

    /// A system-ordered, read-write list keyed by `key_leaves`.
    pub fn list(key_leaves: impl IntoIterator<Item = NodeName>) -> Self {
        Self::new(NodeKind::List, key_leaves.into_iter().collect())
    }

    /// Mark the node user-ordered.
    pub fn user_ordered(mut self) -> Self {
        self.ordered_by = OrderedBy::User;
        self
    }

    /// Override the access mode.
    pub fn with_access(mut self, access: AccessMode) -> Self {
        self.access = access;
        self
    }

    /// Returns `true` when sibling order must be preserved: a sequence kind
    /// classified ordered-by user.
    pub fn is_user_ordered(&self) -> bool {
        self.kind.is_sequence() && self.ordered_by == OrderedBy::User
    }

    /// Returns `true` if `name` is one of the list's key leaves.
    pub fn is_key_leaf(&self, name: &NodeName) -> bool {
        self.key_leaves.contains(name)
    }
}
