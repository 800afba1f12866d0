use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::name::NodeName;

/// Edit operation attached to a delta node.
///
/// Governs how the node combines with its peer during apply. A node with no
/// operation ("none" in wire terms) is represented by `Option::None` on
/// [`EditMeta`], so the enum itself is closed over the five explicit
/// operations and engines can match exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOperation {
    /// Combine with the peer, overwriting scalars.
    Merge,
    /// Discard the peer's subtree and take this one.
    Replace,
    /// Insert; an existing peer is an error.
    Create,
    /// Remove; an absent peer is an error.
    Delete,
    /// Remove; an absent peer is ignored.
    Remove,
}

impl EditOperation {
    /// Wire-form name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EditOperation::Merge => "merge",
            EditOperation::Replace => "replace",
            EditOperation::Create => "create",
            EditOperation::Delete => "delete",
            EditOperation::Remove => "remove",
        }
    }

    /// Returns `true` for the two removal operations.
    pub fn is_removal(&self) -> bool {
        matches!(self, EditOperation::Delete | EditOperation::Remove)
    }
}

impl fmt::Display for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EditOperation {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merge" => Ok(EditOperation::Merge),
            "replace" => Ok(EditOperation::Replace),
            "create" => Ok(EditOperation::Create),
            "delete" => Ok(EditOperation::Delete),
            "remove" => Ok(EditOperation::Remove),
            other => Err(TypeError::UnknownOperation(other.to_string())),
        }
    }
}

/// Insert position directive for user-ordered kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertHint {
    First,
    Last,
    Before,
    After,
}

impl InsertHint {
    /// Wire-form name of the position.
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertHint::First => "first",
            InsertHint::Last => "last",
            InsertHint::Before => "before",
            InsertHint::After => "after",
        }
    }

    /// Returns `true` if the position needs an anchor sibling.
    pub fn needs_anchor(&self) -> bool {
        matches!(self, InsertHint::Before | InsertHint::After)
    }
}

impl fmt::Display for InsertHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsertHint {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(InsertHint::First),
            "last" => Ok(InsertHint::Last),
            "before" => Ok(InsertHint::Before),
            "after" => Ok(InsertHint::After),
            other => Err(TypeError::UnknownInsert(other.to_string())),
        }
    }
}

/// Identity of the sibling a `before`/`after` insert is anchored to.
///
/// Leaf-lists anchor by scalar value; lists anchor by their key-leaf tuple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertAnchor {
    /// Scalar value of the anchor leaf-list instance.
    Value(String),
    /// Key-leaf values of the anchor list entry, in schema key order.
    Keys(Vec<(NodeName, String)>),
}

/// Edit metadata carried by delta nodes.
///
/// Plain (validated) configs carry none of this; see the validation walk in
/// the schema crate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditMeta {
    pub operation: Option<EditOperation>,
    pub insert: Option<InsertHint>,
    pub anchor: Option<InsertAnchor>,
}

impl EditMeta {
    /// Returns `true` when no metadata is set.
    pub fn is_empty(&self) -> bool {
        self.operation.is_none() && self.insert.is_none() && self.anchor.is_none()
    }

    /// Drop all metadata.
    pub fn clear(&mut self) {
        *self = EditMeta::default();
    }
}
