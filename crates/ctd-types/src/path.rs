use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::NodeName;

/// Path from a top-level schema root down to a node.
///
/// The synthetic tree root is not part of any path; a top-level node has a
/// one-segment path. Paths key schema-oracle lookups and give every error a
/// precise location. Rendered as `/a/b/c`.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodePath(Vec<NodeName>);

impl NodePath {
    /// The empty path (the synthetic root itself).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from name segments.
    pub fn from_segments(segments: impl IntoIterator<Item = NodeName>) -> Self {
        Self(segments.into_iter().collect())
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[NodeName] {
        &self.0
    }

    /// The final segment, if any.
    pub fn last(&self) -> Option<&NodeName> {
        self.0.last()
    }

    /// Append a segment in place.
    pub fn push(&mut self, name: NodeName) {
        self.0.push(name);
    }

    /// Remove the final segment in place.
    pub fn pop(&mut self) -> Option<NodeName> {
        self.0.pop()
    }

    /// A new path with one more segment.
    pub fn child(&self, name: NodeName) -> Self {
        let mut segments = self.0.clone();
        segments.push(name);
        Self(segments)
    }

    /// The path one segment up, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodePath({self})")
    }
}

impl From<Vec<NodeName>> for NodePath {
    fn from(segments: Vec<NodeName>) -> Self {
        Self(segments)
    }
}

impl FromIterator<NodeName> for NodePath {
    fn from_iter<I: IntoIterator<Item = NodeName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
