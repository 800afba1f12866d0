use std::fmt;

use crate::edit::{EditMeta, InsertAnchor};
use crate::name::NodeName;
use crate::path::NodePath;

/// Index of a node within one [`ConfigTree`] arena.
///
/// A `NodeId` is only meaningful for the tree that produced it; looking up a
/// stale id, or an id from another tree, is a logic error. Identity
/// comparison between nodes of the same tree is id comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Clone, Debug)]
struct NodeData {
    name: NodeName,
    value: Option<String>,
    edit: EditMeta,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed configuration tree.
///
/// Slot 0 is a synthetic root (no value, no edit metadata) whose children
/// are the top-level schema roots. Nodes are addressed by [`NodeId`] and
/// hold child ids in document order plus a parent id. Copies between trees
/// allocate fresh arena entries, so no two trees ever alias; detached nodes
/// stay in the arena unreferenced until the tree is dropped.
#[derive(Clone)]
pub struct ConfigTree {
    nodes: Vec<NodeData>,
}

impl ConfigTree {
    /// Name of the synthetic root node.
    pub const ROOT_NAME: &'static str = "config";

    /// Create an empty tree holding only the synthetic root.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                name: NodeName::unqualified(Self::ROOT_NAME),
                value: None,
                edit: EditMeta::default(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The synthetic root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns `true` when the root has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Number of nodes reachable from the root, root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            count += 1;
            stack.extend(self.data(id).children.iter().copied());
        }
        count
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    // ---- Read access ----

    /// The node's name.
    pub fn name(&self, id: NodeId) -> &NodeName {
        &self.data(id).name
    }

    /// The node's scalar value, if any.
    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.data(id).value.as_deref()
    }

    /// The node's edit metadata.
    pub fn edit(&self, id: NodeId) -> &EditMeta {
        &self.data(id).edit
    }

    /// Child ids in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    /// The parent id, `None` for the root and for detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// Position of `child` within `parent`'s child list.
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.data(parent).children.iter().position(|c| *c == child)
    }

    /// Path of ancestor names from a top-level root down to `id`.
    ///
    /// The synthetic root contributes no segment; `path(root)` is the root
    /// path.
    pub fn path(&self, id: NodeId) -> NodePath {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.data(current).parent {
            segments.push(self.data(current).name.clone());
            current = parent;
        }
        segments.reverse();
        NodePath::from(segments)
    }

    // ---- Construction ----

    /// Append a child with no value under `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: NodeName) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            name,
            value: None,
            edit: EditMeta::default(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append a child carrying a scalar value under `parent`.
    pub fn add_leaf(
        &mut self,
        parent: NodeId,
        name: NodeName,
        value: impl Into<String>,
    ) -> NodeId {
        let id = self.add_child(parent, name);
        self.nodes[id.0].value = Some(value.into());
        id
    }

    /// Overwrite the node's scalar value.
    pub fn set_value(&mut self, id: NodeId, value: Option<String>) {
        self.nodes[id.0].value = value;
    }

    /// Mutable access to the node's edit metadata.
    pub fn edit_mut(&mut self, id: NodeId) -> &mut EditMeta {
        &mut self.nodes[id.0].edit
    }

    // ---- Structural edits ----

    /// Unlink `id` from its parent.
    ///
    /// The subtree stays in the arena but is no longer reachable from the
    /// root. Returns `false` for the root and for already-detached nodes.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.data(id).parent else {
            return false;
        };
        if let Some(pos) = self.child_index(parent, id) {
            self.nodes[parent.0].children.remove(pos);
        }
        self.nodes[id.0].parent = None;
        true
    }

    /// Move `child` to position `to_index` among `parent`'s children.
    ///
    /// The index is interpreted after `child` is removed from its current
    /// position; indices past the end append. A `child` not under `parent`
    /// is left untouched.
    pub fn move_child(&mut self, parent: NodeId, child: NodeId, to_index: usize) {
        if let Some(pos) = self.child_index(parent, child) {
            let siblings = &mut self.nodes[parent.0].children;
            siblings.remove(pos);
            let index = to_index.min(siblings.len());
            siblings.insert(index, child);
        }
    }

    // ---- Cross-tree copies ----

    /// Deep-copy the subtree rooted at `src_node` in `src`, appending it
    /// under `dest_parent`. Edit metadata is copied along.
    pub fn copy_from(&mut self, src: &ConfigTree, src_node: NodeId, dest_parent: NodeId) -> NodeId {
        self.copy_inner(src, src_node, dest_parent, false)
    }

    /// Deep-copy like [`copy_from`](Self::copy_from), clearing edit metadata
    /// on every copied node.
    pub fn copy_stripped_from(
        &mut self,
        src: &ConfigTree,
        src_node: NodeId,
        dest_parent: NodeId,
    ) -> NodeId {
        self.copy_inner(src, src_node, dest_parent, true)
    }

    fn copy_inner(
        &mut self,
        src: &ConfigTree,
        src_node: NodeId,
        dest_parent: NodeId,
        strip: bool,
    ) -> NodeId {
        let data = src.data(src_node);
        let id = self.add_child(dest_parent, data.name.clone());
        self.nodes[id.0].value = data.value.clone();
        if !strip {
            self.nodes[id.0].edit = data.edit.clone();
        }
        for child in &data.children {
            self.copy_inner(src, *child, id, strip);
        }
        id
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let data = self.data(id);
        write!(f, "{:indent$}{}", "", data.name, indent = depth * 2)?;
        if let Some(value) = &data.value {
            write!(f, " = {value}")?;
        }
        let mut flags = Vec::new();
        if let Some(op) = data.edit.operation {
            flags.push(op.to_string());
        }
        if let Some(hint) = data.edit.insert {
            flags.push(format!("insert={hint}"));
        }
        if let Some(anchor) = &data.edit.anchor {
            match anchor {
                InsertAnchor::Value(v) => flags.push(format!("anchor={v}")),
                InsertAnchor::Keys(keys) => {
                    let parts: Vec<String> =
                        keys.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    flags.push(format!("anchor={}", parts.join(",")));
                }
            }
        }
        if !flags.is_empty() {
            write!(f, " [{}]", flags.join(", "))?;
        }
        writeln!(f)?;
        for child in &data.children {
            self.fmt_node(f, *child, depth + 1)?;
        }
        Ok(())
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Indented text rendering for diagnostics and test output.
impl fmt::Display for ConfigTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root(), 0)
    }
}

impl fmt::Debug for ConfigTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigTree({} nodes)\n{self}", self.node_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::EditOperation;

    fn name(s: &str) -> NodeName {
        NodeName::unqualified(s)
    }

    /// `iface` container with `speed = 10` and two `acl` entries.
    fn sample_tree() -> ConfigTree {
        let mut tree = ConfigTree::new();
        let iface = tree.add_child(tree.root(), name("iface"));
        tree.add_leaf(iface, name("speed"), "10");
        for id in ["1", "2"] {
            let acl = tree.add_child(iface, name("acl"));
            tree.add_leaf(acl, name("id"), id);
        }
        tree
    }

    // ---- Construction and access ----

    #[test]
    fn build_and_read_back() {
        let tree = sample_tree();
        let iface = tree.children(tree.root())[0];
        assert_eq!(tree.name(iface), &name("iface"));
        assert_eq!(tree.children(iface).len(), 3);
        let speed = tree.children(iface)[0];
        assert_eq!(tree.value(speed), Some("10"));
        assert_eq!(tree.parent(speed), Some(iface));
        assert!(!tree.is_empty());
        assert!(ConfigTree::new().is_empty());
    }

    #[test]
    fn path_excludes_synthetic_root() {
        let tree = sample_tree();
        let iface = tree.children(tree.root())[0];
        let speed = tree.children(iface)[0];
        assert_eq!(tree.path(speed).to_string(), "/iface/speed");
        assert_eq!(tree.path(tree.root()).to_string(), "/");
    }

    #[test]
    fn node_count_ignores_detached() {
        let mut tree = sample_tree();
        assert_eq!(tree.node_count(), 7);
        let iface = tree.children(tree.root())[0];
        let acl = tree.children(iface)[1];
        assert!(tree.detach(acl));
        assert_eq!(tree.node_count(), 5);
    }

    // ---- Structural edits ----

    #[test]
    fn detach_unlinks_subtree() {
        let mut tree = sample_tree();
        let iface = tree.children(tree.root())[0];
        let speed = tree.children(iface)[0];
        assert!(tree.detach(speed));
        assert_eq!(tree.children(iface).len(), 2);
        assert_eq!(tree.parent(speed), None);
        assert!(!tree.detach(speed));
        assert!(!tree.detach(tree.root()));
    }

    #[test]
    fn move_child_repositions() {
        let mut tree = sample_tree();
        let iface = tree.children(tree.root())[0];
        let last = tree.children(iface)[2];
        tree.move_child(iface, last, 0);
        assert_eq!(tree.children(iface)[0], last);
        // Past-the-end index appends.
        tree.move_child(iface, last, 99);
        assert_eq!(tree.children(iface)[2], last);
    }

    // ---- Copies ----

    #[test]
    fn copy_from_is_deep_and_independent() {
        let src = sample_tree();
        let src_iface = src.children(src.root())[0];
        let mut dst = ConfigTree::new();
        let copied = dst.copy_from(&src, src_iface, dst.root());
        assert_eq!(dst.name(copied), &name("iface"));
        assert_eq!(dst.children(copied).len(), 3);
        // Mutating the copy leaves the source untouched.
        let speed = dst.children(copied)[0];
        dst.set_value(speed, Some("100".to_string()));
        let src_speed = src.children(src_iface)[0];
        assert_eq!(src.value(src_speed), Some("10"));
    }

    #[test]
    fn copy_stripped_clears_nested_edit_metadata() {
        let mut src = ConfigTree::new();
        let outer = src.add_child(src.root(), name("outer"));
        let inner = src.add_leaf(outer, name("inner"), "v");
        src.edit_mut(outer).operation = Some(EditOperation::Replace);
        src.edit_mut(inner).operation = Some(EditOperation::Delete);

        let mut dst = ConfigTree::new();
        let copied = dst.copy_stripped_from(&src, outer, dst.root());
        assert!(dst.edit(copied).is_empty());
        let copied_inner = dst.children(copied)[0];
        assert!(dst.edit(copied_inner).is_empty());

        let mut dst2 = ConfigTree::new();
        let kept = dst2.copy_from(&src, outer, dst2.root());
        assert_eq!(dst2.edit(kept).operation, Some(EditOperation::Replace));
    }

    // ---- Rendering ----

    #[test]
    fn display_renders_indented_tree() {
        let mut tree = sample_tree();
        let iface = tree.children(tree.root())[0];
        let speed = tree.children(iface)[0];
        tree.edit_mut(speed).operation = Some(EditOperation::Merge);
        let text = tree.to_string();
        assert!(text.starts_with("config\n"));
        assert!(text.contains("  iface\n"));
        assert!(text.contains("    speed = 10 [merge]\n"));
    }
}
