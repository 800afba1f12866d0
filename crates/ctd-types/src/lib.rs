//! Foundation types for Config Tree Delta (CTD).
//!
//! This crate provides the data model shared by every other CTD crate:
//! qualified node names, node paths, the arena-backed configuration tree,
//! edit metadata, and the forward/reverse delta pair.
//!
//! # Key Types
//!
//! - [`NodeName`] — Qualified identifier (namespace + local name)
//! - [`NodePath`] — Ancestor chain used for oracle lookups and error context
//! - [`ConfigTree`] / [`NodeId`] — Arena-backed config tree with id-addressed nodes
//! - [`EditOperation`] / [`InsertHint`] / [`InsertAnchor`] / [`EditMeta`] — Edit metadata
//! - [`Delta`] — Invertible forward/reverse pair of config trees

pub mod delta;
pub mod edit;
pub mod error;
pub mod name;
pub mod path;
pub mod tree;

pub use delta::Delta;
pub use edit::{EditMeta, EditOperation, InsertAnchor, InsertHint};
pub use error::{TypeError, TypeResult};
pub use name::NodeName;
pub use path::NodePath;
pub use tree::{ConfigTree, NodeId};
