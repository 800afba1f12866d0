//! Schema oracle seam for Config Tree Delta (CTD).
//!
//! Every CTD engine consults a [`SchemaOracle`] to learn what a config node
//! *is*: its kind, whether sibling order matters, and which key leaves form
//! a list entry's identity. This crate defines the classification model,
//! the oracle trait, an in-memory registry for tests and embedding, and the
//! plain-config validation walk.
//!
//! # Key Types
//!
//! - [`SchemaClassification`] — Kind, ordering, access, and key leaves for one path
//! - [`NodeKind`] — Closed `{Leaf, LeafList, Container, List}` variant
//! - [`SchemaOracle`] — Classification capability consumed by the engines
//! - [`InMemorySchema`] — Path-keyed registry implementation
//! - [`validate()`] — Plain-config invariant check

pub mod classification;
pub mod error;
pub mod memory;
pub mod oracle;
pub mod validate;

pub use classification::{AccessMode, NodeKind, OrderedBy, SchemaClassification};
pub use error::{SchemaError, SchemaResult, ValidationError, ValidationResult};
pub use memory::InMemorySchema;
pub use oracle::SchemaOracle;
pub use validate::validate;
