//! Error types for the diff crate.

use ctd_types::{NodeName, NodePath};

/// Errors that can occur during peer matching, comparison, and diffing.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// Schema lookup failed (no classification, or backend failure).
    #[error("schema error: {0}")]
    Schema(#[from] ctd_schema::SchemaError),

    /// More than one peer matched under one parent. Indicates malformed
    /// input or a list with duplicate key tuples.
    #[error("peer is not unique for {path}")]
    NotUniquePeer { path: NodePath },

    /// A list entry lacks one of its schema-declared key leaves.
    #[error("list entry {path} is missing key leaf {key}")]
    MissingKeyLeaf { path: NodePath, key: NodeName },

    /// A list entry carries a key leaf more than once.
    #[error("list entry {path} has duplicate key leaf {key}")]
    DuplicateKeyLeaf { path: NodePath, key: NodeName },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
