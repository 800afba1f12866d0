//! Error types for the merge crate.

use ctd_types::{InsertHint, NodePath};

/// Errors that can occur while applying a delta or combining two configs.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Schema lookup failed.
    #[error("schema error: {0}")]
    Schema(#[from] ctd_schema::SchemaError),

    /// Peer matching failed while pairing children.
    #[error("diff error: {0}")]
    Diff(#[from] ctd_diff::DiffError),

    /// Two plain configs disagree on a leaf's value.
    #[error("conflicting values for {path}: {existing:?} vs {incoming:?}")]
    ConflictingConfig {
        path: NodePath,
        existing: Option<String>,
        incoming: Option<String>,
    },

    /// `create` hit a node that already exists.
    #[error("data exists: create on existing node {path}")]
    DataExists { path: NodePath },

    /// `delete` hit a node that does not exist.
    #[error("data missing: delete on absent node {path}")]
    DataMissing { path: NodePath },

    /// A `before`/`after` insert carries no usable anchor.
    #[error("insert={insert} on {path} lacks its anchor attribute")]
    MissingInsertAttribute { path: NodePath, insert: InsertHint },

    /// The insert anchor matched no sibling.
    #[error("insert anchor not found among siblings of {path}")]
    AnchorNotFound { path: NodePath },
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
