use ctd_types::NodePath;
use thiserror::Error;

/// Errors from schema oracle lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The path has no schema classification. Fatal to any tree walk:
    /// without the node kind nothing can be matched or merged safely.
    #[error("no schema classification for {path}")]
    NotFound { path: NodePath },

    /// Failure inside a non-trivial oracle backend.
    #[error("schema backend error: {0}")]
    Backend(String),
}

/// Result alias for oracle lookups.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Violations found when validating a plain config tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Plain configs must not carry edit metadata; only delta halves do.
    #[error("config node carries edit metadata: {path}")]
    EditMetadata { path: NodePath },
}

/// Result alias for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;
