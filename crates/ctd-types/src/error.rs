use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid node name: {0:?}")]
    InvalidName(String),

    #[error("unknown edit operation: {0:?}")]
    UnknownOperation(String),

    #[error("unknown insert position: {0:?}")]
    UnknownInsert(String),
}

/// Convenience alias for type-level results.
pub type TypeResult<T> = Result<T, TypeError>;
