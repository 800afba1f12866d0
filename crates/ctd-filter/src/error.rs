//! Error types for the filter crate.

/// Errors that can occur while evaluating queries or projecting a tree.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Schema lookup failed.
    #[error("schema error: {0}")]
    Schema(#[from] ctd_schema::SchemaError),

    /// The query string does not parse in the evaluator's dialect.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Convenience alias for filter results.
pub type FilterResult<T> = Result<T, FilterError>;
