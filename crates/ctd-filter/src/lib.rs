//! Filter engine for Config Tree Delta (CTD).
//!
//! Selects nodes from a config tree with a pluggable query dialect and
//! projects the tree down to the matches, keeping the ancestor chain and
//! list keys intact so every surviving node remains addressable at its
//! original path.
//!
//! # Key Types
//!
//! - [`filter()`] / [`filter_query`] — Ancestor-preserving projection
//! - [`QueryEvaluator`] / [`PathQuery`] — Query dialects
//! - [`FilterError`] / [`FilterResult`] — Query and projection failures

pub mod error;
pub mod filter;
pub mod query;

pub use error::{FilterError, FilterResult};
pub use filter::{filter, filter_query};
pub use query::{PathQuery, QueryEvaluator};
