//! Merge engine for Config Tree Delta (CTD).
//!
//! Plays deltas onto configuration trees and folds plain configs
//! together. Application honors the edit operations on delta nodes
//! (`merge`, `replace`, `create`, `delete`, `remove`) and the insert
//! hints of user-ordered sequences; combination unions two plain configs
//! and reports leaves they disagree on.
//!
//! # Key Types
//!
//! - [`apply()`] / [`revert`] — Play a [`ctd_types::Delta`] half onto a base config
//! - [`combine`] — Union of two plain configs
//! - [`MergeError`] / [`MergeResult`] — Edits that cannot apply

pub mod apply;
pub mod error;
mod position;

#[cfg(test)]
mod props;

pub use apply::{apply, combine, revert};
pub use error::{MergeError, MergeResult};
