//! Diff engine for Config Tree Delta (CTD).
//!
//! Computes schema-aware structural diffs between configuration trees:
//! peer matching between sibling sets, the subset partial order, and
//! invertible forward/reverse delta generation with insert hints for
//! user-ordered sequences.
//!
//! # Key Types
//!
//! - [`diff()`] — Build a [`ctd_types::Delta`] that rewrites one tree into another
//! - [`le`] / [`equal`] / [`compare()`] / [`ConfigOrdering`] — Subset partial order
//! - [`peers()`] / [`unique_peer`] / [`partition_children`] / [`ChildPartition`] — Peer matching
//! - [`DiffError`] / [`DiffResult`] — Matching and diffing failures

pub mod compare;
pub mod diff;
pub mod error;
pub mod peers;

pub use compare::{compare, delta_equal, equal, le, ConfigOrdering};
pub use diff::diff;
pub use error::{DiffError, DiffResult};
pub use peers::{key_values, partition_children, peers, unique_peer, ChildPartition};
