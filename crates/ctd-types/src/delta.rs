use std::fmt;

use crate::tree::ConfigTree;

/// Invertible edit between two configuration trees.
///
/// `apply(source, forward)` yields the target; `apply(target, reverse)`
/// yields the source back. Both halves are config trees whose nodes carry
/// edit metadata. A delta is built once by the diff engine and not mutated
/// afterwards.
#[derive(Clone, Debug)]
pub struct Delta {
    forward: ConfigTree,
    reverse: ConfigTree,
}

impl Delta {
    /// Pair up the two halves.
    pub fn new(forward: ConfigTree, reverse: ConfigTree) -> Self {
        Self { forward, reverse }
    }

    /// The source-to-target half.
    pub fn forward(&self) -> &ConfigTree {
        &self.forward
    }

    /// The target-to-source half.
    pub fn reverse(&self) -> &ConfigTree {
        &self.reverse
    }

    /// Swap the halves, turning the delta into its inverse.
    pub fn negate(self) -> Self {
        Self {
            forward: self.reverse,
            reverse: self.forward,
        }
    }

    /// Returns `true` when both halves are empty (the trees were equal).
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.reverse.is_empty()
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "forward:")?;
        write!(f, "{}", self.forward)?;
        writeln!(f, "reverse:")?;
        write!(f, "{}", self.reverse)
    }
}
