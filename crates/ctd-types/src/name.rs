use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Qualified identifier for a config node.
///
/// A `NodeName` pairs an optional namespace with a local name. Two nodes are
/// the same tag iff both parts are equal; what a tag *means* is decided by
/// the schema oracle, not by this crate. The canonical text form is
/// `{namespace}local`, with the braces omitted for unqualified names.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeName {
    namespace: String,
    local: String,
}

impl NodeName {
    /// Create a namespace-qualified name.
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// Create a name with no namespace.
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self {
            namespace: String::new(),
            local: local.into(),
        }
    }

    /// The namespace part. Empty for unqualified names.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The local part.
    pub fn local(&self) -> &str {
        &self.local
    }

    /// Returns `true` if the name carries no namespace.
    pub fn is_unqualified(&self) -> bool {
        self.namespace.is_empty()
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

impl fmt::Debug for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeName({self})")
    }
}

impl FromStr for NodeName {
    type Err = TypeError;

    /// Parse the canonical `{namespace}local` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TypeError::InvalidName(s.to_string()));
        }
        if let Some(rest) = s.strip_prefix('{') {
            let (namespace, local) = rest
                .split_once('}')
                .ok_or_else(|| TypeError::InvalidName(s.to_string()))?;
            if local.is_empty() || local.contains(['{', '}']) {
                return Err(TypeError::InvalidName(s.to_string()));
            }
            Ok(Self::new(namespace, local))
        } else if s.contains(['{', '}']) {
            Err(TypeError::InvalidName(s.to_string()))
        } else {
            Ok(Self::unqualified(s))
        }
    }
}
