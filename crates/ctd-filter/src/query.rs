//! Query dialects for selecting nodes.

use std::str::FromStr;

use ctd_types::{ConfigTree, NodeId, NodeName};

use crate::error::{FilterError, FilterResult};

/// A query dialect that selects nodes from a config tree.
///
/// Implementations parse `query` on every call and return ids of nodes
/// in `tree`. An id may appear more than once; the projection in
/// [`filter`](crate::filter::filter) deduplicates.
pub trait QueryEvaluator: Send + Sync {
    fn evaluate(&self, tree: &ConfigTree, query: &str) -> FilterResult<Vec<NodeId>>;
}

/// The built-in slash-path dialect.
///
/// A query is a `/`-separated chain of segments, each naming a child and
/// optionally carrying `[key=value]` predicates matched against the
/// child's own leaf children, so list entries can be selected by key:
///
/// ```text
/// /iface/acl[id=2]/action
/// ```
///
/// A bare segment name matches any namespace; the `{namespace}name` form
/// matches exactly. Slashes inside braces or predicates do not split
/// segments.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathQuery;

impl QueryEvaluator for PathQuery {
    fn evaluate(&self, tree: &ConfigTree, query: &str) -> FilterResult<Vec<NodeId>> {
        let segments = parse(query)?;
        let mut candidates = vec![tree.root()];
        for segment in &segments {
            let mut next = Vec::new();
            for node in candidates {
                for child in tree.children(node) {
                    if segment.matches(tree, *child) {
                        next.push(*child);
                    }
                }
            }
            candidates = next;
        }
        Ok(candidates)
    }
}

struct Segment {
    name: NameMatch,
    predicates: Vec<(String, String)>,
}

enum NameMatch {
    /// Qualified `{namespace}name` form.
    Exact(NodeName),
    /// Bare name, matched against the local part only.
    Local(String),
}

impl Segment {
    fn matches(&self, tree: &ConfigTree, node: NodeId) -> bool {
        let name_ok = match &self.name {
            NameMatch::Exact(name) => tree.name(node) == name,
            NameMatch::Local(local) => tree.name(node).local() == local.as_str(),
        };
        name_ok
            && self.predicates.iter().all(|(key, value)| {
                tree.children(node).iter().any(|c| {
                    tree.name(*c).local() == key.as_str() && tree.value(*c) == Some(value.as_str())
                })
            })
    }
}

fn parse(query: &str) -> FilterResult<Vec<Segment>> {
    let trimmed = query.strip_prefix('/').unwrap_or(query);
    if trimmed.is_empty() {
        return Err(FilterError::InvalidQuery("empty path".to_string()));
    }
    split_segments(trimmed).into_iter().map(parse_segment).collect()
}

/// Split on `/`, ignoring separators inside `{...}` namespaces and
/// `[...]` predicates.
fn split_segments(query: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (at, ch) in query.char_indices() {
        match ch {
            '{' | '[' => depth += 1,
            '}' | ']' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                parts.push(&query[start..at]);
                start = at + 1;
            }
            _ => {}
        }
    }
    parts.push(&query[start..]);
    parts
}

fn parse_segment(raw: &str) -> FilterResult<Segment> {
    let bad = || FilterError::InvalidQuery(format!("malformed segment {raw:?}"));
    let (name, mut rest) = match raw.find('[') {
        None => (raw, ""),
        Some(at) => raw.split_at(at),
    };
    if name.is_empty() {
        return Err(bad());
    }
    let name = if name.starts_with('{') {
        NameMatch::Exact(NodeName::from_str(name).map_err(|_| bad())?)
    } else {
        NameMatch::Local(name.to_string())
    };
    let mut predicates = Vec::new();
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return Err(bad());
        };
        let Some(end) = inner.find(']') else {
            return Err(bad());
        };
        let (pair, tail) = inner.split_at(end);
        let Some((key, value)) = pair.split_once('=') else {
            return Err(bad());
        };
        if key.is_empty() {
            return Err(bad());
        }
        predicates.push((key.to_string(), value.to_string()));
        rest = &tail[1..];
    }
    Ok(Segment { name, predicates })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> NodeName {
        NodeName::unqualified(s)
    }

    /// `iface` with a `speed` leaf and two keyed `acl` entries.
    fn device() -> ConfigTree {
        let mut tree = ConfigTree::new();
        let root = tree.root();
        let iface = tree.add_child(root, name("iface"));
        tree.add_leaf(iface, name("speed"), "10");
        for (id, action) in [("1", "permit"), ("2", "deny")] {
            let acl = tree.add_child(iface, name("acl"));
            tree.add_leaf(acl, name("id"), id);
            tree.add_leaf(acl, name("action"), action);
        }
        tree
    }

    #[test]
    fn selects_leaf_by_path() {
        let tree = device();
        let hits = PathQuery.evaluate(&tree, "/iface/speed").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(tree.value(hits[0]), Some("10"));
    }

    #[test]
    fn predicate_selects_single_list_entry() {
        let tree = device();
        let hits = PathQuery.evaluate(&tree, "/iface/acl[id=2]").unwrap();
        assert_eq!(hits.len(), 1);
        let action = tree
            .children(hits[0])
            .iter()
            .find(|c| tree.name(**c) == &name("action"))
            .copied()
            .unwrap();
        assert_eq!(tree.value(action), Some("deny"));
    }

    #[test]
    fn segment_without_predicate_matches_all_entries() {
        let tree = device();
        let hits = PathQuery.evaluate(&tree, "/iface/acl").unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn predicate_narrows_descent() {
        let tree = device();
        let hits = PathQuery.evaluate(&tree, "/iface/acl[id=1]/action").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(tree.value(hits[0]), Some("permit"));
    }

    #[test]
    fn missing_path_matches_nothing() {
        let tree = device();
        let hits = PathQuery.evaluate(&tree, "/iface/mtu").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn qualified_name_matches_exactly() {
        let mut tree = ConfigTree::new();
        let root = tree.root();
        tree.add_leaf(root, NodeName::new("urn:x", "mtu"), "1500");
        tree.add_leaf(root, name("mtu"), "9000");

        let exact = PathQuery.evaluate(&tree, "/{urn:x}mtu").unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(tree.value(exact[0]), Some("1500"));

        let local = PathQuery.evaluate(&tree, "/mtu").unwrap();
        assert_eq!(local.len(), 2);
    }

    #[test]
    fn namespace_may_contain_slashes() {
        let mut tree = ConfigTree::new();
        let root = tree.root();
        tree.add_leaf(root, NodeName::new("http://example.com/ns", "mtu"), "1500");
        let hits = PathQuery
            .evaluate(&tree, "/{http://example.com/ns}mtu")
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn malformed_queries_are_rejected() {
        let tree = device();
        for query in ["", "/", "/iface/acl[id", "/iface/[x=1]", "/iface/acl[id2]"] {
            let err = PathQuery.evaluate(&tree, query).unwrap_err();
            assert!(matches!(err, FilterError::InvalidQuery(_)), "{query}");
        }
    }
}
