//! Randomized diff/apply round-trip checks.
//!
//! Trees are generated over a fixed device-style schema. Sequence values
//! and list keys are drawn from small pools without repetition so peer
//! matching stays unambiguous.

use proptest::prelude::*;

use ctd_diff::{diff, equal};
use ctd_schema::{InMemorySchema, SchemaClassification};
use ctd_types::{ConfigTree, NodeName, NodePath};

use crate::{apply, combine, revert};

#[derive(Debug, Clone)]
struct Draft {
    speed: Option<u32>,
    dns: Vec<u8>,
    servers: Vec<&'static str>,
    acls: Vec<(u8, bool)>,
}

fn name(s: &str) -> NodeName {
    NodeName::unqualified(s)
}

fn path(segments: &[&str]) -> NodePath {
    segments.iter().map(|s| name(s)).collect()
}

fn schema() -> InMemorySchema {
    let mut schema = InMemorySchema::new();
    schema.register(path(&["iface"]), SchemaClassification::container());
    schema.register(path(&["iface", "speed"]), SchemaClassification::leaf());
    schema.register(path(&["iface", "dns"]), SchemaClassification::leaf_list());
    schema.register(
        path(&["iface", "server"]),
        SchemaClassification::leaf_list().user_ordered(),
    );
    schema.register(
        path(&["iface", "acl"]),
        SchemaClassification::list([name("id")]).user_ordered(),
    );
    schema.register(path(&["iface", "acl", "id"]), SchemaClassification::leaf());
    schema.register(
        path(&["iface", "acl", "action"]),
        SchemaClassification::leaf(),
    );
    schema
}

fn build(draft: &Draft) -> ConfigTree {
    let mut tree = ConfigTree::new();
    let root = tree.root();
    let iface = tree.add_child(root, name("iface"));
    if let Some(speed) = draft.speed {
        tree.add_leaf(iface, name("speed"), speed.to_string());
    }
    for dns in &draft.dns {
        tree.add_leaf(iface, name("dns"), format!("10.0.0.{dns}"));
    }
    for server in &draft.servers {
        tree.add_leaf(iface, name("server"), *server);
    }
    for (id, permit) in &draft.acls {
        let entry = tree.add_child(iface, name("acl"));
        tree.add_leaf(entry, name("id"), id.to_string());
        tree.add_leaf(entry, name("action"), if *permit { "permit" } else { "deny" });
    }
    tree
}

fn draft() -> impl Strategy<Value = Draft> {
    let speed = proptest::option::of(0u32..1000);
    let dns = proptest::sample::subsequence(vec![1u8, 2, 3, 4], 0..=4);
    let servers =
        proptest::sample::subsequence(vec!["s1", "s2", "s3", "s4"], 0..=4).prop_shuffle();
    let acls = proptest::sample::subsequence(vec![1u8, 2, 3, 4], 0..=4)
        .prop_shuffle()
        .prop_flat_map(|ids| {
            let actions = proptest::collection::vec(any::<bool>(), ids.len());
            (Just(ids), actions)
        })
        .prop_map(|(ids, actions)| ids.into_iter().zip(actions).collect::<Vec<_>>());
    (speed, dns, servers, acls).prop_map(|(speed, dns, servers, acls)| Draft {
        speed,
        dns,
        servers,
        acls,
    })
}

proptest! {
    #[test]
    fn apply_round_trips(a in draft(), b in draft()) {
        let schema = schema();
        let (a, b) = (build(&a), build(&b));
        let delta = diff(&a, &b, &schema).unwrap();
        let forward = apply(&a, &delta, &schema).unwrap();
        prop_assert!(equal(&forward, &b, &schema).unwrap());
        let back = revert(&forward, &delta, &schema).unwrap();
        prop_assert!(equal(&back, &a, &schema).unwrap());
    }

    #[test]
    fn self_delta_is_empty(a in draft()) {
        let tree = build(&a);
        let delta = diff(&tree, &tree, &schema()).unwrap();
        prop_assert!(delta.is_empty());
    }

    #[test]
    fn delta_is_empty_iff_configs_are_equal(a in draft(), b in draft()) {
        let schema = schema();
        let (a, b) = (build(&a), build(&b));
        let delta = diff(&a, &b, &schema).unwrap();
        prop_assert_eq!(delta.is_empty(), equal(&a, &b, &schema).unwrap());
    }

    #[test]
    fn negated_delta_applies_backwards(a in draft(), b in draft()) {
        let schema = schema();
        let (a, b) = (build(&a), build(&b));
        let delta = diff(&a, &b, &schema).unwrap().negate();
        let back = apply(&b, &delta, &schema).unwrap();
        prop_assert!(equal(&back, &a, &schema).unwrap());
    }

    #[test]
    fn combine_with_self_is_identity(a in draft()) {
        let schema = schema();
        let tree = build(&a);
        let sum = combine(&tree, &tree, &schema).unwrap();
        prop_assert!(equal(&sum, &tree, &schema).unwrap());
    }
}
