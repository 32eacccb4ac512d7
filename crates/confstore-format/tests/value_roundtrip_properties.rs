//! Property-based tests for value tree round-trips
//!
//! **Feature: confstore-format, Property 1: JSON Round-Trip**
//! For any value tree, encoding to JSON and decoding yields an equal tree
//! **Feature: confstore-format, Property 2: YAML Round-Trip**
//! For any value tree whose strings are not scalar look-alikes, emitting YAML
//! and parsing it back yields an equal tree

use confstore_format::{emit_yaml, parse_yaml, probe_scalar, to_pretty_json, ValueTree};
use proptest::prelude::*;

/// Strings that the scalar probe keeps as strings
fn plain_string_strategy() -> impl Strategy<Value = String> {
    "s_[a-z0-9 ]{0,12}".prop_map(|s| s.trim_end().to_string())
}

fn leaf_strategy() -> impl Strategy<Value = ValueTree> {
    prop_oneof![
        Just(ValueTree::Null),
        any::<bool>().prop_map(ValueTree::Bool),
        any::<i64>().prop_map(ValueTree::Int),
        (-8_000_000i32..8_000_000).prop_map(|n| ValueTree::Float(f64::from(n) / 8.0)),
        plain_string_strategy().prop_map(ValueTree::String),
    ]
}

/// Strategy for generating nested value trees with unique mapping keys
fn value_tree_strategy() -> impl Strategy<Value = ValueTree> {
    leaf_strategy().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ValueTree::Sequence),
            prop::collection::btree_map("k_[a-z]{1,6}", inner, 0..4).prop_map(|entries| {
                ValueTree::Mapping(entries.into_iter().collect())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_json_round_trip(value in value_tree_strategy()) {
        let compact = serde_json::to_string(&value).unwrap();
        let decoded: ValueTree = serde_json::from_str(&compact).unwrap();
        prop_assert_eq!(&decoded, &value);

        let pretty = to_pretty_json(&value, 4).unwrap();
        let decoded: ValueTree = serde_json::from_str(&pretty).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn prop_yaml_round_trip(value in value_tree_strategy()) {
        let yaml = emit_yaml(&value).unwrap();
        let decoded = parse_yaml(&yaml).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn prop_integer_text_probes_as_int(n in any::<i64>()) {
        prop_assert_eq!(probe_scalar(&n.to_string()), ValueTree::Int(n));
    }
}

#[test]
fn test_probe_order_prefers_bool() {
    assert_eq!(probe_scalar("true"), ValueTree::Bool(true));
    assert_eq!(probe_scalar("Off"), ValueTree::Bool(false));
    assert_eq!(probe_scalar("1"), ValueTree::Int(1));
    assert_eq!(probe_scalar("1.5"), ValueTree::Float(1.5));
    assert_eq!(probe_scalar("inf"), ValueTree::from("inf"));
}

#[test]
fn test_quoted_yaml_scalars_are_probed() {
    let value = parse_yaml("flag: \"true\"\ncount: '42'\nname: plain\n").unwrap();
    assert_eq!(value.get("flag"), Some(&ValueTree::Bool(true)));
    assert_eq!(value.get("count"), Some(&ValueTree::Int(42)));
    assert_eq!(value.get("name"), Some(&ValueTree::from("plain")));
}
