//! Property-based tests for the codec
//!
//! These tests check that merging is deterministic, that decoding never
//! panics, and that routed documents survive an encode/decode round trip.

use proptest::prelude::*;
use schemaweave_codec::{merge, Encode, FieldSpec, Shape};
use serde_json::{json, Map, Value};

/// Strategy for generating random JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        10, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                proptest::collection::btree_map("[a-z]{1,8}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// Strategy for object fragments only
fn object_fragment_strategy() -> impl Strategy<Value = Value> {
    proptest::collection::btree_map("[a-e]", json_value_strategy(), 0..4)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}

/// Strategy for documents routed by `routed_spec`: known keys, `x-` keys
/// and free keys
fn routed_document_strategy() -> impl Strategy<Value = Value> {
    (
        proptest::option::of(json_value_strategy()), // id
        proptest::collection::btree_map("x-[a-z]{1,6}", json_value_strategy(), 0..4),
        proptest::collection::btree_map("[l-w][a-z]{0,6}", json_value_strategy(), 0..4),
    )
        .prop_map(|(id, extensions, free)| {
            let mut object = Map::new();
            if let Some(id) = id {
                object.insert("id".to_string(), id);
            }
            object.extend(extensions);
            object.extend(free);
            Value::Object(object)
        })
}

fn routed_spec() -> Shape {
    Shape::Object(
        FieldSpec::builder()
            .known(["id"])
            .constant("kind", json!("thing"))
            .pattern("^x-", "extensions")
            .additional_any()
            .build()
            .expect("routed spec should build"),
    )
}

proptest! {
    /// Property: merging the same fragments twice gives identical bytes
    #[test]
    fn prop_merge_is_deterministic(
        fragments in proptest::collection::vec(object_fragment_strategy(), 0..6)
    ) {
        let first = merge(fragments.clone()).map(|v| serde_json::to_vec(&v).unwrap());
        let second = merge(fragments).map(|v| serde_json::to_vec(&v).unwrap());
        prop_assert_eq!(first.unwrap(), second.unwrap());
    }

    /// Property: object fragments always merge, and every key of the last
    /// fragment holds that fragment's value
    #[test]
    fn prop_last_object_fragment_wins(
        fragments in proptest::collection::vec(object_fragment_strategy(), 1..6)
    ) {
        let merged = merge(fragments.clone()).unwrap();
        let last = fragments.last().unwrap().as_object().unwrap();
        for (key, value) in last {
            prop_assert_eq!(&merged[key], value);
        }
    }

    /// Property: trivial fragments never change the result
    #[test]
    fn prop_trivial_fragments_are_skipped(fragment in object_fragment_strategy()) {
        let plain = merge(vec![fragment.clone()]).unwrap();
        let padded = merge(vec![json!({}), Value::Null, fragment, json!({})]).unwrap();
        prop_assert_eq!(plain, padded);
    }

    /// Property: decoding never panics on any JSON input
    #[test]
    fn prop_decode_never_panics(input in json_value_strategy()) {
        let raw = serde_json::to_vec(&input).unwrap();
        let _ = routed_spec().decode(&raw);
    }

    /// Property: routed documents survive encode then decode
    #[test]
    fn prop_routed_document_round_trip(input in routed_document_strategy()) {
        let shape = routed_spec();
        let raw = serde_json::to_vec(&input).unwrap();
        let decoded = shape.decode(&raw).unwrap();

        let encoded = decoded.encode().unwrap();
        let again = shape.decode(&encoded).unwrap();
        prop_assert_eq!(&again, &decoded);

        // the const is always rendered
        let value: Value = serde_json::from_slice(&encoded).unwrap();
        prop_assert_eq!(&value["kind"], &json!("thing"));
    }
}
