//! # Property-Based Tests
//!
//! Round-trip, uniqueness and ordering invariants of the store, checked with
//! proptest.

use hbnb_core::{Entity, FieldValue, Fields, Kind, Registry, decode, encode};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::HashSet;

fn any_kind() -> impl Strategy<Value = Kind> {
    prop::sample::select(Kind::ALL.to_vec())
}

fn any_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<i64>().prop_map(FieldValue::Int),
        (-1.0e12f64..1.0e12f64).prop_map(FieldValue::Float),
        "[ -~]{0,24}".prop_map(FieldValue::Str),
    ]
}

fn any_fields() -> impl Strategy<Value = Vec<(String, FieldValue)>> {
    vec(("[a-z][a-z_]{0,11}", any_value()), 0..8)
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// decode(encode(e)) reproduces kind, identity, timestamps and fields.
    #[test]
    fn codec_roundtrip(kind in any_kind(), fields in any_fields()) {
        let mut entity = Entity::new(kind, Fields::new());
        for (name, value) in fields {
            entity.set_field(name, value);
        }

        let restored = decode(&encode(&entity).expect("encode")).expect("decode");
        prop_assert_eq!(restored, entity);
    }

    /// The round-trip also holds through JSON text, not only through values.
    #[test]
    fn codec_roundtrip_through_text(kind in any_kind(), fields in any_fields()) {
        let mut entity = Entity::new(kind, Fields::new());
        for (name, value) in fields {
            entity.set_field(name, value);
        }

        let text = serde_json::to_string(&encode(&entity).expect("encode")).expect("text");
        let record: hbnb_core::Record = serde_json::from_str(&text).expect("parse");
        let restored = decode(&record).expect("decode");

        prop_assert_eq!(restored.id(), entity.id());
        prop_assert_eq!(restored.kind(), entity.kind());
        prop_assert_eq!(restored.created_at(), entity.created_at());
        prop_assert_eq!(restored.fields().len(), entity.fields().len());
    }

    /// Creating N entities yields N distinct identities and N registry keys.
    #[test]
    fn creations_are_distinct(kinds in vec(any_kind(), 1..64)) {
        let mut registry = Registry::new("unused.json");
        let mut ids = HashSet::new();
        for kind in &kinds {
            let entity = registry.create(*kind, Fields::new()).expect("create");
            ids.insert(entity.id().to_string());
        }

        prop_assert_eq!(ids.len(), kinds.len());
        prop_assert_eq!(registry.len(), kinds.len());
    }

    /// count(kind) equals the number of keys starting with "Kind.".
    #[test]
    fn count_matches_key_prefix(kinds in vec(any_kind(), 0..64)) {
        let mut registry = Registry::new("unused.json");
        for kind in &kinds {
            registry.create(*kind, Fields::new()).expect("create");
        }

        for kind in Kind::ALL {
            let prefix = format!("{}.", kind.name());
            let by_key = registry.all().keys().filter(|k| k.starts_with(&prefix)).count();
            prop_assert_eq!(registry.count(kind), by_key);
        }
    }

    /// touch() never moves updated_at backwards and never changes created_at.
    #[test]
    fn touch_monotonic(kind in any_kind(), touches in 1usize..16) {
        let mut entity = Entity::new(kind, Fields::new());
        let created = entity.created_at();
        for _ in 0..touches {
            let before = entity.updated_at();
            entity.touch();
            prop_assert!(entity.updated_at() >= before);
            prop_assert_eq!(entity.created_at(), created);
        }
    }

    /// Deleting keeps the relative order of the survivors.
    #[test]
    fn delete_preserves_order(kinds in vec(any_kind(), 2..32), victim in any::<prop::sample::Index>()) {
        let mut registry = Registry::new("unused.json");
        for kind in &kinds {
            registry.create(*kind, Fields::new()).expect("create");
        }
        let keys: Vec<String> = registry.all().keys().cloned().collect();
        let removed = keys[victim.index(keys.len())].clone();

        prop_assert!(registry.delete(&removed));

        let expected: Vec<&String> = keys.iter().filter(|k| **k != removed).collect();
        let actual: Vec<&String> = registry.all().keys().collect();
        prop_assert_eq!(actual, expected);
    }
}
