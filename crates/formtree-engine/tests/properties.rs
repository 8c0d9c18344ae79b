//! Property tests over arbitrary writes: list bounds always hold, leaf
//! values survive assignment, and group values only carry written keys.

use formtree_engine::{Data, Json, ListRules, ListSchema, Schema};
use proptest::prelude::*;
use serde_json::json;

fn bounded_list(floor: usize, ceiling: usize) -> Data {
    Data::new(ListSchema::new(Schema::number()).with_rules(ListRules {
        minitems: Some(floor.into()),
        maxitems: Some(ceiling.into()),
        ..Default::default()
    }))
}

proptest! {
    #[test]
    fn list_length_stays_within_bounds(
        floor in 0usize..4,
        extra in 0usize..4,
        writes in prop::collection::vec(prop::collection::vec(-100i32..100, 0..10), 1..5),
    ) {
        let ceiling = floor + extra;
        let mut data = bounded_list(floor, ceiling);
        for write in writes {
            let expected = write.len().clamp(floor, ceiling);
            data.root_mut().set(Json::from(write));
            let len = data.root().list().map_or(0, |list| list.len());
            prop_assert_eq!(len, expected);
            prop_assert_eq!(data.entity_count(), len + 1);
        }
    }

    #[test]
    fn finite_numbers_are_stored_as_written(n in -1.0e9f64..1.0e9) {
        let mut data = Data::new(Schema::number());
        data.root_mut().set(n);
        prop_assert!(data.root().equals(&Json::from(n)));
        prop_assert!(data.root().valid());
        prop_assert!(data.root().errors().is_none());
    }

    #[test]
    fn text_is_stored_verbatim(s in "\\PC{0,24}") {
        let mut data = Data::new(Schema::text());
        data.root_mut().set(s.as_str());
        prop_assert_eq!(data.root().value(), Json::from(s.as_str()));
        prop_assert_eq!(data.root().empty(), s.is_empty());
    }

    #[test]
    fn group_value_keeps_only_written_keys(a in proptest::option::of(-50i32..50), b in proptest::option::of("[a-z]{1,8}")) {
        let mut data = Data::new(Schema::group([("a", Schema::number()), ("b", Schema::text())]));
        let mut written = serde_json::Map::new();
        if let Some(a) = a {
            written.insert("a".into(), json!(a));
        }
        if let Some(b) = &b {
            written.insert("b".into(), json!(b));
        }
        data.root_mut().set(serde_json::Value::Object(written.clone()));
        prop_assert_eq!(data.root().value().to_value(), serde_json::Value::Object(written));
    }
}
