//! Integration tests for the public Json surface: parsing, structural
//! comparison, and path addressing used together.

use formtree_core::{equals, includes, is_json, path, Json, Path, Segment};
use serde_json::json;

fn j(value: serde_json::Value) -> Json {
    Json::from(value)
}

#[test]
fn parsed_documents_compare_structurally() {
    let document: Json = r#"{"group": {"a": 3, "b": {"b": ["a", "b"]}}}"#
        .parse()
        .expect("valid JSON");
    let group = document.get("group").cloned().unwrap_or_default();

    assert!(includes(&group, &j(json!({"a": 3, "b": {"b": ["a"]}}))));
    assert!(!includes(&group, &j(json!({"a": 4, "b": {"b": ["a"]}}))));
    assert!(equals(&group, &j(json!({"b": {"b": ["a", "b"]}, "a": 3}))));
}

#[test]
fn nan_survives_storage_but_not_encoding() {
    let value = Json::Array(vec![Json::Number(f64::NAN), Json::from(1)]);
    assert!(!is_json(&value));
    assert_eq!(value.to_string(), "[null,1]");
}

#[test]
fn paths_from_strings_and_macro_agree() {
    let from_text = Path::from("complex.req1.0");
    let from_macro = path!["complex", "req1", 0usize];
    assert_eq!(from_text, from_macro);
    assert_eq!(
        from_macro.iter().cloned().collect::<Vec<_>>(),
        vec![Segment::from("complex"), Segment::from("req1"), Segment::Index(0)]
    );
}

#[test]
fn json_round_trips_through_text() {
    let value = j(json!({"list": [1, 2.5, {"x": null}], "s": "text", "t": true}));
    let text = value.to_string();
    let back: Json = text.parse().expect("own output parses");
    assert!(equals(&value, &back));
}
