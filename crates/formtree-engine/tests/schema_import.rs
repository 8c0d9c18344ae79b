//! Literal schemas imported from text drive a live tree.

use formtree_engine::{Data, Kind, Schema, SchemaError};
use serde_json::json;

const SIGNUP_YAML: &str = r#"
type: group
contents:
  name:
    type: field
    subtype: text
    rules:
      required: true
      maxlength: 20
  age:
    type: field
    subtype: number
    rules:
      min: {value: 0, exclusive: true}
      step: 1
  newsletter:
    type: field
    subtype: select
    options: [weekly, monthly]
    rules:
      maxselected: 1
  topics:
    type: list
    items:
      type: field
      subtype: text
    rules:
      maxitems: 3
      requires: [[newsletter], exists]
"#;

#[test]
fn yaml_schema_builds_a_working_tree() {
    let schema = Schema::from_yaml_str(SIGNUP_YAML).expect("valid YAML schema");
    assert_eq!(schema.kind(), Kind::Group);

    let mut data = Data::new(schema);
    assert!(!data.root().valid());
    assert!(data.tread("topics").is_some_and(|t| t.disabled()));

    data.root_mut().set(json!({
        "name": "Ada",
        "age": 36,
        "newsletter": ["weekly"],
        "topics": ["rust", "forms", "trees", "dropped"]
    }));
    assert!(data.root().valid());
    assert_eq!(
        data.root().value().to_value(),
        json!({"name": "Ada", "age": 36, "newsletter": ["weekly"], "topics": ["rust", "forms", "trees"]})
    );

    data.tread_mut("age").expect("age").set(0);
    assert_eq!(
        serde_json::to_value(data.root().errors()).expect("serializes"),
        json!({"contents": {"age": {"min": true}}})
    );
}

#[test]
fn json_text_and_values_import_alike() {
    let text = r#"{"type": "list", "items": {"type": "field", "subtype": "number", "default": 7}, "rules": {"minitems": 2}}"#;
    let from_text = Data::new(Schema::from_json_str(text).expect("valid JSON schema"));
    let from_value = Data::new(serde_json::from_str::<Schema>(text).expect("deserializes"));
    assert_eq!(from_text.root().value(), from_value.root().value());
    assert_eq!(from_text.root().value().to_value(), json!([7, 7]));
}

#[test]
fn configuration_errors_are_fatal_at_import() {
    let unknown = Schema::from_value(json!({"type": "group", "contents": {"x": {"type": "table"}}}));
    assert!(matches!(unknown, Err(SchemaError::UnknownType { ref found, ref at }) if found == "table" && at == "$.x"));

    let subtype = Schema::from_value(json!({"type": "field", "subtype": "date"}));
    assert!(matches!(subtype, Err(SchemaError::UnknownSubtype { .. })));

    let text = Schema::from_json_str("{not json");
    assert!(matches!(text, Err(SchemaError::Json(_))));

    let yaml = Schema::from_yaml_str("type: [unclosed");
    assert!(matches!(yaml, Err(SchemaError::Yaml(_))));
}
