//! Literal schema import: tag dispatch and body deserialization.

use std::collections::BTreeMap;
use std::sync::Arc;

use formtree_core::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::rule::Rule;
use super::rules::{CommonRules, ListRules};
use super::{GroupSchema, ListSchema, NumberSchema, Schema, SelectSchema, TextSchema};
use crate::error::SchemaError;

#[derive(Deserialize)]
struct GroupBody {
    contents: Map<String, Value>,
    #[serde(default)]
    default: Option<Rule<Json>>,
    #[serde(default)]
    props: Option<Json>,
    #[serde(default)]
    rules: CommonRules,
}

#[derive(Deserialize)]
struct ListBody {
    items: Value,
    #[serde(default)]
    default: Option<Rule<Json>>,
    #[serde(default)]
    props: Option<Json>,
    #[serde(default)]
    rules: ListRules,
}

pub(super) fn parse_node(value: Value, at: &str) -> Result<Schema, SchemaError> {
    let Value::Object(mut body) = value else {
        return Err(SchemaError::Malformed {
            at: at.to_owned(),
            reason: format!("expected an object, found {}", Json::from(value).type_name()),
        });
    };
    let kind = take_tag(&mut body, "type", at)?;
    match kind.as_str() {
        "group" => parse_group(body, at),
        "list" => parse_list(body, at),
        "field" => {
            let subtype = take_tag(&mut body, "subtype", at)?;
            match subtype.as_str() {
                "text" => Ok(Schema::Text(Arc::new(parse_body::<TextSchema>(body, at)?))),
                "number" => Ok(Schema::Number(Arc::new(parse_body::<NumberSchema>(body, at)?))),
                "select" => Ok(Schema::Select(Arc::new(parse_body::<SelectSchema>(body, at)?))),
                _ => Err(SchemaError::UnknownSubtype { found: subtype, at: at.to_owned() }),
            }
        }
        _ => Err(SchemaError::UnknownType { found: kind, at: at.to_owned() }),
    }
}

fn take_tag(body: &mut Map<String, Value>, tag: &'static str, at: &str) -> Result<String, SchemaError> {
    match body.remove(tag) {
        Some(Value::String(value)) => Ok(value),
        _ => Err(SchemaError::MissingTag { tag, at: at.to_owned() }),
    }
}

fn parse_body<T: DeserializeOwned>(body: Map<String, Value>, at: &str) -> Result<T, SchemaError> {
    T::deserialize(Value::Object(body)).map_err(|err| SchemaError::Malformed {
        at: at.to_owned(),
        reason: err.to_string(),
    })
}

fn parse_group(body: Map<String, Value>, at: &str) -> Result<Schema, SchemaError> {
    let GroupBody { contents, default, props, rules } = parse_body(body, at)?;
    let contents = contents
        .into_iter()
        .map(|(name, child)| {
            let child_at = format!("{at}.{name}");
            parse_node(child, &child_at).map(|schema| (name, schema))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;
    Ok(Schema::Group(Arc::new(GroupSchema { contents, default, props, rules })))
}

fn parse_list(body: Map<String, Value>, at: &str) -> Result<Schema, SchemaError> {
    let ListBody { items, default, props, rules } = parse_body(body, at)?;
    let items = parse_node(items, &format!("{at}.items"))?;
    Ok(Schema::List(Arc::new(ListSchema { items, default, props, rules })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Kind;
    use serde_json::json;

    #[test]
    fn dispatches_on_type_and_subtype() {
        let schema = Schema::from_value(json!({
            "type": "group",
            "contents": {
                "name": {"type": "field", "subtype": "text", "rules": {"minlength": 2}},
                "age": {"type": "field", "subtype": "number", "default": 30},
                "tags": {
                    "type": "list",
                    "items": {"type": "field", "subtype": "select", "options": ["a", "b"]},
                    "rules": {"maxitems": 3}
                }
            }
        }))
        .expect("valid schema");

        let Schema::Group(group) = &schema else {
            panic!("expected a group, got {:?}", schema.kind());
        };
        assert_eq!(group.contents["name"].kind(), Kind::Text);
        assert_eq!(group.contents["age"].kind(), Kind::Number);
        let Schema::List(tags) = &group.contents["tags"] else {
            panic!("expected a list");
        };
        assert_eq!(tags.items.kind(), Kind::Select);
        assert!(matches!(tags.rules.maxitems, Some(Rule::Literal(3))));
    }

    #[test]
    fn unknown_type_is_reported_with_location() {
        let err = Schema::from_value(json!({
            "type": "group",
            "contents": {"inner": {"type": "table"}}
        }))
        .expect_err("unknown type");
        match err {
            SchemaError::UnknownType { found, at } => {
                assert_eq!(found, "table");
                assert_eq!(at, "$.inner");
            }
            other => panic!("expected UnknownType, got {other}"),
        }
    }

    #[test]
    fn unknown_subtype_is_reported() {
        let err = Schema::from_value(json!({
            "type": "list",
            "items": {"type": "field", "subtype": "date"}
        }))
        .expect_err("unknown subtype");
        assert!(
            matches!(&err, SchemaError::UnknownSubtype { found, at } if found == "date" && at == "$.items"),
            "got {err}"
        );
    }

    #[test]
    fn missing_tags_are_reported() {
        let err = Schema::from_value(json!({"contents": {}})).expect_err("no type");
        assert!(matches!(err, SchemaError::MissingTag { tag: "type", .. }));
        let err = Schema::from_value(json!({"type": "field"})).expect_err("no subtype");
        assert!(matches!(err, SchemaError::MissingTag { tag: "subtype", .. }));
    }

    #[test]
    fn malformed_bodies_are_reported() {
        let err = Schema::from_value(json!({"type": "group"})).expect_err("no contents");
        assert!(matches!(err, SchemaError::Malformed { .. }), "got {err}");
        let err = Schema::from_value(json!({
            "type": "field", "subtype": "text", "rules": {"minlength": "two"}
        }))
        .expect_err("bad rule");
        assert!(matches!(err, SchemaError::Malformed { .. }), "got {err}");
        let err = Schema::from_value(json!([1, 2])).expect_err("not an object");
        assert!(matches!(err, SchemaError::Malformed { .. }), "got {err}");
    }

    #[test]
    fn imports_yaml() {
        let schema = Schema::from_yaml_str(
            "type: field\nsubtype: number\nrules:\n  max:\n    value: 3\n    exclusive: true\n",
        )
        .expect("valid yaml");
        let Schema::Number(number) = schema else {
            panic!("expected a number field");
        };
        assert!(matches!(
            &number.rules.max,
            Some(Rule::Literal(bound)) if bound.exclusive && bound.value == 3.0
        ));
    }

    #[test]
    fn requirement_errors_surface_as_malformed() {
        let err = Schema::from_json_str(
            r#"{"type": "field", "subtype": "text", "rules": {"requires": [["a"], "resembles", 1]}}"#,
        )
        .expect_err("bad requirement");
        assert!(matches!(err, SchemaError::Malformed { .. }), "got {err}");
    }
}
