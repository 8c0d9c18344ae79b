//! Construction, defaults, lifecycle hooks, and nested error reports.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use formtree_engine::{Data, DataOptions, EntityRef, ListRules, ListSchema, Rule, Schema};
use serde_json::json;

fn callback_schema() -> Schema {
    Schema::group([
        (
            "a",
            Schema::group([("a", Schema::number()), ("b", Schema::list(Schema::number()))]),
        ),
        ("b", Schema::select([json!({}), json!([])])),
        ("c", Schema::text()),
    ])
}

fn counter() -> (Rc<Cell<usize>>, impl FnMut(EntityRef<'_>) + 'static) {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    (count, move |_: EntityRef<'_>| seen.set(seen.get() + 1))
}

#[test]
fn construct_hook_fires_once_per_entity() {
    let (built, hook) = counter();
    let mut data = Data::with_options(callback_schema(), DataOptions::new().on_entity_construct(hook));
    assert_eq!(built.get(), 6);
    assert_eq!(data.entity_count(), 6);

    data.tread_mut("a.b").expect("a.b").set(json!([1, 3, 4, 5]));
    assert_eq!(built.get(), 10);
}

#[test]
fn construct_hook_sees_children_first_with_paths() {
    let paths = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&paths);
    Data::with_options(
        callback_schema(),
        DataOptions::new().on_entity_construct(move |entity| sink.borrow_mut().push(entity.path().to_string())),
    );
    assert_eq!(*paths.borrow(), vec!["a.a", "a.b", "a", "b", "c", ""]);
}

#[test]
fn field_change_hook_counts_real_changes() {
    let (changes, hook) = counter();
    let mut data = Data::with_options(callback_schema(), DataOptions::new().on_field_change(hook));
    assert_eq!(changes.get(), 0);

    let mut set = |at: &str, value: serde_json::Value| {
        data.tread_mut(at).expect("entity").set(value);
    };

    // Number: null -> 5 -> NaN -> 2.
    set("a.a", json!(null));
    set("a.a", json!(5));
    set("a.a", json!(5));
    set("a.a", json!({}));
    set("a.a", json!({}));
    set("a.a", json!("invalid"));
    set("a.a", json!(2));
    assert_eq!(changes.get(), 3);

    // Select: valid [] -> invalid [5] -> valid [{}].
    set("b", json!([]));
    set("b", json!(5));
    set("b", json!(5));
    set("b", json!([2]));
    set("b", json!([{}]));
    set("b", json!([{}]));
    assert_eq!(changes.get(), 5);

    // Text: every distinct string is a valid change.
    set("c", json!(5));
    set("c", json!("5"));
    assert_eq!(changes.get(), 6);
    set("c", json!({"a": 2}));
    assert_eq!(changes.get(), 7);

    data.root_mut().set(json!({"a": {"a": 69, "b": [1, 2]}, "b": [[], {}], "c": "c"}));
    assert_eq!(changes.get(), 12);
}

#[test]
fn specific_defaults_override_general_ones() {
    let (changes, hook) = counter();
    let schema = Schema::group([
        ("a", Schema::number().with_default(5)),
        ("b", Schema::number().with_default(3)),
    ])
    .with_default(json!({"a": 2, "b": 5}));
    let data = Data::with_options(schema, DataOptions::new().on_field_change(hook));
    assert_eq!(data.root().value().to_value(), json!({"a": 5, "b": 3}));
    assert_eq!(changes.get(), 0);
}

#[test]
fn group_default_does_not_survive_child_resets() {
    let schema = Schema::group([("a", Schema::number().with_default(5)), ("b", Schema::text())])
        .with_default(json!({"a": 2, "b": "from group"}));
    let data = Data::new(schema);
    assert_eq!(data.root().value().to_value(), json!({"a": 5}));
    assert!(data.tread("b").is_some_and(|b| b.empty()));
}

#[test]
fn list_default_sizes_the_list_but_items_reset() {
    let mut data = Data::new(ListSchema::new(Schema::number()).with_default(json!([1, 2])));
    assert_eq!(data.root().list().map(|list| list.len()), Some(2));
    assert!(data.root().empty());
    assert_eq!(data.root().value().to_value(), json!([null, null]));

    let mut seeded = Data::new(ListSchema::new(Schema::number().with_default(4)).with_default(json!([1, 2, 3])));
    assert_eq!(seeded.root().value().to_value(), json!([4, 4, 4]));
    seeded.root_mut().set(json!([9]));
    seeded.root_mut().reset();
    assert_eq!(seeded.root().value().to_value(), json!([4, 4, 4]));
    data.root_mut().clear();
    assert_eq!(data.root().list().map(|list| list.len()), Some(0));
}

#[test]
fn list_floor_survives_short_writes() {
    let schema = ListSchema::new(Schema::number().with_default(0)).with_rules(ListRules {
        minitems: Some(2usize.into()),
        ..Default::default()
    });
    let mut data = Data::new(schema);
    data.root_mut().set(json!([7]));
    let list = data.root().list().expect("list");
    assert_eq!(list.len(), 2);
    assert_eq!(data.root().value().to_value(), json!([7, 0]));
}

#[test]
fn props_are_copied_per_entity() {
    let schema = Schema::list(Schema::text().with_props(json!({"label": "name"})));
    let mut data = Data::with_options(schema, DataOptions::new().props(json!({"form": "signup"})));
    data.root_mut().set(json!(["x", "y"]));

    data.tread_mut("0")
        .expect("first item")
        .set_props(json!({"label": "changed"}));
    assert_eq!(data.tread("0").and_then(|e| e.props()).map(|p| p.to_value()), Some(json!({"label": "changed"})));
    assert_eq!(data.tread("1").and_then(|e| e.props()).map(|p| p.to_value()), Some(json!({"label": "name"})));
    assert_eq!(data.props().map(|p| p.to_value()), Some(json!({"form": "signup"})));

    if let Some(props) = data.props_mut() {
        *props = json!({"form": "login"}).into();
    }
    assert_eq!(data.props().map(|p| p.to_value()), Some(json!({"form": "login"})));
}

// ─── Error Aggregation ──────────────────────────────────────────────

fn errors_schema() -> Schema {
    let list = Schema::from_value(json!({
        "type": "list",
        "items": {
            "type": "group",
            "contents": {
                "a": {"type": "field", "subtype": "number", "rules": {"step": 1}},
                "b": {"type": "field", "subtype": "text", "rules": {"pattern": "geno", "minlength": 5}},
                "c": {"type": "field", "subtype": "select", "options": [true, false], "rules": {"minselected": 2}},
                "d": {"type": "field", "subtype": "number"}
            }
        },
        "rules": {"minitems": 2}
    }))
    .expect("list schema imports");

    let group = Schema::group([("list", list)]).invalid(Rule::computed(|_: EntityRef<'_>, data: &Data| {
        data.tread("group.list.0.d").is_some_and(|d| d.empty())
    }));
    Schema::group([("group", group)])
}

fn set_list(data: &mut Data, value: serde_json::Value) {
    data.tread_mut("group.list").expect("list").set(value);
}

fn root_errors(data: &Data) -> serde_json::Value {
    serde_json::to_value(data.root().errors()).expect("serializes")
}

#[test]
fn general_invalid_overrides_clean_children() {
    let data = Data::new(errors_schema());
    assert_eq!(root_errors(&data), json!({"contents": {"group": {"invalid": true}}}));
    assert_eq!(
        serde_json::to_value(data.tread("group").and_then(|g| g.errors())).expect("serializes"),
        json!({"invalid": true})
    );
}

#[test]
fn errors_mirror_the_failing_nodes() {
    let mut data = Data::new(errors_schema());

    set_list(&mut data, json!([{"d": 1.1}, {}]));
    assert!(data.root().errors().is_none());
    assert!(data.tread("group").and_then(|g| g.errors()).is_none());

    set_list(&mut data, json!([
        {"a": 1, "b": "geno", "c": [true, false]},
        {"a": 1.2, "b": "gero", "c": [true]}
    ]));
    assert_eq!(
        root_errors(&data),
        json!({
            "contents": {
                "group": {
                    "invalid": true,
                    "contents": {
                        "list": {
                            "items": [
                                {"contents": {"b": {"minlength": true}}},
                                {"contents": {
                                    "a": {"step": true},
                                    "b": {"pattern": true, "minlength": true},
                                    "c": {"minselected": true}
                                }}
                            ]
                        }
                    }
                }
            }
        })
    );

    set_list(&mut data, json!([
        {"a": 1, "b": "papageno", "c": [true, false], "d": 69},
        {"a": 2, "b": "gerogeno", "c": [false, true]}
    ]));
    assert!(data.root().errors().is_none());
    assert!(data.root().valid());
}
