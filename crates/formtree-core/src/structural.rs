//! # Structural Comparison
//!
//! The comparisons behind requirement checks and change detection.
//!
//! [`includes`] answers "does `superset` dominate `subset`?" with a rule per
//! type. Values of different types never include one another.
//!
//! | Type | `includes(superset, subset)` |
//! |---|---|
//! | number | `superset >= subset` |
//! | string | `superset` contains `subset` as a substring |
//! | array | every `subset[i]` is included in `superset[i]`; a missing `superset[i]` fails |
//! | object | every key of `subset` exists in `superset` with an including value |
//! | null, boolean | identical |
//!
//! [`equals`] is inclusion in both directions, which collapses to deep
//! equality: arrays must have equal lengths and objects equal key sets.

use crate::json::Json;

/// True iff `superset` structurally includes `subset`.
pub fn includes(superset: &Json, subset: &Json) -> bool {
    match (superset, subset) {
        (Json::Null, Json::Null) => true,
        (Json::Bool(a), Json::Bool(b)) => a == b,
        (Json::Number(a), Json::Number(b)) => a >= b,
        (Json::String(a), Json::String(b)) => a.contains(b.as_str()),
        (Json::Array(sup), Json::Array(sub)) => sub
            .iter()
            .enumerate()
            .all(|(i, item)| sup.get(i).is_some_and(|sup_item| includes(sup_item, item))),
        (Json::Object(sup), Json::Object(sub)) => sub
            .iter()
            .all(|(key, item)| sup.get(key).is_some_and(|sup_item| includes(sup_item, item))),
        _ => false,
    }
}

/// Structural deep equality: `includes(a, b) && includes(b, a)`.
pub fn equals(a: &Json, b: &Json) -> bool {
    includes(a, b) && includes(b, a)
}

/// True iff every number in `value` is finite, so the value has a JSON
/// encoding.
pub fn is_json(value: &Json) -> bool {
    match value {
        Json::Number(n) => n.is_finite(),
        Json::Array(items) => items.iter().all(is_json),
        Json::Object(map) => map.values().all(is_json),
        Json::Null | Json::Bool(_) | Json::String(_) => true,
    }
}

/// Independent deep copy of `value`. Nothing is shared with the source.
pub fn deep_clone(value: &Json) -> Json {
    value.clone()
}
