//! # Requirements
//!
//! A [`Requirement`] is a declarative condition over other entities in the
//! same tree. It backs the `requires` rule: an entity whose requirement is
//! unsatisfied is disabled.
//!
//! ## Literal Shapes
//!
//! ```text
//! ["a", "b", 0]                          path only, same as "exists"
//! [["a", "b"], "exists" | "not exists"]        a third element is ignored
//! [["a"], "equals" | "not equals" | "includes" | "is included in", <value>]
//! {"discriminator": "allOf" | "anyOf", "requirements": [<requirement>, ...]}
//! ```
//!
//! Path segments that are strings address group contents; non-negative
//! integers address list items.
//!
//! ## Evaluation
//!
//! The path is resolved from the root of the tree. A missing hop fails the
//! requirement, and so does an invalid target, whatever the comparison.
//! `includes` asks whether the target's value structurally includes the
//! literal; `is included in` asks the reverse.

use formtree_core::{equals, includes, Json, Path, Segment};
use serde::{Deserialize, Deserializer};

use crate::data::Data;
use crate::error::SchemaError;

/// How a resolved target is compared.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    Exists,
    NotExists,
    Equals(Json),
    NotEquals(Json),
    Includes(Json),
    IsIncludedIn(Json),
}

impl Comparison {
    fn parse(keyword: &str, value: Option<Json>) -> Result<Self, SchemaError> {
        let needs_value = |make: fn(Json) -> Comparison| {
            value.clone().map(make).ok_or_else(|| {
                SchemaError::Requirement(format!("comparison '{keyword}' needs a value"))
            })
        };
        match keyword {
            // A value after "exists" or "not exists" is accepted and ignored.
            "exists" => Ok(Comparison::Exists),
            "not exists" => Ok(Comparison::NotExists),
            "equals" => needs_value(Comparison::Equals),
            "not equals" => needs_value(Comparison::NotEquals),
            "includes" => needs_value(Comparison::Includes),
            "is included in" => needs_value(Comparison::IsIncludedIn),
            other => Err(SchemaError::Requirement(format!("unknown comparison '{other}'"))),
        }
    }
}

/// A cross-entity condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    Check { path: Path, comparison: Comparison },
    AllOf(Vec<Requirement>),
    AnyOf(Vec<Requirement>),
}

impl Requirement {
    pub fn exists(path: impl Into<Path>) -> Self {
        Requirement::Check { path: path.into(), comparison: Comparison::Exists }
    }

    pub fn not_exists(path: impl Into<Path>) -> Self {
        Requirement::Check { path: path.into(), comparison: Comparison::NotExists }
    }

    pub fn equals(path: impl Into<Path>, value: impl Into<Json>) -> Self {
        Requirement::Check { path: path.into(), comparison: Comparison::Equals(value.into()) }
    }

    pub fn not_equals(path: impl Into<Path>, value: impl Into<Json>) -> Self {
        Requirement::Check { path: path.into(), comparison: Comparison::NotEquals(value.into()) }
    }

    pub fn includes(path: impl Into<Path>, value: impl Into<Json>) -> Self {
        Requirement::Check { path: path.into(), comparison: Comparison::Includes(value.into()) }
    }

    pub fn is_included_in(path: impl Into<Path>, value: impl Into<Json>) -> Self {
        Requirement::Check {
            path: path.into(),
            comparison: Comparison::IsIncludedIn(value.into()),
        }
    }

    pub fn all_of(requirements: impl IntoIterator<Item = Requirement>) -> Self {
        Requirement::AllOf(requirements.into_iter().collect())
    }

    pub fn any_of(requirements: impl IntoIterator<Item = Requirement>) -> Self {
        Requirement::AnyOf(requirements.into_iter().collect())
    }

    /// Parse one of the four literal shapes.
    pub fn from_json(value: &Json) -> Result<Self, SchemaError> {
        match value {
            Json::Array(parts) => match parts.first() {
                Some(Json::Array(path)) => {
                    let path = parse_path(path)?;
                    let keyword = parts.get(1).and_then(Json::as_str).ok_or_else(|| {
                        SchemaError::Requirement("comparison must be a string".into())
                    })?;
                    if parts.len() > 3 {
                        return Err(SchemaError::Requirement(format!(
                            "expected at most 3 elements, found {}",
                            parts.len()
                        )));
                    }
                    let comparison = Comparison::parse(keyword, parts.get(2).cloned())?;
                    Ok(Requirement::Check { path, comparison })
                }
                _ => Ok(Requirement::exists(parse_path(parts)?)),
            },
            Json::Object(map) => {
                let requirements = match map.get("requirements") {
                    Some(Json::Array(items)) => items
                        .iter()
                        .map(Requirement::from_json)
                        .collect::<Result<Vec<_>, _>>()?,
                    _ => {
                        return Err(SchemaError::Requirement(
                            "combinator needs a 'requirements' array".into(),
                        ))
                    }
                };
                match map.get("discriminator").and_then(Json::as_str) {
                    Some("allOf") => Ok(Requirement::AllOf(requirements)),
                    Some("anyOf") => Ok(Requirement::AnyOf(requirements)),
                    Some(other) => Err(SchemaError::Requirement(format!(
                        "unknown discriminator '{other}'"
                    ))),
                    None => Err(SchemaError::Requirement(
                        "combinator needs a 'discriminator'".into(),
                    )),
                }
            }
            other => Err(SchemaError::Requirement(format!(
                "expected an array or object, found {}",
                other.type_name()
            ))),
        }
    }

    /// Evaluate against the tree owned by `data`.
    pub fn satisfied_by(&self, data: &Data) -> bool {
        match self {
            Requirement::Check { path, comparison } => check(data, path, comparison),
            Requirement::AllOf(requirements) => requirements.iter().all(|r| r.satisfied_by(data)),
            Requirement::AnyOf(requirements) => requirements.iter().any(|r| r.satisfied_by(data)),
        }
    }
}

fn parse_path(segments: &[Json]) -> Result<Path, SchemaError> {
    segments
        .iter()
        .map(|segment| match segment {
            Json::String(name) => Ok(Segment::Name(name.clone())),
            Json::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= usize::MAX as f64 => {
                Ok(Segment::Index(*n as usize))
            }
            other => Err(SchemaError::Requirement(format!(
                "path segment must be a string or a non-negative integer, found {other}"
            ))),
        })
        .collect()
}

fn check(data: &Data, path: &Path, comparison: &Comparison) -> bool {
    let Some(target) = data.resolve(path) else {
        tracing::trace!(%path, "requirement target not found");
        return false;
    };
    if !target.valid() {
        tracing::trace!(%path, "requirement target is invalid");
        return false;
    }
    match comparison {
        Comparison::Exists => !target.empty(),
        Comparison::NotExists => target.empty(),
        Comparison::Equals(value) => equals(&target.value(), value),
        Comparison::NotEquals(value) => !equals(&target.value(), value),
        Comparison::Includes(value) => includes(&target.value(), value),
        Comparison::IsIncludedIn(value) => includes(value, &target.value()),
    }
}

impl<'de> Deserialize<'de> for Requirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Json::deserialize(deserializer)?;
        Requirement::from_json(&value).map_err(serde::de::Error::custom)
    }
}
