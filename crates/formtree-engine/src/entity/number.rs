//! # Number Fields
//!
//! Holds an optional `f64`; `None` is empty. Writes coerce: `null` empties
//! the field, booleans become 1 or 0, strings are parsed after trimming
//! (blank text is 0, unparseable text is `NaN`), arrays are parsed from
//! their joined text, and objects become `NaN`. A stored `NaN` is never
//! valid.

use std::ops::Deref;

use formtree_core::Json;

use super::errors::NumberErrors;
use super::{text, EntityRef};
use crate::schema::rules::{Bound, ResolvedNumberRules};
use crate::schema::NumberSchema;

/// Read view of a number field.
#[derive(Clone, Copy)]
pub struct NumberRef<'a> {
    entity: EntityRef<'a>,
    schema: &'a NumberSchema,
    value: Option<f64>,
}

impl<'a> NumberRef<'a> {
    pub(crate) fn new(entity: EntityRef<'a>, schema: &'a NumberSchema, value: Option<f64>) -> Self {
        NumberRef { entity, schema, value }
    }

    pub fn get(&self) -> Option<f64> {
        self.value
    }

    pub fn schema(&self) -> &'a NumberSchema {
        self.schema
    }

    pub fn rules(&self) -> ResolvedNumberRules {
        self.schema.rules.resolve(self.entity)
    }

    pub fn empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn conforms(&self, candidate: &Json) -> bool {
        let number = match candidate {
            Json::Null => None,
            Json::Number(n) if n.is_nan() => return false,
            Json::Number(n) => Some(*n),
            _ => return false,
        };
        let rules = self.rules();
        if rules.common.invalid {
            return false;
        }
        match number {
            None => !rules.common.required,
            Some(n) => !violations(&rules, n).any(),
        }
    }

    pub fn errors(&self) -> Option<NumberErrors> {
        let rules = self.rules();
        let mut errors = match self.value {
            None => NumberErrors { required: rules.common.required, ..Default::default() },
            Some(n) => NumberErrors { value: n.is_nan(), ..violations(&rules, n) },
        };
        errors.invalid = rules.common.invalid;
        errors.any().then_some(errors)
    }
}

impl<'a> Deref for NumberRef<'a> {
    type Target = EntityRef<'a>;

    fn deref(&self) -> &Self::Target {
        &self.entity
    }
}

fn below(min: &Bound, n: f64) -> bool {
    if min.exclusive {
        min.value >= n
    } else {
        min.value > n
    }
}

fn above(max: &Bound, n: f64) -> bool {
    if max.exclusive {
        max.value <= n
    } else {
        max.value < n
    }
}

/// Kind-rule violations of a present value. `NaN` trips `step` only.
fn violations(rules: &ResolvedNumberRules, n: f64) -> NumberErrors {
    let base = rules.min.map_or(0.0, |min| min.value);
    NumberErrors {
        min: rules.min.is_some_and(|min| below(&min, n)),
        max: rules.max.is_some_and(|max| above(&max, n)),
        step: rules.step.is_some_and(|step| step != 0.0 && (n - base) % step != 0.0),
        ..Default::default()
    }
}

/// Number representation of any written value.
pub(crate) fn coerce(value: &Json) -> Option<f64> {
    match value {
        Json::Null => None,
        Json::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Json::Number(n) => Some(*n),
        Json::String(s) => Some(parse_text(s)),
        // An array reads as its joined text: `[]` is 0, `[5]` is 5.
        Json::Array(_) => Some(parse_text(&text::coerce(value))),
        Json::Object(_) => Some(f64::NAN),
    }
}

fn parse_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts "inf" and "nan" spellings that numeric text does not.
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) => f64::NAN,
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}
