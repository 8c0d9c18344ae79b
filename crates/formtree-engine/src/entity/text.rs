//! # Text Fields
//!
//! Holds a string; the empty string is empty. Writes coerce any value to
//! text: numbers print the way JSON writes them (`5`, not `5.0`), booleans
//! print `true`/`false`, a written `null` becomes `"null"`, arrays join
//! their elements with commas, and objects become `[object Object]`.
//! Clearing stores the empty string directly.
//!
//! Lengths count Unicode scalar values. `pattern` must match somewhere in the
//! value.

use std::ops::Deref;

use formtree_core::Json;

use super::errors::TextErrors;
use super::EntityRef;
use crate::schema::rules::ResolvedTextRules;
use crate::schema::TextSchema;

/// Read view of a text field.
#[derive(Clone, Copy)]
pub struct TextRef<'a> {
    entity: EntityRef<'a>,
    schema: &'a TextSchema,
    value: &'a str,
}

impl<'a> TextRef<'a> {
    pub(crate) fn new(entity: EntityRef<'a>, schema: &'a TextSchema, value: &'a str) -> Self {
        TextRef { entity, schema, value }
    }

    pub fn get(&self) -> &'a str {
        self.value
    }

    pub fn schema(&self) -> &'a TextSchema {
        self.schema
    }

    pub fn rules(&self) -> ResolvedTextRules {
        self.schema.rules.resolve(self.entity)
    }

    pub fn empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn conforms(&self, candidate: &Json) -> bool {
        let Json::String(text) = candidate else {
            return false;
        };
        let rules = self.rules();
        if rules.common.invalid {
            return false;
        }
        if text.is_empty() {
            return !rules.common.required;
        }
        !violations(&rules, text).any()
    }

    pub fn errors(&self) -> Option<TextErrors> {
        let rules = self.rules();
        let mut errors = if self.empty() {
            TextErrors { required: rules.common.required, ..Default::default() }
        } else {
            violations(&rules, self.value)
        };
        errors.invalid = rules.common.invalid;
        errors.any().then_some(errors)
    }
}

impl<'a> Deref for TextRef<'a> {
    type Target = EntityRef<'a>;

    fn deref(&self) -> &Self::Target {
        &self.entity
    }
}

/// Kind-rule violations of a non-empty value.
fn violations(rules: &ResolvedTextRules, text: &str) -> TextErrors {
    let length = text.chars().count();
    TextErrors {
        minlength: rules.minlength.is_some_and(|min| length < min),
        maxlength: rules.maxlength.is_some_and(|max| length > max),
        fixedlength: rules.fixedlength.is_some_and(|fixed| length != fixed),
        pattern: rules.pattern.as_ref().is_some_and(|pattern| !pattern.is_match(text)),
        ..Default::default()
    }
}

/// Text representation of any written value. Arrays join their elements
/// with commas, nulls inside them rendering as nothing; objects render as
/// `[object Object]`. Clearing does not pass through here.
pub(crate) fn coerce(value: &Json) -> String {
    match value {
        Json::Null => "null".to_owned(),
        Json::Bool(b) => b.to_string(),
        Json::Number(n) => number_to_text(*n),
        Json::String(s) => s.clone(),
        Json::Array(items) => items.iter().map(element_text).collect::<Vec<_>>().join(","),
        Json::Object(_) => "[object Object]".to_owned(),
    }
}

fn element_text(value: &Json) -> String {
    match value {
        Json::Null => String::new(),
        other => coerce(other),
    }
}

fn number_to_text(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n == f64::INFINITY {
        "Infinity".to_owned()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_owned()
    } else if n == 0.0 {
        "0".to_owned()
    } else {
        n.to_string()
    }
}
