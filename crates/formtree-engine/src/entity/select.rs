//! # Select Fields
//!
//! Holds the selected elements as an array; the empty array is empty. A
//! value is valid only when every element structurally equals one of the
//! schema's `options`. Writes are stored as given, except that a non-array
//! write is wrapped into a one-element array and `null` clears.

use std::ops::Deref;

use formtree_core::{equals, is_json, Json};

use super::errors::SelectErrors;
use super::EntityRef;
use crate::schema::rules::ResolvedSelectRules;
use crate::schema::SelectSchema;

/// Read view of a select field.
#[derive(Clone, Copy)]
pub struct SelectRef<'a> {
    entity: EntityRef<'a>,
    schema: &'a SelectSchema,
    value: &'a [Json],
}

impl<'a> SelectRef<'a> {
    pub(crate) fn new(entity: EntityRef<'a>, schema: &'a SelectSchema, value: &'a [Json]) -> Self {
        SelectRef { entity, schema, value }
    }

    pub fn get(&self) -> &'a [Json] {
        self.value
    }

    pub fn options(&self) -> &'a [Json] {
        &self.schema.options
    }

    pub fn schema(&self) -> &'a SelectSchema {
        self.schema
    }

    pub fn rules(&self) -> ResolvedSelectRules {
        self.schema.rules.resolve(self.entity)
    }

    pub fn empty(&self) -> bool {
        self.value.is_empty()
    }

    /// True when `element` is one of the declared options.
    pub fn offers(&self, element: &Json) -> bool {
        is_json(element) && self.schema.options.iter().any(|option| equals(option, element))
    }

    pub fn conforms(&self, candidate: &Json) -> bool {
        let Json::Array(selected) = candidate else {
            return false;
        };
        if !selected.iter().all(|element| self.offers(element)) {
            return false;
        }
        let rules = self.rules();
        if rules.common.invalid {
            return false;
        }
        if selected.is_empty() {
            return !rules.common.required;
        }
        !violations(&rules, selected.len()).any()
    }

    pub fn errors(&self) -> Option<SelectErrors> {
        let rules = self.rules();
        let mut errors = if self.empty() {
            SelectErrors { required: rules.common.required, ..Default::default() }
        } else {
            violations(&rules, self.value.len())
        };
        errors.r#type = !self.value.iter().all(|element| self.offers(element));
        errors.invalid = rules.common.invalid;
        errors.any().then_some(errors)
    }
}

impl<'a> Deref for SelectRef<'a> {
    type Target = EntityRef<'a>;

    fn deref(&self) -> &Self::Target {
        &self.entity
    }
}

fn violations(rules: &ResolvedSelectRules, count: usize) -> SelectErrors {
    SelectErrors {
        minselected: rules.minselected.is_some_and(|min| count < min),
        maxselected: rules.maxselected.is_some_and(|max| count > max),
        fixedselected: rules.fixedselected.is_some_and(|fixed| count != fixed),
        ..Default::default()
    }
}

/// Array representation of any written value.
pub(crate) fn coerce(value: Json) -> Vec<Json> {
    match value {
        Json::Array(selected) => selected,
        Json::Null => Vec::new(),
        other => vec![other],
    }
}
