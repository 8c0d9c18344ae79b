//! # Rules
//!
//! Every rule slot in a schema holds a [`Rule<T>`]: either a literal `T`, or a
//! function of the live entity and its owning [`Data`] that produces a `T`
//! each time the rule is read. Computed rules receive shared borrows only, so
//! a rule can inspect any entity in the tree but never mutate it.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::data::Data;
use crate::entity::EntityRef;

/// Signature of a computed rule.
pub type RuleFn<T> = dyn Fn(EntityRef<'_>, &Data) -> T + Send + Sync;

/// A literal rule value or a function computing it from the live tree.
pub enum Rule<T> {
    Literal(T),
    Computed(Arc<RuleFn<T>>),
}

impl<T: Clone> Rule<T> {
    /// Wrap a closure as a computed rule.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(EntityRef<'_>, &Data) -> T + Send + Sync + 'static,
    {
        Rule::Computed(Arc::new(f))
    }

    /// Resolve the rule against `entity` and the tree that owns it.
    pub fn apply(&self, entity: EntityRef<'_>) -> T {
        apply_rule(self, entity, entity.data())
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Rule::Computed(_))
    }
}

/// Resolve `rule`: literals are returned as-is, computed rules are invoked
/// with `(entity, data)`.
pub fn apply_rule<T: Clone>(rule: &Rule<T>, entity: EntityRef<'_>, data: &Data) -> T {
    match rule {
        Rule::Literal(value) => value.clone(),
        Rule::Computed(f) => f(entity, data),
    }
}

impl<T> From<T> for Rule<T> {
    fn from(value: T) -> Self {
        Rule::Literal(value)
    }
}

impl<T: Clone> Clone for Rule<T> {
    fn clone(&self) -> Self {
        match self {
            Rule::Literal(value) => Rule::Literal(value.clone()),
            Rule::Computed(f) => Rule::Computed(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Rule::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Literal schemas can only carry literal rules.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Rule<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Rule::Literal)
    }
}
