//! # Groups
//!
//! A fixed mapping from content name to child entity, one child per entry in
//! the schema's `contents`. Children are created with the group and live as
//! long as it does; writes only change their values.
//!
//! The emitted value omits every child that is disabled or empty, so a
//! cleared child is indistinguishable from one never set.

use std::collections::BTreeMap;
use std::ops::Deref;

use formtree_core::{Json, Map};

use super::errors::GroupErrors;
use super::{EntityMut, EntityRef};
use crate::arena::EntityId;
use crate::data::Data;
use crate::schema::rules::ResolvedCommon;
use crate::schema::GroupSchema;

/// Read view of a group.
#[derive(Clone, Copy)]
pub struct GroupRef<'a> {
    entity: EntityRef<'a>,
    schema: &'a GroupSchema,
    contents: &'a BTreeMap<String, EntityId>,
}

impl<'a> GroupRef<'a> {
    pub(crate) fn new(
        entity: EntityRef<'a>,
        schema: &'a GroupSchema,
        contents: &'a BTreeMap<String, EntityId>,
    ) -> Self {
        GroupRef { entity, schema, contents }
    }

    /// Children by name, in name order.
    pub fn contents(&self) -> impl Iterator<Item = (&'a str, EntityRef<'a>)> + 'a {
        let data = self.entity.data();
        let contents = self.contents;
        contents
            .iter()
            .filter_map(move |(name, id)| data.entity(*id).map(|child| (name.as_str(), child)))
    }

    pub fn get(&self, name: &str) -> Option<EntityRef<'a>> {
        self.contents.get(name).and_then(|id| self.entity.data().entity(*id))
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn schema(&self) -> &'a GroupSchema {
        self.schema
    }

    pub fn rules(&self) -> ResolvedCommon {
        self.schema.rules.resolve(self.entity)
    }

    pub fn value(&self) -> Map {
        self.contents()
            .filter(|(_, child)| !child.disabled() && !child.empty())
            .map(|(name, child)| (name.to_owned(), child.value()))
            .collect()
    }

    /// True when every child is empty.
    pub fn empty(&self) -> bool {
        self.contents().all(|(_, child)| child.empty())
    }

    /// Structural check of `candidate` plus the current validity of every
    /// child. Children are judged on their own values, not on the
    /// candidate's entries.
    pub fn conforms(&self, candidate: &Json) -> bool {
        let Json::Object(object) = candidate else {
            return false;
        };
        if !object.keys().all(|key| self.contents.contains_key(key)) {
            return false;
        }
        if !self.contents().all(|(_, child)| child.valid()) {
            return false;
        }
        let rules = self.rules();
        !rules.invalid && !(rules.required && self.empty())
    }

    pub fn errors(&self) -> Option<GroupErrors> {
        let contents: BTreeMap<String, _> = self
            .contents()
            .filter_map(|(name, child)| child.errors().map(|errors| (name.to_owned(), errors)))
            .collect();
        let rules = self.rules();
        let errors = GroupErrors {
            invalid: rules.invalid,
            required: rules.required && self.empty(),
            contents: (!contents.is_empty()).then_some(contents),
            ..Default::default()
        };
        errors.any().then_some(errors)
    }
}

impl<'a> Deref for GroupRef<'a> {
    type Target = EntityRef<'a>;

    fn deref(&self) -> &Self::Target {
        &self.entity
    }
}

/// Write view of a group.
pub struct GroupMut<'a> {
    data: &'a mut Data,
    id: EntityId,
}

impl<'a> GroupMut<'a> {
    pub(crate) fn new(data: &'a mut Data, id: EntityId) -> Self {
        GroupMut { data, id }
    }

    /// Content names, in name order.
    pub fn names(&self) -> Vec<String> {
        self.data
            .entity(self.id)
            .and_then(|entity| entity.group())
            .map(|group| group.contents().map(|(name, _)| name.to_owned()).collect())
            .unwrap_or_default()
    }

    pub fn child_mut(&mut self, name: &str) -> Option<EntityMut<'_>> {
        let child = self.data.entity(self.id)?.group()?.get(name)?.id();
        self.data.entity_mut(child)
    }
}
