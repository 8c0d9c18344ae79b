//! # Lists
//!
//! An ordered sequence of items sharing one schema. Items are constructed
//! when the list grows and destroyed when it shrinks; the item count stays
//! within the list's bounds after every write:
//!
//! - growth stops at `maxitems` (or `fixeditems`),
//! - shrinking stops at `minitems` (or `fixeditems`),
//! - `clear` truncates to the floor (`fixeditems`, else `minitems`, else 0)
//!   and clears the items that remain.
//!
//! Requests beyond a bound are capped, never rejected. The emitted value
//! skips disabled items, so later items shift left.

use std::ops::Deref;
use std::sync::Arc;

use formtree_core::Json;

use super::errors::ListErrors;
use super::node::State;
use super::{EntityMut, EntityRef};
use crate::arena::EntityId;
use crate::data::Data;
use crate::schema::rules::ResolvedListRules;
use crate::schema::ListSchema;

/// Read view of a list.
#[derive(Clone, Copy)]
pub struct ListRef<'a> {
    entity: EntityRef<'a>,
    schema: &'a ListSchema,
    items: &'a [EntityId],
}

impl<'a> ListRef<'a> {
    pub(crate) fn new(entity: EntityRef<'a>, schema: &'a ListSchema, items: &'a [EntityId]) -> Self {
        ListRef { entity, schema, items }
    }

    pub fn items(&self) -> impl Iterator<Item = EntityRef<'a>> + 'a {
        let data = self.entity.data();
        let items = self.items;
        items.iter().filter_map(move |id| data.entity(*id))
    }

    pub fn item(&self, index: usize) -> Option<EntityRef<'a>> {
        self.items.get(index).and_then(|id| self.entity.data().entity(*id))
    }

    /// Number of items, disabled ones included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the list holds no items at all. See [`EntityRef::empty`]
    /// for emptiness of the value.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn schema(&self) -> &'a ListSchema {
        self.schema
    }

    pub fn rules(&self) -> ResolvedListRules {
        self.schema.rules.resolve(self.entity)
    }

    pub fn value(&self) -> Vec<Json> {
        self.items().filter(|item| !item.disabled()).map(|item| item.value()).collect()
    }

    /// True when every item is empty, including when there are none.
    pub fn empty(&self) -> bool {
        self.items().all(|item| item.empty())
    }

    pub fn conforms(&self, candidate: &Json) -> bool {
        let Json::Array(array) = candidate else {
            return false;
        };
        if !self.items().all(|item| item.valid()) {
            return false;
        }
        let rules = self.rules();
        if rules.common.invalid {
            return false;
        }
        let empty = self.empty();
        if empty {
            return !rules.common.required;
        }
        array.len() == self.len() && !count_violations(&rules, self.len()).any()
    }

    pub fn errors(&self) -> Option<ListErrors> {
        let items: Vec<_> = self.items().map(|item| item.errors()).collect();
        let rules = self.rules();
        let empty = self.empty();
        let mut errors = if empty {
            ListErrors::default()
        } else {
            ListErrors {
                length: self.value().len() != self.len(),
                ..count_violations(&rules, self.len())
            }
        };
        errors.invalid = rules.common.invalid;
        errors.required = rules.common.required && empty;
        errors.items = items.iter().any(Option::is_some).then_some(items);
        errors.any().then_some(errors)
    }
}

impl<'a> Deref for ListRef<'a> {
    type Target = EntityRef<'a>;

    fn deref(&self) -> &Self::Target {
        &self.entity
    }
}

fn count_violations(rules: &ResolvedListRules, count: usize) -> ListErrors {
    ListErrors {
        minitems: rules.minitems.is_some_and(|min| count < min),
        maxitems: rules.maxitems.is_some_and(|max| count > max),
        fixeditems: rules.fixeditems.is_some_and(|fixed| count != fixed),
        ..Default::default()
    }
}

/// Write view of a list.
pub struct ListMut<'a> {
    data: &'a mut Data,
    id: EntityId,
}

impl<'a> ListMut<'a> {
    pub(crate) fn new(data: &'a mut Data, id: EntityId) -> Self {
        ListMut { data, id }
    }

    pub fn len(&self) -> usize {
        self.data.items_of(self.id).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a constructed item, unless the list is at its ceiling.
    pub fn push_item(&mut self) -> Option<EntityId> {
        self.data.push_item(self.id)
    }

    /// Destroy the last item, unless the list is at its floor.
    pub fn pop_item(&mut self) -> bool {
        self.data.pop_item(self.id)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<EntityMut<'_>> {
        let item = *self.data.items_of(self.id).get(index)?;
        self.data.entity_mut(item)
    }
}

// ─── Resizing ───────────────────────────────────────────────────────

impl Data {
    pub(crate) fn items_of(&self, list: EntityId) -> &[EntityId] {
        match self.node(list).map(|node| &node.state) {
            Some(State::List { items, .. }) => items.as_slice(),
            _ => &[],
        }
    }

    fn list_rules(&self, list: EntityId) -> Option<ResolvedListRules> {
        self.entity(list)?.list().map(|view| view.rules())
    }

    pub(crate) fn push_item(&mut self, list: EntityId) -> Option<EntityId> {
        let schema = match self.node(list).map(|node| &node.state) {
            Some(State::List { schema, .. }) => Arc::clone(schema),
            _ => return None,
        };
        let rules = self.list_rules(list)?;
        if !rules.admits_push(self.items_of(list).len()) {
            return None;
        }
        let item = self.allocate(&schema.items, list);
        if let Some(State::List { items, .. }) = self.state_mut(list) {
            items.push(item);
        }
        self.build(item);
        Some(item)
    }

    pub(crate) fn pop_item(&mut self, list: EntityId) -> bool {
        let Some(rules) = self.list_rules(list) else {
            return false;
        };
        if !rules.admits_pop(self.items_of(list).len()) {
            return false;
        }
        let popped = match self.state_mut(list) {
            Some(State::List { items, .. }) => items.pop(),
            _ => None,
        };
        match popped {
            Some(item) => {
                self.destroy(item);
                true
            }
            None => false,
        }
    }

    /// Grow or shrink toward `target` items, stopping at the bounds.
    pub(crate) fn resize(&mut self, list: EntityId, target: usize) {
        let before = self.items_of(list).len();
        while self.items_of(list).len() < target {
            if self.push_item(list).is_none() {
                break;
            }
        }
        while self.items_of(list).len() > target {
            if !self.pop_item(list) {
                break;
            }
        }
        let after = self.items_of(list).len();
        if after != target {
            tracing::warn!(requested = target, len = after, "list resize capped by item bounds");
        }
        if after != before {
            tracing::debug!(from = before, to = after, "list resized");
        }
    }

    /// Destroy items beyond `len`.
    pub(crate) fn truncate(&mut self, list: EntityId, len: usize) {
        let removed = match self.state_mut(list) {
            Some(State::List { items, .. }) if items.len() > len => items.split_off(len),
            _ => return,
        };
        for item in removed {
            self.destroy(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::data::Data;
    use crate::entity::EntityRef;
    use crate::schema::rule::Rule;
    use crate::schema::rules::ListRules;
    use crate::schema::{ListSchema, Schema};

    fn bounded(minitems: usize, maxitems: usize) -> Data {
        Data::new(ListSchema::new(Schema::number()).with_rules(ListRules {
            minitems: Some(minitems.into()),
            maxitems: Some(maxitems.into()),
            ..Default::default()
        }))
    }

    fn len(data: &Data) -> usize {
        data.root().list().map_or(0, |list| list.len())
    }

    #[test]
    fn prepopulates_the_floor() {
        let data = bounded(2, 4);
        assert_eq!(len(&data), 2);
        assert_eq!(data.entity_count(), 3);
    }

    #[test]
    fn writes_are_capped_by_bounds() {
        let mut data = bounded(2, 4);
        data.root_mut().set(json!([1, 2, 3, 4, 5, 6]));
        assert_eq!(len(&data), 4);
        assert_eq!(data.root().value().to_value(), json!([1, 2, 3, 4]));

        data.root_mut().set(json!([7]));
        assert_eq!(len(&data), 2);
        assert_eq!(data.tread("1").map(|item| item.empty()), Some(true));
    }

    #[test]
    fn push_and_pop_respect_bounds() {
        let mut data = bounded(1, 2);
        let mut root = data.root_mut();
        let mut list = root.list_mut().expect("list");
        assert!(list.push_item().is_some());
        assert!(list.push_item().is_none());
        assert!(list.pop_item());
        assert!(!list.pop_item());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn clear_truncates_to_floor() {
        let mut data = bounded(1, 5);
        data.root_mut().set(json!([1, 2, 3]));
        assert_eq!(data.entity_count(), 4);
        data.root_mut().clear();
        assert_eq!(len(&data), 1);
        assert_eq!(data.entity_count(), 2);
        assert!(data.root().empty());
    }

    #[test]
    fn destroyed_items_no_longer_resolve() {
        let mut data = bounded(0, 5);
        data.root_mut().set(json!([1, 2]));
        let second = data.tread("1").map(|item| item.id()).expect("second item");
        data.root_mut().set(json!([1]));
        assert!(data.entity(second).is_none());
    }

    #[test]
    fn disabled_items_are_skipped_from_the_value() {
        let second_disabled = Schema::number()
            .disabled(Rule::computed(|entity: EntityRef<'_>, _: &Data| entity.index() == Some(1)));
        let mut data = Data::new(ListSchema::new(second_disabled));
        data.root_mut().set(json!([1, 2, 3]));

        assert_eq!(len(&data), 3);
        assert_eq!(data.root().value().to_value(), json!([1, 3]));
        assert!(!data.root().valid());
        let errors = data.root().errors().expect("length mismatch is reported");
        let list_errors = errors.as_list().expect("list errors");
        assert!(list_errors.length);
        assert!(list_errors.items.is_none());
    }

    #[test]
    fn count_rules_apply_only_when_not_empty() {
        let data = Data::new(ListSchema::new(Schema::number()).with_rules(ListRules {
            minitems: Some(2usize.into()),
            ..Default::default()
        }));
        assert!(data.root().valid());
        assert!(data.root().errors().is_none());
    }
}
