//! Value writes: assignment, clearing, and defaults.

use formtree_core::Json;

use super::node::State;
use super::{number, select, text, EntityRef};
use crate::arena::EntityId;
use crate::data::Data;
use crate::schema::Kind;

impl Data {
    /// Assign `value` to `id`. Fields coerce and store it; groups and lists
    /// distribute it over their children.
    pub(crate) fn assign(&mut self, id: EntityId, value: Json) {
        match self.node(id).map(|node| node.state.kind()) {
            Some(Kind::Group) => self.assign_group(id, value),
            Some(Kind::List) => self.assign_list(id, value),
            Some(_) => self.write_field(id, Some(value)),
            None => {}
        }
    }

    /// Empty `id`: fields take their kind's empty value, groups clear every
    /// child, lists truncate to their floor and clear what remains.
    pub(crate) fn clear(&mut self, id: EntityId) {
        match self.node(id).map(|node| node.state.kind()) {
            Some(Kind::Group) => {
                for child in self.children_of(id) {
                    self.clear(child);
                }
            }
            Some(Kind::List) => {
                let floor = self.entity(id).and_then(|entity| entity.list()).map_or(0, |list| list.rules().floor());
                self.truncate(id, floor);
                for item in self.children_of(id) {
                    self.clear(item);
                }
            }
            Some(_) => self.write_field(id, None),
            None => {}
        }
    }

    /// Apply the resolved default of `id`, or clear it when there is none,
    /// then reset every child. A child without a default of its own ends up
    /// cleared even when the container's default gave it a value.
    pub(crate) fn reset(&mut self, id: EntityId) {
        let Some(entity) = self.entity(id) else {
            return;
        };
        let default = entity.node.state.default_rule().map(|rule| rule.apply(entity));
        match default {
            Some(value) => self.assign(id, value),
            None => self.clear(id),
        }
        for child in self.children_of(id) {
            self.reset(child);
        }
    }

    fn children_of(&self, id: EntityId) -> Vec<EntityId> {
        self.node(id).map(|node| node.state.children()).unwrap_or_default()
    }

    fn assign_group(&mut self, id: EntityId, value: Json) {
        let Json::Object(mut object) = value else {
            self.clear(id);
            return;
        };
        let contents: Vec<(String, EntityId)> = match self.node(id).map(|node| &node.state) {
            Some(State::Group { contents, .. }) => contents.iter().map(|(name, child)| (name.clone(), *child)).collect(),
            _ => return,
        };
        let mut missing = Vec::new();
        for (name, child) in contents {
            match object.remove(&name) {
                Some(value) => self.assign(child, value),
                None => missing.push(child),
            }
        }
        for child in missing {
            self.clear(child);
        }
    }

    fn assign_list(&mut self, id: EntityId, value: Json) {
        let Json::Array(values) = value else {
            self.clear(id);
            return;
        };
        self.resize(id, values.len());
        let items = self.items_of(id).to_vec();
        for (item, value) in items.into_iter().zip(values) {
            self.assign(item, value);
        }
    }

    /// Store `value` coerced to the field's kind, or the kind's empty value
    /// when `None`.
    fn write_field(&mut self, id: EntityId, value: Option<Json>) {
        let previous = if self.watches_field_changes() {
            self.entity(id).map(|entity| entity.value())
        } else {
            None
        };

        match self.state_mut(id) {
            Some(State::Text { value: stored, .. }) => *stored = value.as_ref().map_or_else(String::new, text::coerce),
            Some(State::Number { value: stored, .. }) => *stored = value.as_ref().and_then(number::coerce),
            Some(State::Select { value: stored, .. }) => *stored = value.map_or_else(Vec::new, select::coerce),
            _ => return,
        }

        let Some(previous) = previous else {
            return;
        };
        if self.entity(id).is_some_and(|entity| changed(entity, &previous)) {
            tracing::trace!(?id, "field changed");
            self.notify_field_change(id);
        }
    }
}

/// Whether a write moved `entity` away from `previous`. Two valid values
/// differ when they are not structurally equal; two invalid values never
/// differ. Validity of `previous` is judged under the current rules.
fn changed(entity: EntityRef<'_>, previous: &Json) -> bool {
    let valid = entity.valid();
    let was_valid = entity.conforms(previous);
    match (valid, was_valid) {
        (true, true) => !entity.equals(previous),
        (false, false) => false,
        _ => true,
    }
}
