//! # Entities
//!
//! An entity is the live counterpart of one schema node. Entities are read
//! through [`EntityRef`], a shared handle, and written through [`EntityMut`],
//! an exclusive one. Both are short-lived borrows of the owning
//! [`Data`]; hold an [`EntityId`] to refer to an entity across writes.
//!
//! ## Uniform Surface
//!
//! | Read (`EntityRef`) | Write (`EntityMut`) |
//! |---|---|
//! | `value`, `empty`, `valid`, `disabled`, `errors`, `rules` | `set`, `clear`, `reset` |
//! | `conforms`, `equals` | `props_mut`, `set_props` |
//! | `path`, `index`, `name`, `is_root`, `container`, `tread` | `tread` |
//!
//! Nothing derived is cached. Every read recomputes from the stored values
//! and the schema's rules, so a read always reflects the latest write
//! anywhere in the tree.
//!
//! ## Kind Views
//!
//! Exactly one of `group()`, `list()`, `text()`, `number()`, `select()`
//! returns `Some` for a given entity. The view exposes the kind's own
//! surface (group contents, list items, typed values and rules) and derefs
//! to the entity handle.

pub mod errors;
pub mod group;
pub mod list;
mod navigate;
pub(crate) mod node;
pub mod number;
pub mod select;
pub mod text;
mod write;

use std::fmt;

use formtree_core::{equals, is_json, Json, Path};

use self::errors::Errors;
use self::group::{GroupMut, GroupRef};
use self::list::{ListMut, ListRef};
use self::node::{Node, State};
use self::number::NumberRef;
use self::select::SelectRef;
use self::text::TextRef;
use crate::arena::EntityId;
use crate::data::Data;
use crate::schema::rules::{ResolvedCommon, ResolvedRules};
use crate::schema::{Kind, Schema};

// ─── Read Handle ────────────────────────────────────────────────────

/// Shared handle to one entity.
#[derive(Clone, Copy)]
pub struct EntityRef<'a> {
    data: &'a Data,
    id: EntityId,
    node: &'a Node,
}

enum View<'a> {
    Group(GroupRef<'a>),
    List(ListRef<'a>),
    Text(TextRef<'a>),
    Number(NumberRef<'a>),
    Select(SelectRef<'a>),
}

impl<'a> EntityRef<'a> {
    pub(crate) fn new(data: &'a Data, id: EntityId, node: &'a Node) -> Self {
        EntityRef { data, id, node }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The container owning this entity's tree.
    pub fn data(&self) -> &'a Data {
        self.data
    }

    pub fn kind(&self) -> Kind {
        self.node.state.kind()
    }

    pub fn schema(&self) -> Schema {
        self.node.state.schema()
    }

    /// The entity's own copy of its schema's `props`.
    pub fn props(&self) -> Option<&'a Json> {
        self.node.props.as_ref()
    }

    fn view(&self) -> View<'a> {
        let node: &'a Node = self.node;
        let entity = *self;
        match &node.state {
            State::Group { schema, contents } => View::Group(GroupRef::new(entity, schema, contents)),
            State::List { schema, items } => View::List(ListRef::new(entity, schema, items)),
            State::Text { schema, value } => View::Text(TextRef::new(entity, schema, value)),
            State::Number { schema, value } => View::Number(NumberRef::new(entity, schema, *value)),
            State::Select { schema, value } => View::Select(SelectRef::new(entity, schema, value)),
        }
    }

    // ─── Kind Views ─────────────────────────────────────────────────

    pub fn group(&self) -> Option<GroupRef<'a>> {
        match self.view() {
            View::Group(view) => Some(view),
            _ => None,
        }
    }

    pub fn list(&self) -> Option<ListRef<'a>> {
        match self.view() {
            View::List(view) => Some(view),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<TextRef<'a>> {
        match self.view() {
            View::Text(view) => Some(view),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<NumberRef<'a>> {
        match self.view() {
            View::Number(view) => Some(view),
            _ => None,
        }
    }

    pub fn select(&self) -> Option<SelectRef<'a>> {
        match self.view() {
            View::Select(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind() == Kind::Group
    }

    pub fn is_list(&self) -> bool {
        self.kind() == Kind::List
    }

    pub fn is_text(&self) -> bool {
        self.kind() == Kind::Text
    }

    pub fn is_number(&self) -> bool {
        self.kind() == Kind::Number
    }

    pub fn is_select(&self) -> bool {
        self.kind() == Kind::Select
    }

    // ─── Derived State ──────────────────────────────────────────────

    /// Current value in the kind's native shape. Groups omit disabled and
    /// empty children; lists skip disabled items.
    pub fn value(&self) -> Json {
        match self.view() {
            View::Group(group) => Json::Object(group.value()),
            View::List(list) => Json::Array(list.value()),
            View::Text(text) => Json::String(text.get().to_owned()),
            View::Number(number) => number.get().map_or(Json::Null, Json::Number),
            View::Select(select) => Json::Array(select.get().to_vec()),
        }
    }

    pub fn empty(&self) -> bool {
        match self.view() {
            View::Group(group) => group.empty(),
            View::List(list) => list.empty(),
            View::Text(text) => text.empty(),
            View::Number(number) => number.empty(),
            View::Select(select) => select.empty(),
        }
    }

    /// Whether `candidate` would be a valid value for this entity, given the
    /// current state of the rest of the tree.
    pub fn conforms(&self, candidate: &Json) -> bool {
        match self.view() {
            View::Group(group) => group.conforms(candidate),
            View::List(list) => list.conforms(candidate),
            View::Text(text) => text.conforms(candidate),
            View::Number(number) => number.conforms(candidate),
            View::Select(select) => select.conforms(candidate),
        }
    }

    pub fn valid(&self) -> bool {
        self.conforms(&self.value())
    }

    /// Every rule violation, or `None` when there is none.
    pub fn errors(&self) -> Option<Errors> {
        match self.view() {
            View::Group(group) => group.errors().map(Errors::Group),
            View::List(list) => list.errors().map(Errors::List),
            View::Text(text) => text.errors().map(Errors::Text),
            View::Number(number) => number.errors().map(Errors::Number),
            View::Select(select) => select.errors().map(Errors::Select),
        }
    }

    /// Resolved rules of this entity's kind.
    pub fn rules(&self) -> ResolvedRules {
        match self.view() {
            View::Group(group) => ResolvedRules::Group(group.rules()),
            View::List(list) => ResolvedRules::List(list.rules()),
            View::Text(text) => ResolvedRules::Text(text.rules()),
            View::Number(number) => ResolvedRules::Number(number.rules()),
            View::Select(select) => ResolvedRules::Select(select.rules()),
        }
    }

    pub(crate) fn common_rules(&self) -> ResolvedCommon {
        self.node.state.common_rules().resolve(*self)
    }

    /// True when the `disabled` rule holds or a `requires` rule fails.
    pub fn disabled(&self) -> bool {
        let common = self.common_rules();
        common.disabled
            || common
                .requires
                .is_some_and(|requirement| !requirement.satisfied_by(self.data))
    }

    /// Structural equality of the current value with `other`. Values holding
    /// a non-finite number equal nothing.
    pub fn equals(&self, other: &Json) -> bool {
        let value = self.value();
        is_json(&value) && is_json(other) && equals(&value, other)
    }
}

impl PartialEq for EntityRef<'_> {
    /// Handles are equal when they address the same entity of the same tree.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.data, other.data)
    }
}

impl Eq for EntityRef<'_> {}

impl fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRef")
            .field("kind", &self.kind())
            .field("path", &self.path().to_string())
            .field("value", &self.value())
            .finish()
    }
}

// ─── Write Handle ───────────────────────────────────────────────────

/// Exclusive handle to one entity.
pub struct EntityMut<'a> {
    data: &'a mut Data,
    id: EntityId,
}

impl<'a> EntityMut<'a> {
    pub(crate) fn new(data: &'a mut Data, id: EntityId) -> Self {
        EntityMut { data, id }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Read access to the same entity.
    pub fn read(&self) -> Option<EntityRef<'_>> {
        self.data.entity(self.id)
    }

    /// Assign a value. Fields coerce it to their native representation;
    /// groups and lists distribute it over their children.
    pub fn set(&mut self, value: impl Into<Json>) -> &mut Self {
        self.data.assign(self.id, value.into());
        self
    }

    /// Return to the kind's empty value. Lists shrink to their floor.
    pub fn clear(&mut self) -> &mut Self {
        self.data.clear(self.id);
        self
    }

    /// Apply the schema default, or clear when there is none, then re-apply
    /// descendant defaults.
    pub fn reset(&mut self) -> &mut Self {
        self.data.reset(self.id);
        self
    }

    pub fn props_mut(&mut self) -> Option<&mut Json> {
        self.data.node_mut(self.id).and_then(|node| node.props.as_mut())
    }

    pub fn set_props(&mut self, props: impl Into<Json>) -> &mut Self {
        if let Some(node) = self.data.node_mut(self.id) {
            node.props = Some(props.into());
        }
        self
    }

    /// Relative navigation, as [`EntityRef::tread`], yielding a write handle.
    pub fn tread(self, backtrack: usize, path: impl Into<Path>) -> Option<EntityMut<'a>> {
        let EntityMut { data, id } = self;
        let target = data.entity(id)?.tread(backtrack, path)?.id();
        data.entity_mut(target)
    }

    pub fn group_mut(&mut self) -> Option<GroupMut<'_>> {
        if self.data.node(self.id)?.state.kind() != Kind::Group {
            return None;
        }
        Some(GroupMut::new(self.data, self.id))
    }

    pub fn list_mut(&mut self) -> Option<ListMut<'_>> {
        if self.data.node(self.id)?.state.kind() != Kind::List {
            return None;
        }
        Some(ListMut::new(self.data, self.id))
    }
}

impl fmt::Debug for EntityMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMut").field("id", &self.id).finish()
    }
}
