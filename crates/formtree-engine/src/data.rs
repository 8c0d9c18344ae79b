//! # Root Container
//!
//! [`Data`] owns one entity tree. It builds the tree from a [`Schema`],
//! stores every entity, resolves absolute paths, and holds the two lifecycle
//! hooks:
//!
//! - `on_entity_construct` fires once per entity, children before their
//!   container, including list items created later by a resize.
//! - `on_field_change` fires after a write to a text, number, or select field
//!   changes it. It is installed only after the initial tree is built, so
//!   defaults applied during construction never notify.
//!
//! A write is judged a change unless the new and previous values are both
//! valid and structurally equal, or are both invalid.
//!
//! ## Example
//!
//! ```
//! use formtree_engine::{Data, Schema};
//!
//! let mut data = Data::new(Schema::group([("a", Schema::number().with_default(5))]));
//! assert_eq!(data.root().value().to_string(), r#"{"a":5}"#);
//!
//! if let Some(mut a) = data.tread_mut("a") {
//!     a.set("7");
//! }
//! assert_eq!(data.root().value().to_string(), r#"{"a":7}"#);
//! ```

use std::fmt;
use std::sync::Arc;

use formtree_core::{Json, Path};

use crate::arena::{Arena, EntityId};
use crate::entity::node::{Node, State};
use crate::entity::{EntityMut, EntityRef};
use crate::schema::Schema;

/// Lifecycle hook receiving the entity concerned.
pub type Hook = Box<dyn FnMut(EntityRef<'_>)>;

/// Construction options for [`Data`].
#[derive(Default)]
pub struct DataOptions {
    on_entity_construct: Option<Hook>,
    on_field_change: Option<Hook>,
    props: Option<Json>,
}

impl DataOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_entity_construct(mut self, hook: impl FnMut(EntityRef<'_>) + 'static) -> Self {
        self.on_entity_construct = Some(Box::new(hook));
        self
    }

    pub fn on_field_change(mut self, hook: impl FnMut(EntityRef<'_>) + 'static) -> Self {
        self.on_field_change = Some(Box::new(hook));
        self
    }

    /// Opaque payload stored on the container.
    pub fn props(mut self, props: impl Into<Json>) -> Self {
        self.props = Some(props.into());
        self
    }
}

impl fmt::Debug for DataOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataOptions")
            .field("on_entity_construct", &self.on_entity_construct.is_some())
            .field("on_field_change", &self.on_field_change.is_some())
            .field("props", &self.props)
            .finish()
    }
}

/// Root container owning one entity tree.
pub struct Data {
    root: Node,
    arena: Arena,
    props: Option<Json>,
    on_entity_construct: Option<Hook>,
    on_field_change: Option<Hook>,
}

impl Data {
    pub fn new(schema: impl Into<Schema>) -> Self {
        Self::with_options(schema, DataOptions::default())
    }

    pub fn with_options(schema: impl Into<Schema>, options: DataOptions) -> Self {
        let schema = schema.into();
        let mut data = Data {
            root: Node::vacant(&schema, None),
            arena: Arena::default(),
            props: options.props,
            on_entity_construct: options.on_entity_construct,
            on_field_change: None,
        };
        data.build(EntityId::ROOT);
        data.on_field_change = options.on_field_change;
        data
    }

    pub fn root(&self) -> EntityRef<'_> {
        EntityRef::new(self, EntityId::ROOT, &self.root)
    }

    pub fn root_mut(&mut self) -> EntityMut<'_> {
        EntityMut::new(self, EntityId::ROOT)
    }

    /// The entity behind `id`, unless it has been destroyed.
    pub fn entity(&self, id: EntityId) -> Option<EntityRef<'_>> {
        self.node(id).map(|node| EntityRef::new(self, id, node))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        self.node(id)?;
        Some(EntityMut::new(self, id))
    }

    /// Resolve an absolute path: names step into group contents, indices
    /// into list items.
    pub fn tread(&self, path: impl Into<Path>) -> Option<EntityRef<'_>> {
        self.resolve(&path.into())
    }

    pub fn tread_mut(&mut self, path: impl Into<Path>) -> Option<EntityMut<'_>> {
        let id = self.resolve(&path.into())?.id();
        self.entity_mut(id)
    }

    pub fn props(&self) -> Option<&Json> {
        self.props.as_ref()
    }

    pub fn props_mut(&mut self) -> Option<&mut Json> {
        self.props.as_mut()
    }

    /// Number of live entities, root included.
    pub fn entity_count(&self) -> usize {
        1 + self.arena.len()
    }

    // ─── Storage ────────────────────────────────────────────────────

    pub(crate) fn node(&self, id: EntityId) -> Option<&Node> {
        if id.is_root() {
            Some(&self.root)
        } else {
            self.arena.get(id)
        }
    }

    pub(crate) fn node_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        if id.is_root() {
            Some(&mut self.root)
        } else {
            self.arena.get_mut(id)
        }
    }

    pub(crate) fn state_mut(&mut self, id: EntityId) -> Option<&mut State> {
        self.node_mut(id).map(|node| &mut node.state)
    }

    /// Allocate an unbuilt child of `container`.
    pub(crate) fn allocate(&mut self, schema: &Schema, container: EntityId) -> EntityId {
        self.arena.insert(Node::vacant(schema, Some(container)))
    }

    /// Remove `id` and all of its descendants.
    pub(crate) fn destroy(&mut self, id: EntityId) {
        if let Some(node) = self.arena.remove(id) {
            for child in node.state.children() {
                self.destroy(child);
            }
        }
    }

    // ─── Construction ───────────────────────────────────────────────

    /// Build the children of an allocated node, apply its default, and
    /// announce it.
    pub(crate) fn build(&mut self, id: EntityId) {
        let group = match self.node(id).map(|node| &node.state) {
            Some(State::Group { schema, .. }) => Some(Arc::clone(schema)),
            Some(_) => None,
            None => return,
        };
        if let Some(group) = group {
            for (name, child_schema) in &group.contents {
                let child = self.allocate(child_schema, id);
                if let Some(State::Group { contents, .. }) = self.state_mut(id) {
                    contents.insert(name.clone(), child);
                }
                self.build(child);
            }
        }

        if let Some(floor) = self.entity(id).and_then(|e| e.list()).map(|l| l.rules().floor()) {
            for _ in 0..floor {
                if self.push_item(id).is_none() {
                    break;
                }
            }
        }

        if self.node(id).is_some_and(|node| node.state.default_rule().is_some()) {
            self.reset(id);
        }

        if let Some(entity) = self.entity(id) {
            tracing::debug!(kind = %entity.kind(), path = %entity.path(), "entity constructed");
        }
        self.notify_constructed(id);
    }

    // ─── Hooks ──────────────────────────────────────────────────────

    fn notify_constructed(&mut self, id: EntityId) {
        let Some(mut hook) = self.on_entity_construct.take() else {
            return;
        };
        if let Some(entity) = self.entity(id) {
            hook(entity);
        }
        self.on_entity_construct = Some(hook);
    }

    pub(crate) fn watches_field_changes(&self) -> bool {
        self.on_field_change.is_some()
    }

    pub(crate) fn notify_field_change(&mut self, id: EntityId) {
        let Some(mut hook) = self.on_field_change.take() else {
            return;
        };
        if let Some(entity) = self.entity(id) {
            hook(entity);
        }
        self.on_field_change = Some(hook);
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("root", &self.root().kind())
            .field("entities", &self.entity_count())
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}
