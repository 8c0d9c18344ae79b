//! Stored entity state.

use std::collections::BTreeMap;
use std::sync::Arc;

use formtree_core::{deep_clone, Json};

use crate::arena::EntityId;
use crate::schema::rule::Rule;
use crate::schema::rules::CommonRules;
use crate::schema::{GroupSchema, Kind, ListSchema, NumberSchema, Schema, SelectSchema, TextSchema};

pub(crate) struct Node {
    pub(crate) container: Option<EntityId>,
    pub(crate) props: Option<Json>,
    pub(crate) state: State,
}

/// Kind schema paired with the kind's native value, so the two can never
/// disagree.
pub(crate) enum State {
    Group { schema: Arc<GroupSchema>, contents: BTreeMap<String, EntityId> },
    List { schema: Arc<ListSchema>, items: Vec<EntityId> },
    Text { schema: Arc<TextSchema>, value: String },
    Number { schema: Arc<NumberSchema>, value: Option<f64> },
    Select { schema: Arc<SelectSchema>, value: Vec<Json> },
}

impl Node {
    /// A node holding its kind's empty value and no children yet.
    pub(crate) fn vacant(schema: &Schema, container: Option<EntityId>) -> Node {
        let state = match schema {
            Schema::Group(s) => State::Group { schema: Arc::clone(s), contents: BTreeMap::new() },
            Schema::List(s) => State::List { schema: Arc::clone(s), items: Vec::new() },
            Schema::Text(s) => State::Text { schema: Arc::clone(s), value: String::new() },
            Schema::Number(s) => State::Number { schema: Arc::clone(s), value: None },
            Schema::Select(s) => State::Select { schema: Arc::clone(s), value: Vec::new() },
        };
        Node {
            container,
            props: schema.props().map(deep_clone),
            state,
        }
    }
}

impl State {
    pub(crate) fn kind(&self) -> Kind {
        match self {
            State::Group { .. } => Kind::Group,
            State::List { .. } => Kind::List,
            State::Text { .. } => Kind::Text,
            State::Number { .. } => Kind::Number,
            State::Select { .. } => Kind::Select,
        }
    }

    pub(crate) fn schema(&self) -> Schema {
        match self {
            State::Group { schema, .. } => Schema::Group(Arc::clone(schema)),
            State::List { schema, .. } => Schema::List(Arc::clone(schema)),
            State::Text { schema, .. } => Schema::Text(Arc::clone(schema)),
            State::Number { schema, .. } => Schema::Number(Arc::clone(schema)),
            State::Select { schema, .. } => Schema::Select(Arc::clone(schema)),
        }
    }

    pub(crate) fn common_rules(&self) -> &CommonRules {
        match self {
            State::Group { schema, .. } => &schema.rules,
            State::List { schema, .. } => &schema.rules.common,
            State::Text { schema, .. } => &schema.rules.common,
            State::Number { schema, .. } => &schema.rules.common,
            State::Select { schema, .. } => &schema.rules.common,
        }
    }

    pub(crate) fn default_rule(&self) -> Option<&Rule<Json>> {
        match self {
            State::Group { schema, .. } => schema.default.as_ref(),
            State::List { schema, .. } => schema.default.as_ref(),
            State::Text { schema, .. } => schema.default.as_ref(),
            State::Number { schema, .. } => schema.default.as_ref(),
            State::Select { schema, .. } => schema.default.as_ref(),
        }
    }

    /// Direct children in order: group contents by name, list items by index.
    pub(crate) fn children(&self) -> Vec<EntityId> {
        match self {
            State::Group { contents, .. } => contents.values().copied().collect(),
            State::List { items, .. } => items.clone(),
            _ => Vec::new(),
        }
    }
}
