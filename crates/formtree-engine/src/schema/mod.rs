//! # Schema Model
//!
//! A [`Schema`] is the immutable description an entity tree is built from.
//! It is a closed set of five kinds: groups of named children, lists of
//! homogeneous items, and text, number, and select fields.
//!
//! Each kind struct is shared behind an `Arc`, so cloning a `Schema` is cheap
//! and every entity keeps a handle on the node it was built from.
//!
//! ## Construction
//!
//! Schemas with computed rules are assembled in code:
//!
//! ```
//! use formtree_engine::{Bound, NumberRules, NumberSchema, Schema};
//!
//! let schema = Schema::group([
//!     ("a", Schema::number()),
//!     ("b", NumberSchema::default()
//!         .with_rules(NumberRules {
//!             max: Some(Bound::inclusive(3.0).into()),
//!             ..Default::default()
//!         })
//!         .into()),
//! ]);
//! assert_eq!(schema.kind().to_string(), "group");
//! ```
//!
//! Literal schemas also import from JSON or YAML, see [`Schema::from_value`].

mod parse;
pub mod rule;
pub mod rules;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use formtree_core::Json;
use serde::{Deserialize, Deserializer, Serialize};

use self::rule::Rule;
use self::rules::{CommonRules, ListRules, NumberRules, SelectRules, TextRules};
use crate::error::SchemaError;
use crate::requirement::Requirement;

/// The five entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Group,
    List,
    Text,
    Number,
    Select,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Group => "group",
            Kind::List => "list",
            Kind::Text => "text",
            Kind::Number => "number",
            Kind::Select => "select",
        })
    }
}

// ─── Kind Schemas ───────────────────────────────────────────────────

/// A fixed set of named children.
#[derive(Debug, Clone, Default)]
pub struct GroupSchema {
    pub contents: BTreeMap<String, Schema>,
    pub default: Option<Rule<Json>>,
    pub props: Option<Json>,
    pub rules: CommonRules,
}

/// A resizable sequence of children sharing one item schema.
#[derive(Debug, Clone)]
pub struct ListSchema {
    pub items: Schema,
    pub default: Option<Rule<Json>>,
    pub props: Option<Json>,
    pub rules: ListRules,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextSchema {
    pub default: Option<Rule<Json>>,
    pub props: Option<Json>,
    pub rules: TextRules,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NumberSchema {
    pub default: Option<Rule<Json>>,
    pub props: Option<Json>,
    pub rules: NumberRules,
}

/// A multi-choice field. The value is the array of chosen options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectSchema {
    pub options: Vec<Json>,
    pub default: Option<Rule<Json>>,
    pub props: Option<Json>,
    pub rules: SelectRules,
}

macro_rules! kind_builders {
    ($($schema:ident => $rules:ty, $variant:ident;)+) => {$(
        impl $schema {
            pub fn with_default(mut self, default: impl Into<Json>) -> Self {
                self.default = Some(Rule::Literal(default.into()));
                self
            }

            pub fn with_default_rule(mut self, default: Rule<Json>) -> Self {
                self.default = Some(default);
                self
            }

            pub fn with_props(mut self, props: impl Into<Json>) -> Self {
                self.props = Some(props.into());
                self
            }

            pub fn with_rules(mut self, rules: $rules) -> Self {
                self.rules = rules;
                self
            }
        }

        impl From<$schema> for Schema {
            fn from(schema: $schema) -> Self {
                Schema::$variant(Arc::new(schema))
            }
        }
    )+};
}

kind_builders! {
    GroupSchema => CommonRules, Group;
    ListSchema => ListRules, List;
    TextSchema => TextRules, Text;
    NumberSchema => NumberRules, Number;
    SelectSchema => SelectRules, Select;
}

impl ListSchema {
    pub fn new(items: impl Into<Schema>) -> Self {
        ListSchema {
            items: items.into(),
            default: None,
            props: None,
            rules: ListRules::default(),
        }
    }
}

impl SelectSchema {
    pub fn new<I, T>(options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Json>,
    {
        SelectSchema {
            options: options.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

// ─── Schema ─────────────────────────────────────────────────────────

/// Immutable description of one entity and, for containers, its children.
#[derive(Debug, Clone)]
pub enum Schema {
    Group(Arc<GroupSchema>),
    List(Arc<ListSchema>),
    Text(Arc<TextSchema>),
    Number(Arc<NumberSchema>),
    Select(Arc<SelectSchema>),
}

impl Schema {
    pub fn text() -> Self {
        TextSchema::default().into()
    }

    pub fn number() -> Self {
        NumberSchema::default().into()
    }

    pub fn select<I, T>(options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Json>,
    {
        SelectSchema::new(options).into()
    }

    pub fn group<I, K>(contents: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        GroupSchema {
            contents: contents.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..Default::default()
        }
        .into()
    }

    pub fn list(items: impl Into<Schema>) -> Self {
        ListSchema::new(items).into()
    }

    pub fn kind(&self) -> Kind {
        match self {
            Schema::Group(_) => Kind::Group,
            Schema::List(_) => Kind::List,
            Schema::Text(_) => Kind::Text,
            Schema::Number(_) => Kind::Number,
            Schema::Select(_) => Kind::Select,
        }
    }

    /// The declared default, if any.
    pub fn default_rule(&self) -> Option<&Rule<Json>> {
        match self {
            Schema::Group(s) => s.default.as_ref(),
            Schema::List(s) => s.default.as_ref(),
            Schema::Text(s) => s.default.as_ref(),
            Schema::Number(s) => s.default.as_ref(),
            Schema::Select(s) => s.default.as_ref(),
        }
    }

    pub fn props(&self) -> Option<&Json> {
        match self {
            Schema::Group(s) => s.props.as_ref(),
            Schema::List(s) => s.props.as_ref(),
            Schema::Text(s) => s.props.as_ref(),
            Schema::Number(s) => s.props.as_ref(),
            Schema::Select(s) => s.props.as_ref(),
        }
    }

    pub fn common_rules(&self) -> &CommonRules {
        match self {
            Schema::Group(s) => &s.rules,
            Schema::List(s) => &s.rules.common,
            Schema::Text(s) => &s.rules.common,
            Schema::Number(s) => &s.rules.common,
            Schema::Select(s) => &s.rules.common,
        }
    }

    // ─── Builders ───────────────────────────────────────────────────

    pub fn with_default(self, default: impl Into<Json>) -> Self {
        self.with_default_rule(Rule::Literal(default.into()))
    }

    /// Default computed from the entity when it is reset.
    pub fn with_default_rule(mut self, default: Rule<Json>) -> Self {
        let default = Some(default);
        match &mut self {
            Schema::Group(s) => Arc::make_mut(s).default = default,
            Schema::List(s) => Arc::make_mut(s).default = default,
            Schema::Text(s) => Arc::make_mut(s).default = default,
            Schema::Number(s) => Arc::make_mut(s).default = default,
            Schema::Select(s) => Arc::make_mut(s).default = default,
        }
        self
    }

    pub fn with_props(mut self, props: impl Into<Json>) -> Self {
        let props = Some(props.into());
        match &mut self {
            Schema::Group(s) => Arc::make_mut(s).props = props,
            Schema::List(s) => Arc::make_mut(s).props = props,
            Schema::Text(s) => Arc::make_mut(s).props = props,
            Schema::Number(s) => Arc::make_mut(s).props = props,
            Schema::Select(s) => Arc::make_mut(s).props = props,
        }
        self
    }

    pub fn disabled(self, rule: impl Into<Rule<bool>>) -> Self {
        self.with_common(|rules| rules.disabled = Some(rule.into()))
    }

    pub fn invalid(self, rule: impl Into<Rule<bool>>) -> Self {
        self.with_common(|rules| rules.invalid = Some(rule.into()))
    }

    pub fn required(self, rule: impl Into<Rule<bool>>) -> Self {
        self.with_common(|rules| rules.required = Some(rule.into()))
    }

    pub fn requires(self, rule: impl Into<Rule<Requirement>>) -> Self {
        self.with_common(|rules| rules.requires = Some(rule.into()))
    }

    fn with_common(mut self, edit: impl FnOnce(&mut CommonRules)) -> Self {
        match &mut self {
            Schema::Group(s) => edit(&mut Arc::make_mut(s).rules),
            Schema::List(s) => edit(&mut Arc::make_mut(s).rules.common),
            Schema::Text(s) => edit(&mut Arc::make_mut(s).rules.common),
            Schema::Number(s) => edit(&mut Arc::make_mut(s).rules.common),
            Schema::Select(s) => edit(&mut Arc::make_mut(s).rules.common),
        }
        self
    }

    // ─── Literal Import ─────────────────────────────────────────────

    /// Build a schema from its literal form.
    ///
    /// The node's `type` (`group`, `list`, `field`) and, for fields, its
    /// `subtype` (`text`, `number`, `select`) select the kind. Unknown or
    /// missing tags are configuration errors.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SchemaError> {
        parse::parse_node(value, "$")
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(formtree_core::JsonError::from)?;
        Self::from_value(value)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        let value: serde_json::Value = serde_yaml::from_str(text)?;
        Self::from_value(value)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Schema::from_value(value).map_err(serde::de::Error::custom)
    }
}
