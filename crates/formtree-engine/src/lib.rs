//! # formtree-engine — Reactive Entity Trees
//!
//! Builds a live tree of entities from a [`Schema`] and answers questions
//! about it: the current value, whether it is valid, which rules fail, which
//! entities are disabled. Every answer is recomputed from the stored values
//! on each read.
//!
//! ```
//! use formtree_engine::{Data, Requirement, Schema};
//!
//! let mut data = Data::new(Schema::group([
//!     ("a", Schema::number()),
//!     ("b", Schema::text().requires(Requirement::exists("a"))),
//! ]));
//! assert!(data.tread("b").is_some_and(|b| b.disabled()));
//!
//! if let Some(mut a) = data.tread_mut("a") {
//!     a.set(3);
//! }
//! assert!(data.tread("b").is_some_and(|b| !b.disabled()));
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Closed set of kinds.** Groups, lists, and text, number, and select
//!    fields. Kind-specific behavior is reached through the `group()`,
//!    `list()`, `text()`, `number()`, and `select()` views, exactly one of
//!    which is populated for any entity.
//!
//! 2. **The tree owns its entities.** [`Data`] stores every entity in an
//!    arena keyed by [`EntityId`]. Parents own children; a child's link to
//!    its container is a plain id used only for lookup.
//!
//! 3. **Nothing derived is cached.** `value`, `valid`, `errors`, `disabled`,
//!    `rules`, and `path` are computed on access, so a read always sees the
//!    latest write.
//!
//! 4. **Rules cannot write.** A computed [`Rule`] receives shared handles
//!    only. Rule evaluation during a read can look anywhere in the tree but
//!    can never change it.
//!
//! 5. **Accept and flag.** Writes always complete. Values that break a rule
//!    are stored and reported through [`Errors`]; only a malformed schema is
//!    an `Err`.
//!
//! ## Crate Policy
//!
//! - Depends only on `formtree-core` among workspace crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

mod arena;
pub mod data;
pub mod entity;
pub mod error;
pub mod requirement;
pub mod schema;

pub use arena::EntityId;
pub use data::{Data, DataOptions, Hook};
pub use entity::errors::{Errors, GroupErrors, ListErrors, NumberErrors, SelectErrors, TextErrors};
pub use entity::group::{GroupMut, GroupRef};
pub use entity::list::{ListMut, ListRef};
pub use entity::number::NumberRef;
pub use entity::select::SelectRef;
pub use entity::text::TextRef;
pub use entity::{EntityMut, EntityRef};
pub use error::SchemaError;
pub use requirement::{Comparison, Requirement};
pub use schema::rule::{apply_rule, Rule};
pub use schema::rules::{
    Bound, CommonRules, ListRules, NumberRules, Pattern, ResolvedCommon, ResolvedListRules,
    ResolvedNumberRules, ResolvedRules, ResolvedSelectRules, ResolvedTextRules, SelectRules,
    TextRules,
};
pub use schema::{GroupSchema, Kind, ListSchema, NumberSchema, Schema, SelectSchema, TextSchema};

pub use formtree_core::{path, Json, Map, Path, Segment};
