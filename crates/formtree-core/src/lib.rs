//! # formtree-core — Foundational Types for formtree
//!
//! This crate is the leaf of the formtree crate graph. It defines the value
//! type every entity reads and writes, the structural comparisons that back
//! rule evaluation, and the path grammar used to address entities in a tree.
//!
//! ## Key Design Principles
//!
//! 1. **One owned value type.** [`Json`] is an owned tree with `f64` numbers,
//!    so a number field can hold `NaN` while the user is mid-edit. Conversion
//!    to `serde_json::Value` maps non-finite numbers to `null`.
//!
//! 2. **Superset-dominates comparison.** [`includes`] is asymmetric: numbers
//!    compare with `>=`, strings by substring, arrays by index, objects by
//!    key. [`equals`] is inclusion in both directions.
//!
//! 3. **Acyclic by construction.** `Json` owns its children, so a cyclic value
//!    cannot be built. The structural helpers need no cycle guard and cannot
//!    fail.
//!
//! 4. **Paths are typed.** A [`Path`] is a sequence of [`Segment`]s, either a
//!    group content name or a list index. Dot strings parse into paths with
//!    pure-digit segments read as indices.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `formtree-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod json;
pub mod path;
pub mod structural;

pub use error::JsonError;
pub use json::{Json, Map};
pub use path::{Path, Segment};
pub use structural::{deep_clone, equals, includes, is_json};
