//! # Tread Subcommand
//!
//! Resolves one path and describes the entity found there: kind, value,
//! validity, disabled state, resolved rules, and errors.

use anyhow::Result;
use clap::Args;
use formtree_engine::{EntityRef, Errors, Json, Kind, Path};
use serde::Serialize;

use crate::{build_tree, render, TreeArgs};

/// Arguments for the `formtree tread` subcommand.
#[derive(Args, Debug)]
pub struct TreadArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Dot-separated path, e.g. `list.0.name`. Omit for the root.
    #[arg(value_name = "PATH", default_value = "")]
    pub path: String,
}

/// What `formtree tread` prints about an entity.
#[derive(Debug, Serialize)]
pub struct EntityReport {
    pub path: String,
    pub kind: Kind,
    pub value: Json,
    pub empty: bool,
    pub valid: bool,
    pub disabled: bool,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Errors>,
}

impl EntityReport {
    pub fn of(entity: EntityRef<'_>) -> Self {
        EntityReport {
            path: entity.path().to_string(),
            kind: entity.kind(),
            value: entity.value(),
            empty: entity.empty(),
            valid: entity.valid(),
            disabled: entity.disabled(),
            required: entity.rules().common().required,
            errors: entity.errors(),
        }
    }
}

/// Execute the tread subcommand.
///
/// Returns exit code: 0 when the entity is valid, 1 when it is invalid or
/// the path resolves to nothing.
pub fn run_tread(args: &TreadArgs) -> Result<u8> {
    let data = build_tree(&args.tree)?;
    let path = Path::from(args.path.as_str());
    let Some(entity) = data.tread(&path) else {
        println!("NOT FOUND: {path}");
        return Ok(1);
    };
    let report = EntityReport::of(entity);
    println!("{}", render(&report, args.tree.compact)?);
    Ok(if report.valid { 0 } else { 1 })
}
