//! # formtree-cli — Command Line Front End
//!
//! Provides the `formtree` binary. Every subcommand loads a literal schema,
//! builds the entity tree, optionally assigns a value document to the root,
//! and reports on the result:
//!
//! ```bash
//! formtree check --schema form.yaml --value answers.json
//! formtree value --schema form.yaml --value answers.json
//! formtree tread --schema form.yaml --value answers.json list.0.name
//! ```
//!
//! Schemas and documents are JSON or YAML, chosen by file extension
//! (`.yaml`/`.yml` read as YAML, anything else as JSON).
//!
//! ## Exit Codes
//!
//! `0` when the tree (or treaded entity) is valid, `1` when it is invalid or
//! the path resolves to nothing, `2` on operational errors such as unreadable
//! files or malformed schemas.

pub mod check;
pub mod tread;
pub mod value;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use formtree_engine::{Data, Json, Schema};

/// Inputs shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Schema file (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Document assigned to the root after construction.
    #[arg(long, value_name = "FILE")]
    pub value: Option<PathBuf>,

    /// Print JSON on a single line.
    #[arg(long)]
    pub compact: bool,
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Load and parse a schema file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let text = read(path)?;
    let schema = if is_yaml(path) {
        Schema::from_yaml_str(&text)
    } else {
        Schema::from_json_str(&text)
    };
    let schema = schema.with_context(|| format!("invalid schema in {}", path.display()))?;
    tracing::info!(path = %path.display(), kind = %schema.kind(), "loaded schema");
    Ok(schema)
}

/// Load a value document.
pub fn load_value(path: &Path) -> Result<Json> {
    let text = read(path)?;
    let value: serde_json::Value = if is_yaml(path) {
        serde_yaml::from_str(&text).with_context(|| format!("invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))?
    };
    Ok(value.into())
}

/// Build the tree and assign the value document, if any.
pub fn build_tree(args: &TreeArgs) -> Result<Data> {
    let mut data = Data::new(load_schema(&args.schema)?);
    if let Some(path) = &args.value {
        let value = load_value(path)?;
        data.root_mut().set(value);
        tracing::debug!(path = %path.display(), "assigned value document");
    }
    tracing::debug!(entities = data.entity_count(), "tree built");
    Ok(data)
}

/// Render `value` as JSON text, pretty unless `compact`.
pub fn render<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    text.context("failed to serialize output")
}
