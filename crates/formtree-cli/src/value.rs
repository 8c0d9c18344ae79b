//! # Value Subcommand
//!
//! Prints the value the tree emits after construction and assignment:
//! defaults applied, coercions done, disabled and empty entities dropped.

use anyhow::Result;
use clap::Args;

use crate::{build_tree, render, TreeArgs};

/// Arguments for the `formtree value` subcommand.
#[derive(Args, Debug)]
pub struct ValueArgs {
    #[command(flatten)]
    pub tree: TreeArgs,
}

/// Execute the value subcommand. Always exits 0 once the tree is built.
pub fn run_value(args: &ValueArgs) -> Result<u8> {
    let data = build_tree(&args.tree)?;
    println!("{}", render(&data.root().value(), args.tree.compact)?);
    Ok(0)
}
