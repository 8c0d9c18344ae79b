//! # Check Subcommand
//!
//! Reports whether the tree is valid. When it is not, prints the root's
//! nested error report.

use anyhow::Result;
use clap::Args;

use crate::{build_tree, render, TreeArgs};

/// Arguments for the `formtree check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub tree: TreeArgs,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when valid, 1 when invalid.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let data = build_tree(&args.tree)?;
    let root = data.root();
    match root.errors() {
        None if root.valid() => {
            println!("OK: tree is valid");
            Ok(0)
        }
        None => {
            // The value itself fails its kind's structural check.
            println!("INVALID: value does not conform");
            Ok(1)
        }
        Some(errors) => {
            println!("INVALID:");
            println!("{}", render(&errors, args.tree.compact)?);
            Ok(1)
        }
    }
}
