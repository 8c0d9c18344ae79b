//! # formtree CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use formtree_cli::check::{run_check, CheckArgs};
use formtree_cli::tread::{run_tread, TreadArgs};
use formtree_cli::value::{run_value, ValueArgs};

/// formtree: schema-driven entity trees for form data.
///
/// Builds a tree of group, list, text, number, and select entities from a
/// schema, assigns a document to it, and reports what the tree makes of it.
#[derive(Parser, Debug)]
#[command(name = "formtree", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit log lines as JSON objects.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report whether a document satisfies a schema, with nested errors.
    Check(CheckArgs),

    /// Print the value the tree emits for a document.
    Value(ValueArgs),

    /// Describe the entity at a path.
    Tread(TreadArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so stdout stays machine-readable.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    let result = match &cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Value(args) => run_value(args),
        Commands::Tread(args) => run_tread(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
