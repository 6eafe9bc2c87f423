//! Defines the command-line arguments and subcommands for the mupl CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};

use crate::ast::BuildOptions;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "mupl",
    version,
    about = "Lowers mupl source into a validated AST and encodes identifiers for code generation."
)]
pub struct MuplArgs {
    /// Maximum nesting depth accepted while lowering.
    #[arg(long, global = true, default_value_t = BuildOptions::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the lowered AST for each top-level form.
    Ast {
        /// Source text starting with `(`, or a path to a source file.
        input: String,
        /// Print the AST as JSON instead of an s-expression.
        #[arg(long)]
        json: bool,
        /// Encode every name as a safe target identifier before printing.
        #[arg(long)]
        encode_names: bool,
    },
    /// Lower the input and report success without printing the AST.
    Check {
        /// Source text starting with `(`, or a path to a source file.
        input: String,
    },
    /// Print the safe target identifier for each argument.
    Encode {
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
}
