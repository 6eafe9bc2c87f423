//! The mupl Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::{fs, process};

use clap::Parser;

use crate::ast::{Ast, BuildOptions};
use crate::cli::args::{Command, MuplArgs};
use crate::encoding::IdentifierEncoder;
use crate::errors::{print_error, SourceContext};
use crate::pipeline::LoweringPipeline;

pub mod args;

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    init_logging();
    let args = MuplArgs::parse();
    let pipeline = LoweringPipeline::new(BuildOptions {
        max_depth: args.max_depth,
    });

    match args.command {
        Command::Ast {
            input,
            json,
            encode_names,
        } => {
            let mut asts = lower_or_exit(&pipeline, &input);
            if encode_names {
                let mut encoder = IdentifierEncoder::new();
                asts = asts.iter().map(|ast| ast.encode_names(&mut encoder)).collect();
            }
            if json {
                print_json(&asts);
            } else {
                print_ast(&asts);
            }
        }

        Command::Check { input } => {
            let asts = lower_or_exit(&pipeline, &input);
            println!("ok: {} form(s)", asts.len());
        }

        Command::Encode { identifiers } => {
            let mut encoder = IdentifierEncoder::new();
            for identifier in &identifiers {
                println!("{} -> {}", identifier, encoder.encode(identifier));
            }
        }
    }
}

fn init_logging() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================================================
// INPUT HANDLING
// ============================================================================

/// Input starting with `(` is source text; anything else names a file.
fn load_source(input: &str) -> Result<SourceContext, std::io::Error> {
    if input.trim_start().starts_with('(') {
        return Ok(SourceContext::inline(input));
    }
    let content = fs::read_to_string(input)?;
    Ok(SourceContext::from_file(input, content))
}

fn lower_or_exit(pipeline: &LoweringPipeline, input: &str) -> Vec<Ast> {
    let source = load_source(input).unwrap_or_else(|e| {
        eprintln!("Error: failed to read '{}': {}", input, e);
        process::exit(1);
    });
    pipeline.lower(&source).unwrap_or_else(|e| {
        print_error(e);
        process::exit(1);
    })
}

// ============================================================================
// OUTPUT FUNCTIONS
// ============================================================================

fn print_ast(asts: &[Ast]) {
    if asts.is_empty() {
        println!("(empty)");
        return;
    }

    for ast in asts {
        println!("{}", ast.pretty());
    }
}

fn print_json(asts: &[Ast]) {
    match serde_json::to_string_pretty(asts) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: failed to serialize AST: {}", e);
            process::exit(1);
        }
    }
}
