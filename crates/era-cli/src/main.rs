// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Era compiler command-line interface.
//!
//! This is the main entry point for the `era` command. It loads a source
//! file, runs the front end, and prints either the requested dump or a
//! highlighted diagnostic.

use std::fs;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use era_core::Compiler;
use era_core::source_analysis::dump_tokens;
use tracing_subscriber::EnvFilter;

/// Era: a small imperative language with register/assembly interop
#[derive(Debug, Parser)]
#[command(name = "era")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tokenize a source file and print the token dump
    Tokens {
        /// Source file to tokenize
        path: Utf8PathBuf,
    },

    /// Parse a source file and print the AST dump
    Parse {
        /// Source file to parse
        path: Utf8PathBuf,
    },

    /// Check a source file for errors without printing the tree
    Check {
        /// Source file to check
        path: Utf8PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(command = ?cli.command, "era invoked");

    let result = match &cli.command {
        Command::Tokens { path } => tokens(path),
        Command::Parse { path } => parse(path),
        Command::Check { path } => check(path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Wires `-v` flags to a tracing env-filter subscriber.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("era={default_level},era_core={default_level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads a source file into a compiler, normalizing line endings.
fn load(path: &Utf8PathBuf) -> Result<Compiler, String> {
    let text =
        fs::read_to_string(path).map_err(|error| format!("era: cannot read {path}: {error}"))?;
    Ok(Compiler::new(&text))
}

fn tokens(path: &Utf8PathBuf) -> Result<(), String> {
    let mut compiler = load(path)?;
    match compiler.tokenize() {
        Ok(tokens) => {
            println!("{}", dump_tokens(&tokens));
            Ok(())
        }
        Err(error) => Err(compiler.render_error(&error.into())),
    }
}

fn parse(path: &Utf8PathBuf) -> Result<(), String> {
    let mut compiler = load(path)?;
    match compiler.parse() {
        Ok(root) => {
            println!("{}", root.to_debug_string());
            Ok(())
        }
        Err(error) => Err(compiler.render_error(&error)),
    }
}

fn check(path: &Utf8PathBuf) -> Result<(), String> {
    let mut compiler = load(path)?;
    match compiler.compile() {
        Ok(program) => {
            println!(
                "{path}: ok ({} annotations, {} data, {} modules, {} routines{})",
                program.annotations.len(),
                program.data.len(),
                program.modules.len(),
                program.routines.len(),
                if program.code.is_some() { ", code" } else { "" },
            );
            Ok(())
        }
        Err(error) => Err(compiler.render_error(&error)),
    }
}
