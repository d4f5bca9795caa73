// Copyright 2025 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

mod config;

mod manifest;
#[cfg(test)]
mod manifest_tests;

use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use log::debug;
use selectors::{SelectorSyntaxError, build_spec};

use crate::config::{Config, SelectionOpt};
use crate::manifest::Manifest;

#[derive(Debug)]
enum ExitCode {
    UnknownError = 1,
    InvalidSelector = 2,
}

#[derive(Debug)]
struct ExitError(String, ExitCode);

impl From<SelectorSyntaxError> for ExitError {
    fn from(e: SelectorSyntaxError) -> Self {
        ExitError(e.to_string(), ExitCode::InvalidSelector)
    }
}

impl From<String> for ExitError {
    fn from(s: String) -> Self {
        ExitError(s, ExitCode::UnknownError)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Parse selectors, and print the resulting include/exclude spec as JSON.
    Parse {
        #[command(flatten)]
        selection: SelectionOpt,
    },
    /// Resolve selectors against the nodes of a JSON manifest, and print the matches as JSON.
    Apply {
        /// Path to a manifest of the form `{"nodes": [{"unique_id": ..., "fqn": [...]}]}`.
        #[arg(long)]
        manifest: PathBuf,

        #[command(flatten)]
        selection: SelectionOpt,
    },
}

#[derive(Parser)]
#[command(name = "select")]
struct Opt {
    /// Path to a TOML file whose `[selection]` table provides defaults for the selection flags.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    env_logger::init();

    match execute(Opt::parse()) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{}", err.0);
            exit(err.1 as i32)
        }
    }
}

fn execute(opt: Opt) -> Result<(), ExitError> {
    let config = match &opt.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let output = match opt.command {
        Command::Parse { selection } => {
            let selection = selection.resolve(&config.selection);
            let spec = build_spec(&selection.select, &selection.exclude, selection.hops)?;
            to_json(&spec)?
        }
        Command::Apply {
            manifest,
            selection,
        } => {
            let selection = selection.resolve(&config.selection);
            let spec = build_spec(&selection.select, &selection.exclude, selection.hops)?;
            let manifest = Manifest::load(&manifest)?;
            debug!(
                "Resolving {} include and {} exclude group(s) against {} node(s).",
                spec.include.len(),
                spec.exclude.len(),
                manifest.nodes.len()
            );
            to_json(&spec.select(|selector| manifest.lookup(selector)))?
        }
    };
    println!("{output}");
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to render JSON: {e}"))
}
