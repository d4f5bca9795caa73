// Copyright 2025 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

use std::fs;
use std::path::Path;

use clap::Args;
use log::debug;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) selection: SelectionConfig,
}

/// The `[selection]` table of a config file.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct SelectionConfig {
    pub(crate) select: Option<String>,
    pub(crate) exclude: Option<String>,
    pub(crate) hops: Option<i64>,
}

impl Config {
    pub(crate) fn parse(content: &str, path: &Path) -> Result<Config, String> {
        toml::from_str(content)
            .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))
    }

    pub(crate) fn load(path: &Path) -> Result<Config, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
        let config = Config::parse(&content, path)?;
        debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }
}

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct SelectionOpt {
    /// Selectors for the nodes to include, e.g. `tag:nightly,source:raw +my.model`.
    #[arg(long, short = 's')]
    pub(crate) select: Option<String>,

    /// Selectors for the nodes to exclude from the included nodes.
    #[arg(long)]
    pub(crate) exclude: Option<String>,

    /// How far parent/child selection may travel. Passed through to the resolver unchanged.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) hops: Option<i64>,
}

/// The selection to run with, after flags have been layered over config.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Selection {
    pub(crate) select: String,
    pub(crate) exclude: String,
    pub(crate) hops: i64,
}

impl SelectionOpt {
    pub(crate) fn resolve(&self, config: &SelectionConfig) -> Selection {
        Selection {
            select: self
                .select
                .clone()
                .or_else(|| config.select.clone())
                .unwrap_or_default(),
            exclude: self
                .exclude
                .clone()
                .or_else(|| config.exclude.clone())
                .unwrap_or_default(),
            hops: self.hops.or(config.hops).unwrap_or(0),
        }
    }
}
