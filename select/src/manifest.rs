// Copyright 2025 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

use std::fs;
use std::path::Path;

use log::warn;
use selectors::{LookupResult, SelectorToken, SelectorType};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct SourceRef {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) table: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct ManifestNode {
    pub(crate) unique_id: String,
    pub(crate) fqn: Vec<String>,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    #[serde(default)]
    pub(crate) source: Option<SourceRef>,
}

///
/// A flat list of nodes, used to resolve selectors without any knowledge of the edges between
/// them.
///
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct Manifest {
    pub(crate) nodes: Vec<ManifestNode>,
}

impl Manifest {
    pub(crate) fn parse(content: &str, path: &Path) -> Result<Manifest, String> {
        serde_json::from_str(content)
            .map_err(|e| format!("Failed to parse manifest {}: {e}", path.display()))
    }

    pub(crate) fn load(path: &Path) -> Result<Manifest, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read manifest {}: {e}", path.display()))?;
        Manifest::parse(&content, path)
    }

    ///
    /// Resolves a selector to the unique ids of the nodes it matches, in manifest order.
    ///
    /// The manifest has no edges, so parent and child selection cannot be expanded: `selected` is
    /// always the same as `matched`.
    ///
    pub(crate) fn lookup(&self, selector: &SelectorToken) -> LookupResult<String> {
        if selector.select_parents || selector.select_children {
            warn!(
                "Selector `{}` asks for parents or children, but the manifest has no edges: \
                 only directly matching nodes will be selected.",
                selector.raw
            );
        }
        let matched = self
            .nodes
            .iter()
            .filter(|node| matches(node, selector))
            .map(|node| node.unique_id.clone())
            .collect::<Vec<_>>();
        LookupResult::new(matched.clone(), matched)
    }
}

fn matches(node: &ManifestNode, selector: &SelectorToken) -> bool {
    match selector.selector_type {
        SelectorType::Fqn => {
            let parts = selector.value_parts().collect::<Vec<_>>();
            if selector.select_at {
                node.fqn == parts
            } else {
                // A bare name matches the last component, and a dotted value matches a prefix.
                node.fqn.last().is_some_and(|name| *name == selector.selector_value)
                    || fqn_starts_with(&node.fqn, &parts)
            }
        }
        SelectorType::Tag => node.tags.iter().any(|tag| *tag == selector.selector_value),
        SelectorType::Source => {
            let Some(source) = &node.source else {
                return false;
            };
            match selector.selector_value.split_once('.') {
                Some((name, table)) => {
                    source.name == name && source.table.as_deref() == Some(table)
                }
                None => source.name == selector.selector_value,
            }
        }
    }
}

fn fqn_starts_with(fqn: &[String], prefix: &[&str]) -> bool {
    fqn.len() >= prefix.len() && fqn.iter().zip(prefix).all(|(part, p)| part == p)
}
