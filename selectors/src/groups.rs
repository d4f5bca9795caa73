// Copyright 2025 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::parse::{SelectorSyntaxError, SelectorToken, parse_spec};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetMethod {
    /// The group's selectors were comma-joined, and their results are intersected.
    Intersect,
    /// The group holds a single selector, whose result is used as-is.
    None,
}

///
/// The selectors produced by one whitespace-delimited token, in the order they were written.
///
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpecGroup {
    pub method: SetMethod,
    pub selectors: Vec<SelectorToken>,
}

impl SpecGroup {
    fn single(selector: SelectorToken) -> SpecGroup {
        SpecGroup {
            method: SetMethod::None,
            selectors: vec![selector],
        }
    }
}

///
/// Splits a selector string on runs of whitespace. Commas and all other selector syntax are left
/// for `parse_specs` to interpret.
///
pub fn split_specs(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

///
/// Parses a full selector string into groups: one per whitespace-delimited token. A token
/// containing commas becomes an `Intersect` group over its non-empty parts.
///
/// Any syntax error aborts the whole parse.
///
pub fn parse_specs(text: &str) -> Result<Vec<SpecGroup>, SelectorSyntaxError> {
    let mut groups = Vec::new();
    for token in split_specs(text) {
        if token.contains(',') {
            let mut selectors = token
                .split(',')
                .filter(|part| !part.is_empty())
                .map(parse_spec)
                .collect::<Result<Vec<_>, _>>()?;
            match selectors.len() {
                // A token of nothing but commas selects nothing, like an empty token would.
                0 => {}
                1 => groups.push(SpecGroup::single(selectors.remove(0))),
                _ => groups.push(SpecGroup {
                    method: SetMethod::Intersect,
                    selectors,
                }),
            }
        } else {
            groups.push(SpecGroup::single(parse_spec(token)?));
        }
    }
    debug!("Parsed {} selector group(s) from `{text}`.", groups.len());
    Ok(groups)
}
