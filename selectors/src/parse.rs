// Copyright 2025 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorType {
    /// A (possibly dotted) fully qualified name. Used when no type prefix is given.
    #[default]
    Fqn,
    /// A label attached to a node.
    Tag,
    /// The origin of a node, optionally followed by `.<sub-resource>`.
    Source,
}

impl SelectorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorType::Fqn => "fqn",
            SelectorType::Tag => "tag",
            SelectorType::Source => "source",
        }
    }
}

impl fmt::Display for SelectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fqn" => Ok(SelectorType::Fqn),
            "tag" => Ok(SelectorType::Tag),
            "source" => Ok(SelectorType::Source),
            other => Err(format!(
                "Unknown selector type `{other}`: expected one of `fqn`, `tag` or `source`."
            )),
        }
    }
}

///
/// A single parsed selector, e.g. `@tag:nightly` or `+a.b.c+`.
///
/// The flags describe what the caller asked for, but it is up to the lookup which resolves the
/// selector to decide what `select_parents` or `select_children` mean for a particular graph.
///
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SelectorToken {
    pub selector_type: SelectorType,
    pub selector_value: String,
    pub select_at: bool,
    pub select_parents: bool,
    pub select_children: bool,
    /// The token exactly as it was written, which callers may use as a key.
    pub raw: String,
}

impl SelectorToken {
    /// The dot-separated components of the value: fqn scopes, or a source and its sub-resource.
    pub fn value_parts(&self) -> impl Iterator<Item = &str> {
        self.selector_value.split('.')
    }
}

impl fmt::Display for SelectorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.select_at {
            f.write_str("@")?;
        }
        if self.select_parents {
            f.write_str("+")?;
        }
        write!(f, "{}:{}", self.selector_type, self.selector_value)?;
        if self.select_children {
            f.write_str("+")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectorSyntaxError {
    /// Nothing was left of the selector once its modifiers and type prefix were removed.
    EmptyValue { selector: String, column: usize },
    /// `@` was combined with a `+` modifier.
    ExclusiveModifiers { selector: String },
}

impl SelectorSyntaxError {
    /// The selector text which failed to parse.
    pub fn selector(&self) -> &str {
        match self {
            SelectorSyntaxError::EmptyValue { selector, .. } => selector,
            SelectorSyntaxError::ExclusiveModifiers { selector } => selector,
        }
    }
}

impl fmt::Display for SelectorSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorSyntaxError::EmptyValue { selector, column } => write!(
                f,
                "Failed to parse selector `{selector}`: expected a non-empty selector value at \
                 column {column}."
            ),
            SelectorSyntaxError::ExclusiveModifiers { selector } => write!(
                f,
                "Failed to parse selector `{selector}`: `@` selects exactly one node, and cannot \
                 be combined with `+` parent or child selection."
            ),
        }
    }
}

impl std::error::Error for SelectorSyntaxError {}

pub(crate) struct SelectorInput<'a> {
    select_at: bool,
    select_parents: bool,
    selector_type: Option<SelectorType>,
    value: &'a str,
    select_children: bool,
}

peg::parser! {
    grammar selector_parser() for str {
        rule at() -> bool = a:"@"? { a.is_some() }

        rule parents() -> bool = p:"+"? { p.is_some() }

        rule children() -> bool = c:"+"? { c.is_some() }

        rule selector_type() -> SelectorType
            = "fqn:" { SelectorType::Fqn }
            / "tag:" { SelectorType::Tag }
            / "source:" { SelectorType::Source }

        // Only a `+` in final position is a modifier: anything before it belongs to the value.
        rule value() -> &'input str
            = quiet!{ s:$((!("+" ![_]) [_])+) { s } }
            / expected!("a non-empty selector value")

        pub(crate) rule selector() -> SelectorInput<'input>
            = select_at:at()
              select_parents:parents()
              selector_type:selector_type()?
              value:value()
              select_children:children()
              ![_] {
                SelectorInput {
                    select_at,
                    select_parents,
                    selector_type,
                    value,
                    select_children,
                }
            }
    }
}

fn validate(token: &str, input: &SelectorInput) -> Result<(), SelectorSyntaxError> {
    if input.select_at && (input.select_parents || input.select_children) {
        return Err(SelectorSyntaxError::ExclusiveModifiers {
            selector: token.to_owned(),
        });
    }
    Ok(())
}

///
/// Parses a single selector token (which should not contain whitespace or commas: see
/// `parse_specs` for splitting a full selector string).
///
pub fn parse_spec(token: &str) -> Result<SelectorToken, SelectorSyntaxError> {
    let input = selector_parser::selector(token).map_err(|e| SelectorSyntaxError::EmptyValue {
        selector: token.to_owned(),
        column: e.location.column,
    })?;
    validate(token, &input)?;

    Ok(SelectorToken {
        selector_type: input.selector_type.unwrap_or_default(),
        selector_value: input.value.to_owned(),
        select_at: input.select_at,
        select_parents: input.select_parents,
        select_children: input.select_children,
        raw: token.to_owned(),
    })
}
