// Copyright 2025 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::groups::{SetMethod, SpecGroup, parse_specs};
use crate::parse::{SelectorSyntaxError, SelectorToken};

///
/// The nodes a lookup resolved a selector to.
///
/// `matched` and `selected` are carried through the algebra independently: nothing here assumes
/// any relationship between them.
///
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LookupResult<N> {
    pub matched: Vec<N>,
    pub selected: Vec<N>,
}

impl<N> LookupResult<N> {
    pub fn new(matched: Vec<N>, selected: Vec<N>) -> LookupResult<N> {
        LookupResult { matched, selected }
    }

    pub fn empty() -> LookupResult<N> {
        LookupResult::new(vec![], vec![])
    }
}

impl<N: Eq + Hash + Clone> LookupResult<N> {
    /// See `intersect_ordered`.
    pub fn intersection(results: &[LookupResult<N>]) -> LookupResult<N> {
        LookupResult::new(
            intersect_ordered(&Self::matched_of(results)),
            intersect_ordered(&Self::selected_of(results)),
        )
    }

    /// See `union_ordered`.
    pub fn union(results: &[LookupResult<N>]) -> LookupResult<N> {
        LookupResult::new(
            union_ordered(&Self::matched_of(results)),
            union_ordered(&Self::selected_of(results)),
        )
    }

    /// See `difference_ordered`.
    pub fn difference(&self, other: &LookupResult<N>) -> LookupResult<N> {
        LookupResult::new(
            difference_ordered(&self.matched, &other.matched),
            difference_ordered(&self.selected, &other.selected),
        )
    }

    fn matched_of(results: &[LookupResult<N>]) -> Vec<&[N]> {
        results.iter().map(|r| r.matched.as_slice()).collect()
    }

    fn selected_of(results: &[LookupResult<N>]) -> Vec<&[N]> {
        results.iter().map(|r| r.selected.as_slice()).collect()
    }
}

///
/// The elements of the first sequence (in its order) which are present in every other sequence.
///
/// Intersecting no sequences at all produces an empty sequence.
///
pub fn intersect_ordered<N: Eq + Hash + Clone>(sequences: &[&[N]]) -> Vec<N> {
    let Some((first, rest)) = sequences.split_first() else {
        return vec![];
    };
    let rest = rest
        .iter()
        .map(|sequence| sequence.iter().collect::<HashSet<_>>())
        .collect::<Vec<_>>();
    first
        .iter()
        .filter(|item| rest.iter().all(|members| members.contains(item)))
        .cloned()
        .collect()
}

///
/// The concatenation of all sequences, keeping only the first occurrence of each element.
///
pub fn union_ordered<N: Eq + Hash + Clone>(sequences: &[&[N]]) -> Vec<N> {
    sequences
        .iter()
        .flat_map(|sequence| sequence.iter().cloned())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

///
/// The elements of `keep` (in its order) which do not appear in `remove`.
///
pub fn difference_ordered<N: Eq + Hash + Clone>(keep: &[N], remove: &[N]) -> Vec<N> {
    let remove = remove.iter().collect::<HashSet<_>>();
    keep.iter()
        .filter(|item| !remove.contains(item))
        .cloned()
        .collect()
}

///
/// A failure while applying a selector string: either the string itself was malformed, or the
/// lookup failed. Lookup errors are passed through untouched.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ApplyError<E> {
    Syntax(SelectorSyntaxError),
    Lookup(E),
}

impl<E> From<SelectorSyntaxError> for ApplyError<E> {
    fn from(err: SelectorSyntaxError) -> Self {
        ApplyError::Syntax(err)
    }
}

impl<E: fmt::Display> fmt::Display for ApplyError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyError::Syntax(err) => write!(f, "{err}"),
            ApplyError::Lookup(err) => write!(f, "{err}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for ApplyError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApplyError::Syntax(err) => Some(err),
            ApplyError::Lookup(err) => Some(err),
        }
    }
}

///
/// Resolves each group with `lookup` (which is called exactly once per selector, in order), and
/// unions the group results left to right.
///
pub(crate) fn apply_groups<N, E, F>(
    groups: &[SpecGroup],
    lookup: &mut F,
) -> Result<LookupResult<N>, E>
where
    N: Eq + Hash + Clone,
    F: FnMut(&SelectorToken) -> Result<LookupResult<N>, E>,
{
    let mut group_results = Vec::with_capacity(groups.len());
    for group in groups {
        let results = group
            .selectors
            .iter()
            .map(|selector| {
                trace!("Looking up selector `{}`.", selector.raw);
                lookup(selector)
            })
            .collect::<Result<Vec<_>, E>>()?;
        group_results.push(match group.method {
            SetMethod::Intersect => LookupResult::intersection(&results),
            // A lone selector's result, which the final union would dedupe regardless.
            SetMethod::None => LookupResult::union(&results),
        });
    }

    let result = LookupResult::union(&group_results);
    debug!(
        "Applied {} selector group(s): {} matched, {} selected.",
        groups.len(),
        result.matched.len(),
        result.selected.len()
    );
    Ok(result)
}

///
/// Parses `text` and resolves it with a fallible `lookup`. The whole string is parsed before
/// `lookup` is first called, so a syntax error never leaves a partial application behind.
///
pub fn try_apply_spec<N, E, F>(text: &str, mut lookup: F) -> Result<LookupResult<N>, ApplyError<E>>
where
    N: Eq + Hash + Clone,
    F: FnMut(&SelectorToken) -> Result<LookupResult<N>, E>,
{
    let groups = parse_specs(text)?;
    apply_groups(&groups, &mut lookup).map_err(ApplyError::Lookup)
}

///
/// Parses `text` and resolves it with `lookup`: comma-joined selectors are intersected, and
/// whitespace-separated groups are unioned.
///
pub fn apply_spec<N, F>(text: &str, mut lookup: F) -> Result<LookupResult<N>, SelectorSyntaxError>
where
    N: Eq + Hash + Clone,
    F: FnMut(&SelectorToken) -> LookupResult<N>,
{
    try_apply_spec(text, |selector| Ok::<_, Infallible>(lookup(selector))).map_err(|e| match e {
        ApplyError::Syntax(err) => err,
        ApplyError::Lookup(never) => match never {},
    })
}
