// Copyright 2025 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

use std::convert::Infallible;
use std::hash::Hash;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algebra::{LookupResult, apply_groups};
use crate::groups::{SpecGroup, parse_specs};
use crate::parse::{SelectorSyntaxError, SelectorToken};

///
/// A parsed include/exclude selection. `hops` is not interpreted here: it is passed through for
/// whatever resolves the selection against a graph.
///
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    pub include: Vec<SpecGroup>,
    pub exclude: Vec<SpecGroup>,
    pub hops: i64,
}

impl Spec {
    ///
    /// Resolves the include groups and the exclude groups (each as `apply_spec` would), and
    /// removes everything the exclude groups produced from what the include groups produced.
    ///
    /// `lookup` is called once per selector: include groups first, then exclude groups.
    ///
    pub fn try_select<N, E, F>(&self, mut lookup: F) -> Result<LookupResult<N>, E>
    where
        N: Eq + Hash + Clone,
        F: FnMut(&SelectorToken) -> Result<LookupResult<N>, E>,
    {
        let included = apply_groups(&self.include, &mut lookup)?;
        let excluded = apply_groups(&self.exclude, &mut lookup)?;
        let result = included.difference(&excluded);
        debug!(
            "Selected {} of {} included node(s) after exclusions.",
            result.selected.len(),
            included.selected.len()
        );
        Ok(result)
    }

    pub fn select<N, F>(&self, mut lookup: F) -> LookupResult<N>
    where
        N: Eq + Hash + Clone,
        F: FnMut(&SelectorToken) -> LookupResult<N>,
    {
        match self.try_select(|selector| Ok::<_, Infallible>(lookup(selector))) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }
}

///
/// Parses an include string and an exclude string into a `Spec`. No relationship between the two
/// is checked.
///
pub fn build_spec(
    include: &str,
    exclude: &str,
    hops: i64,
) -> Result<Spec, SelectorSyntaxError> {
    Ok(Spec {
        include: parse_specs(include)?,
        exclude: parse_specs(exclude)?,
        hops,
    })
}
