// Copyright 2025 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

//! Parsing and set algebra for node selector strings such as `+tag:nightly,source:raw.events+`.
//!
//! Whitespace separates groups which are unioned together, and commas within a token join
//! selectors which are intersected. What any individual selector actually matches is decided by
//! a caller-supplied lookup: this crate never inspects a graph.

mod algebra;

mod groups;

mod parse;

mod spec;

pub use algebra::{
    ApplyError, LookupResult, apply_spec, difference_ordered, intersect_ordered, try_apply_spec,
    union_ordered,
};
pub use groups::{SetMethod, SpecGroup, parse_specs, split_specs};
pub use parse::{SelectorSyntaxError, SelectorToken, SelectorType, parse_spec};
pub use spec::{Spec, build_spec};
