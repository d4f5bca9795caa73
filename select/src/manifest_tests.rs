// Copyright 2025 Pants project contributors (see CONTRIBUTORS.md).
// Licensed under the Apache License, Version 2.0 (see LICENSE).

use std::path::Path;

use selectors::{LookupResult, apply_spec, build_spec, parse_spec};

use crate::manifest::Manifest;

fn manifest() -> Manifest {
    Manifest::parse(
        r#"{
          "nodes": [
            {"unique_id": "model.shop.orders", "fqn": ["shop", "staging", "orders"],
             "tags": ["nightly"]},
            {"unique_id": "model.shop.customers", "fqn": ["shop", "marts", "customers"],
             "tags": ["nightly", "pii"]},
            {"unique_id": "model.shop.staging", "fqn": ["shop", "marts", "staging"]},
            {"unique_id": "source.shop.raw.events", "fqn": ["shop", "raw", "events"],
             "source": {"name": "raw", "table": "events"}},
            {"unique_id": "source.shop.raw.users", "fqn": ["shop", "raw", "users"],
             "source": {"name": "raw", "table": "users"}, "tags": ["pii"]}
          ]
        }"#,
        Path::new("manifest.json"),
    )
    .unwrap()
}

#[track_caller]
fn assert_lookup(expected: &[&str], selector: &str) {
    let result = manifest().lookup(&parse_spec(selector).unwrap());
    let expected = expected.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    assert_eq!(LookupResult::new(expected.clone(), expected), result);
}

#[test]
fn test_fqn_lookup() {
    assert_lookup(&["model.shop.orders"], "orders");
    assert_lookup(&["model.shop.customers", "model.shop.staging"], "shop.marts");
    assert_lookup(&["model.shop.orders"], "shop.staging.orders");
    assert_lookup(&["model.shop.staging"], "staging");
    assert_lookup(
        &[
            "model.shop.orders",
            "model.shop.customers",
            "model.shop.staging",
            "source.shop.raw.events",
            "source.shop.raw.users",
        ],
        "shop",
    );
    assert_lookup(&[], "shop.orders");
}

#[test]
fn test_fqn_lookup_at_is_exact() {
    assert_lookup(&["model.shop.orders"], "@shop.staging.orders");
    assert_lookup(&[], "@orders");
    assert_lookup(&[], "@shop.staging");
}

#[test]
fn test_tag_lookup() {
    assert_lookup(&["model.shop.orders", "model.shop.customers"], "tag:nightly");
    assert_lookup(&["model.shop.customers", "source.shop.raw.users"], "tag:pii");
    assert_lookup(&[], "tag:hourly");
}

#[test]
fn test_source_lookup() {
    assert_lookup(
        &["source.shop.raw.events", "source.shop.raw.users"],
        "source:raw",
    );
    assert_lookup(&["source.shop.raw.users"], "source:raw.users+");
    assert_lookup(&[], "source:raw.orders");
    assert_lookup(&[], "source:shop");
}

#[test]
fn test_expansion_is_not_performed() {
    assert_lookup(&["model.shop.orders"], "+orders+");
}

#[test]
fn test_apply_against_manifest() {
    let manifest = manifest();
    let result = apply_spec("tag:pii,source:raw orders", |s| manifest.lookup(s)).unwrap();
    assert_eq!(
        vec!["source.shop.raw.users", "model.shop.orders"],
        result.matched
    );

    let spec = build_spec("tag:nightly tag:pii", "source:raw", 0).unwrap();
    let result = spec.select(|s| manifest.lookup(s));
    assert_eq!(
        vec!["model.shop.orders", "model.shop.customers"],
        result.selected
    );
}

#[test]
fn test_parse_errors() {
    let err = Manifest::parse("{\"nodes\": [{\"fqn\": []}]}", Path::new("m.json")).unwrap_err();
    assert!(err.starts_with("Failed to parse manifest m.json:"), "{err}");
    assert!(Manifest::load(Path::new("/nonexistent/manifest.json")).is_err());
}
