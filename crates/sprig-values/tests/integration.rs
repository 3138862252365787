//! Integration tests for sprig-values.
//!
//! These tests exercise whole source lists, from YAML files on disk through
//! `--set` overrides to a mocked environment.

use std::io::Write;

use serde_json::{json, Value};
use sprig_values::{
    apply_environment, apply_override, load_file_source, merge, EnvSnapshot, Mapping, MockEnv,
    SourceList, ValuesError,
};
use tempfile::TempDir;

fn write_values(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn object(value: Value) -> Mapping {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn set_overrides_file_scalar() {
    let dir = TempDir::new().unwrap();
    let file = write_values(&dir, "values.yaml", "a: 1\n");

    let values = SourceList::new().file(&file).set("a=2").build().unwrap();
    assert_eq!(Value::Object(values), json!({"a": 2}));
}

#[test]
fn set_accumulates_into_file_mapping() {
    let dir = TempDir::new().unwrap();
    let file = write_values(&dir, "values.yaml", "a:\n  x: 1\n");

    let values = SourceList::new().file(&file).set("a.y=2").build().unwrap();
    assert_eq!(Value::Object(values), json!({"a": {"x": 1, "y": 2}}));
}

#[test]
fn scalar_source_discards_mapping() {
    let dir = TempDir::new().unwrap();
    let base = write_values(&dir, "base.yaml", "a:\n  x: 1\n");
    let flat = write_values(&dir, "flat.yaml", "a: 5\n");

    let values = SourceList::new().file(&base).file(&flat).build().unwrap();
    assert_eq!(Value::Object(values), json!({"a": 5}));
}

#[test]
fn sequences_are_replaced_across_files() {
    let dir = TempDir::new().unwrap();
    let base = write_values(&dir, "base.yaml", "hosts: [a, b, c]\n");
    let prod = write_values(&dir, "prod.yaml", "hosts: [z]\n");

    let values = SourceList::new().files([&base, &prod]).build().unwrap();
    assert_eq!(Value::Object(values), json!({"hosts": ["z"]}));
}

#[test]
fn environment_wins_over_file() {
    let dir = TempDir::new().unwrap();
    let file = write_values(&dir, "values.yaml", "NAME: fileval\n");
    let env = MockEnv::new().with_entry("NAME=envval");

    let values = SourceList::new()
        .file(&file)
        .environment(EnvSnapshot::from_reader(&env))
        .build()
        .unwrap();
    assert_eq!(values["NAME"], json!("envval"));
}

#[test]
fn environment_is_ignored_when_not_requested() {
    let dir = TempDir::new().unwrap();
    let file = write_values(&dir, "values.yaml", "HOME: fileval\n");

    let values = SourceList::new().file(&file).build().unwrap();
    assert_eq!(Value::Object(values), json!({"HOME": "fileval"}));
}

#[test]
fn full_pipeline_matches_manual_stages() {
    let dir = TempDir::new().unwrap();
    let base = write_values(
        &dir,
        "base.yaml",
        "app:\n  name: web\n  replicas: 1\n  labels:\n    tier: frontend\n",
    );
    let prod = write_values(&dir, "prod.yaml", "app:\n  replicas: 3\n");
    let env = MockEnv::new().with_var("STAGE", "prod");

    let built = SourceList::new()
        .files([&base, &prod])
        .sets(["app.labels.team=core", "app.name=api"])
        .environment(EnvSnapshot::from_reader(&env))
        .build()
        .unwrap();

    let mut manual = merge(&Mapping::new(), &load_file_source(&base).unwrap());
    manual = merge(&manual, &load_file_source(&prod).unwrap());
    manual = apply_override(manual, "app.labels.team=core").unwrap();
    manual = apply_override(manual, "app.name=api").unwrap();
    manual = apply_environment(manual, &EnvSnapshot::from_reader(&env));

    assert_eq!(built, manual);
    assert_eq!(
        Value::Object(built),
        json!({
            "app": {
                "name": "api",
                "replicas": 3,
                "labels": {"tier": "frontend", "team": "core"}
            },
            "STAGE": "prod"
        })
    );
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn empty_file_contributes_nothing() {
    let dir = TempDir::new().unwrap();
    let empty = write_values(&dir, "empty.yaml", "");
    let values = SourceList::new().file(&empty).set("a=1").build().unwrap();
    assert_eq!(Value::Object(values), json!({"a": 1}));
}

#[test]
fn invalid_yaml_names_the_file() {
    let dir = TempDir::new().unwrap();
    let bad = write_values(&dir, "bad.yaml", "a: [1, 2\n");

    let err = SourceList::new().file(&bad).build().unwrap_err();
    assert!(matches!(err, ValuesError::SourceParse { .. }));
    assert!(err.to_string().contains("bad.yaml"), "{err}");
}

#[test]
fn malformed_override_is_reported() {
    let err = SourceList::new().set("a=1").set("oops").build().unwrap_err();
    match err {
        ValuesError::OverrideSyntax { spec, reason } => {
            assert_eq!(spec, "oops");
            assert!(reason.contains("has no value"));
        }
        other => panic!("expected OverrideSyntax, got {other:?}"),
    }
}

#[test]
fn override_applies_to_given_mapping_only() {
    let base = object(json!({"keep": 1}));
    let out = apply_override(base.clone(), "added=2").unwrap();
    assert_eq!(Value::Object(out), json!({"keep": 1, "added": 2}));
    assert_eq!(Value::Object(base), json!({"keep": 1}));
}
