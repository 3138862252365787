//! Folding a [`SourceList`] into a single rendering context.

use std::path::PathBuf;

use crate::env::{apply_environment, EnvSnapshot};
use crate::error::ValuesError;
use crate::file::load_file_source;
use crate::merge::merge;
use crate::overrides::apply_override;
use crate::Mapping;

/// The ordered origins of a rendering context.
///
/// Precedence, lowest to highest: files in order, overrides in order, then
/// the environment snapshot if one is present.
#[derive(Debug, Clone, Default)]
pub struct SourceList {
    files: Vec<PathBuf>,
    overrides: Vec<String>,
    environment: Option<EnvSnapshot>,
}

impl SourceList {
    /// Creates an empty source list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a YAML values file.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Appends several YAML values files.
    pub fn files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Appends an override spec.
    pub fn set(mut self, spec: impl Into<String>) -> Self {
        self.overrides.push(spec.into());
        self
    }

    /// Appends several override specs.
    pub fn sets<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides.extend(specs.into_iter().map(Into::into));
        self
    }

    /// Sets the environment snapshot merged last.
    pub fn environment(mut self, snapshot: EnvSnapshot) -> Self {
        self.environment = Some(snapshot);
        self
    }

    pub fn file_paths(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn override_specs(&self) -> &[String] {
        &self.overrides
    }

    pub fn env_snapshot(&self) -> Option<&EnvSnapshot> {
        self.environment.as_ref()
    }

    /// Builds the context. Shorthand for [`ContextBuilder::build`].
    pub fn build(&self) -> Result<Mapping, ValuesError> {
        ContextBuilder::new().build(self)
    }
}

/// Builds a context by folding sources over a starting mapping.
///
/// The starting mapping is empty unless [`ContextBuilder::with_base`] is used.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    base: Mapping,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `base` instead of an empty mapping.
    pub fn with_base(base: Mapping) -> Self {
        Self { base }
    }

    /// Runs every stage of `sources` in precedence order.
    ///
    /// The first failing source aborts the build.
    pub fn build(&self, sources: &SourceList) -> Result<Mapping, ValuesError> {
        let mut values = self.base.clone();

        for path in &sources.files {
            let current = load_file_source(path)?;
            values = merge(&values, &current);
        }

        for spec in &sources.overrides {
            values = apply_override(values, spec)?;
        }

        if let Some(snapshot) = &sources.environment {
            values = apply_environment(values, snapshot);
        }

        tracing::debug!(
            files = sources.files.len(),
            overrides = sources.overrides.len(),
            environment = sources.environment.is_some(),
            keys = values.len(),
            "built rendering context"
        );
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;
    use serde_json::{json, Value};
    use std::io::Write;

    fn yaml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_source_list_builds_empty_context() {
        assert!(SourceList::new().build().unwrap().is_empty());
    }

    #[test]
    fn later_files_win() {
        let first = yaml_file("a: 1\nnested:\n  x: 1\n");
        let second = yaml_file("a: 2\nnested:\n  y: 2\n");

        let values = SourceList::new()
            .file(first.path())
            .file(second.path())
            .build()
            .unwrap();
        assert_eq!(
            Value::Object(values),
            json!({"a": 2, "nested": {"x": 1, "y": 2}})
        );
    }

    #[test]
    fn overrides_beat_files() {
        let file = yaml_file("a: 1\n");
        let values = SourceList::new()
            .file(file.path())
            .set("a=2")
            .build()
            .unwrap();
        assert_eq!(Value::Object(values), json!({"a": 2}));
    }

    #[test]
    fn overrides_apply_in_order() {
        let values = SourceList::new()
            .sets(["a=1,b=1", "a=2"])
            .build()
            .unwrap();
        assert_eq!(Value::Object(values), json!({"a": 2, "b": 1}));
    }

    #[test]
    fn environment_beats_overrides_and_files() {
        let file = yaml_file("NAME: fileval\nOTHER: file\n");
        let env = MockEnv::new().with_var("NAME", "envval");

        let values = SourceList::new()
            .file(file.path())
            .set("NAME=setval")
            .environment(EnvSnapshot::from_reader(&env))
            .build()
            .unwrap();
        assert_eq!(values["NAME"], json!("envval"));
        assert_eq!(values["OTHER"], json!("file"));
    }

    #[test]
    fn first_failure_aborts() {
        let good = yaml_file("a: 1\n");
        let err = SourceList::new()
            .file(good.path())
            .file("/missing/values.yaml")
            .set("never-reached")
            .build()
            .unwrap_err();
        assert!(matches!(err, ValuesError::SourceRead { .. }));
    }

    #[test]
    fn base_mapping_is_lowest_precedence() {
        let Value::Object(base) = json!({"a": 0, "b": 0}) else {
            unreachable!()
        };
        let values = ContextBuilder::with_base(base)
            .build(&SourceList::new().set("a=1"))
            .unwrap();
        assert_eq!(Value::Object(values), json!({"a": 1, "b": 0}));
    }
}
