//! Environment snapshots.
//!
//! The process environment is read through the [`EnvReader`] trait so that
//! tests can substitute a fixed set of variables. A snapshot is taken once
//! and then merged like any other flat source.

use serde_json::Value;

use crate::merge::merge;
use crate::Mapping;

/// Abstraction over the process environment.
pub trait EnvReader {
    /// Returns every variable as a `(name, value)` pair.
    fn vars(&self) -> Vec<(String, String)>;
}

/// Real environment reader.
///
/// Names or values that are not valid Unicode are converted lossily.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealEnv;

impl EnvReader for RealEnv {
    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .map(|(name, value)| {
                (
                    name.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }
}

/// Mock environment for testing.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: Vec<(String, String)>,
}

impl MockEnv {
    /// Create an empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((name.into(), value.into()));
        self
    }

    /// Add a raw `NAME=VALUE` entry, split on the first `=`.
    ///
    /// Entries without `=` are ignored.
    pub fn with_entry(mut self, entry: &str) -> Self {
        if let Some((name, value)) = split_entry(entry) {
            self.vars.push((name.to_string(), value.to_string()));
        }
        self
    }
}

impl EnvReader for MockEnv {
    fn vars(&self) -> Vec<(String, String)> {
        self.vars.clone()
    }
}

/// Splits a `NAME=VALUE` entry on its first `=`.
pub fn split_entry(entry: &str) -> Option<(&str, &str)> {
    entry.split_once('=')
}

/// A flat, string-valued capture of the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvSnapshot {
    vars: Mapping,
}

impl EnvSnapshot {
    /// Snapshots the real process environment.
    pub fn capture() -> Self {
        Self::from_reader(&RealEnv)
    }

    /// Snapshots whatever `reader` reports. Variables with an empty name
    /// are skipped; a repeated name keeps its last value.
    pub fn from_reader(reader: &impl EnvReader) -> Self {
        let vars = reader
            .vars()
            .into_iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name, Value::String(value)))
            .collect();
        Self { vars }
    }

    /// Number of captured variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The captured variables as a mapping of strings.
    pub fn as_mapping(&self) -> &Mapping {
        &self.vars
    }
}

/// Merges an environment snapshot over `mapping`.
///
/// The environment wins for every name it defines, including names that
/// hold a nested mapping in `mapping`.
pub fn apply_environment(mapping: Mapping, snapshot: &EnvSnapshot) -> Mapping {
    let out = merge(&mapping, snapshot.as_mapping());
    tracing::debug!(vars = snapshot.len(), "merged environment snapshot");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    #[test]
    fn split_entry_uses_first_equals() {
        assert_eq!(split_entry("A=b=c"), Some(("A", "b=c")));
        assert_eq!(split_entry("EMPTY="), Some(("EMPTY", "")));
        assert_eq!(split_entry("=C:=C:\\"), Some(("", "C:=C:\\")));
        assert_eq!(split_entry("NOEQUALS"), None);
    }

    #[test]
    fn mock_env_entries() {
        let env = MockEnv::new()
            .with_entry("PATH=/bin:/usr/bin")
            .with_entry("OPTS=a=1")
            .with_entry("garbage");
        assert_eq!(
            env.vars(),
            vec![
                ("PATH".to_string(), "/bin:/usr/bin".to_string()),
                ("OPTS".to_string(), "a=1".to_string()),
            ]
        );
    }

    #[test]
    fn snapshot_skips_nameless_entries() {
        let env = MockEnv::new().with_entry("=C:=C:\\").with_var("HOME", "/home/u");
        let snapshot = EnvSnapshot::from_reader(&env);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.as_mapping()["HOME"], json!("/home/u"));
    }

    #[test]
    fn snapshot_values_are_strings() {
        let env = MockEnv::new().with_var("PORT", "8080").with_var("DEBUG", "true");
        let snapshot = EnvSnapshot::from_reader(&env);
        assert_eq!(snapshot.as_mapping()["PORT"], json!("8080"));
        assert_eq!(snapshot.as_mapping()["DEBUG"], json!("true"));
    }

    #[test]
    fn environment_overrides_existing_keys() {
        let base = json!({"NAME": "fileval", "nested": {"x": 1}, "keep": true});
        let Value::Object(base) = base else { unreachable!() };
        let env = MockEnv::new().with_var("NAME", "envval").with_var("nested", "flat");

        let out = apply_environment(base, &EnvSnapshot::from_reader(&env));
        assert_eq!(
            Value::Object(out),
            json!({"NAME": "envval", "nested": "flat", "keep": true})
        );
    }

    #[test]
    #[serial]
    fn capture_reads_process_environment() {
        std::env::set_var("SPRIG_VALUES_TEST_VAR", "from-process");
        let snapshot = EnvSnapshot::capture();
        std::env::remove_var("SPRIG_VALUES_TEST_VAR");

        assert_eq!(
            snapshot.as_mapping()["SPRIG_VALUES_TEST_VAR"],
            json!("from-process")
        );
    }
}
