//! YAML values files.
//!
//! Files are parsed with `serde_yaml` and converted into the JSON-shaped
//! [`Mapping`] the rest of the pipeline works with. The conversion follows
//! the usual YAML-to-JSON rules: scalar keys are stringified, tags are
//! dropped, and anything JSON cannot represent is rejected. Only the first
//! document of a multi-document stream is read.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Number, Value};
use serde_yaml::Value as Yaml;

use crate::error::ValuesError;
use crate::Mapping;

/// Reads and parses a YAML values file.
///
/// An empty file (or one holding only a `null` document) yields
/// an empty mapping. Any other top-level value that is not a mapping is a
/// parse error.
pub fn load_file_source(path: impl AsRef<Path>) -> Result<Mapping, ValuesError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ValuesError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mapping = parse_yaml(&text).map_err(|message| ValuesError::parse(path, message))?;
    tracing::debug!(path = %path.display(), keys = mapping.len(), "loaded values file");
    Ok(mapping)
}

/// Parses YAML text into a mapping.
///
/// Errors are returned as plain messages; [`load_file_source`] attaches the
/// originating path.
pub fn parse_yaml(text: &str) -> Result<Mapping, String> {
    if text.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let doc = match serde_yaml::Deserializer::from_str(text).next() {
        Some(first) => Yaml::deserialize(first).map_err(|e| e.to_string())?,
        None => Yaml::Null,
    };
    match convert(doc)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(format!(
            "expected a mapping at the top level, found {}",
            kind_of(&other)
        )),
    }
}

fn convert(value: Yaml) -> Result<Value, String> {
    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => convert_number(&n)?,
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(convert)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Yaml::Mapping(entries) => {
            let mut map = Mapping::new();
            for (key, value) in entries {
                map.insert(convert_key(key)?, convert(value)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => convert(tagged.value)?,
    })
}

fn convert_number(n: &serde_yaml::Number) -> Result<Value, String> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Number(i.into()));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::Number(u.into()));
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("unsupported number {n}: not representable in the context"))
}

fn convert_key(key: Yaml) -> Result<String, String> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => convert_key(tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => {
            Err("unsupported mapping key: keys must be scalars".to_string())
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
