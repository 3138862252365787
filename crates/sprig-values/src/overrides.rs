//! `--set` override specifications.
//!
//! An override spec is a compact list of assignments written into an
//! existing mapping:
//!
//! ```text
//! name=web,image.tag=v2,ports[0]=80,hosts={a.example,b.example}
//! ```
//!
//! - `,` separates assignments; `.` descends into a nested mapping
//! - `name[N]` addresses list index `N`, padding the list with nulls
//! - `name={a,b}` assigns a list
//! - `\` escapes the next character in keys and values
//! - `true`, `false`, `null` and plain integers are typed; everything else
//!   is a string
//!
//! Intermediate mappings and lists are created as needed. A non-mapping
//! value sitting where a mapping is required is replaced, never an error.

use serde_json::Value;

use crate::error::ValuesError;
use crate::Mapping;

/// Largest list index an override may address.
pub const MAX_INDEX: i64 = 65536;

/// Deepest chain of `.`-separated names an override may use.
pub const MAX_NESTED_NAME_LEVEL: usize = 30;

/// Applies one override spec to `mapping`, returning the updated mapping.
///
/// Assignments within the spec are applied left to right. On error the
/// partially updated mapping is dropped.
///
/// ```rust
/// use serde_json::json;
/// use sprig_values::{apply_override, Mapping};
///
/// let out = apply_override(Mapping::new(), "a.b=1,a.c=true,name=web").unwrap();
/// assert_eq!(
///     serde_json::Value::Object(out),
///     json!({"a": {"b": 1, "c": true}, "name": "web"})
/// );
/// ```
pub fn apply_override(mut mapping: Mapping, spec: &str) -> Result<Mapping, ValuesError> {
    Parser::new(spec)
        .parse_into(&mut mapping)
        .map_err(|reason| ValuesError::override_syntax(spec, reason))?;
    tracing::debug!(spec, "applied --set override");
    Ok(mapping)
}

/// Result of looking for a `{...}` list literal after `=`.
enum ListValue {
    List(Vec<Value>),
    NotList,
    End,
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(spec: &str) -> Self {
        Self {
            chars: spec.chars().collect(),
            pos: 0,
        }
    }

    fn parse_into(&mut self, data: &mut Mapping) -> Result<(), String> {
        while !self.at_end() {
            self.key(data, 0)?;
        }
        Ok(())
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Reads until one of `stops`, honouring `\` escapes. The stop character
    /// is consumed and returned; `None` means the input ran out.
    fn until(&mut self, stops: &[char]) -> (String, Option<char>) {
        let mut buf = String::new();
        loop {
            match self.next() {
                None => return (buf, None),
                Some('\\') => match self.next() {
                    Some(escaped) => buf.push(escaped),
                    None => return (buf, None),
                },
                Some(c) if stops.contains(&c) => return (buf, Some(c)),
                Some(c) => buf.push(c),
            }
        }
    }

    fn key(&mut self, data: &mut Mapping, level: usize) -> Result<(), String> {
        let (key, stop) = self.until(&['=', '[', ',', '.']);
        match stop {
            None if key.is_empty() => Ok(()),
            None => Err(format!("key {key:?} has no value")),
            Some(',') => Err(format!("key {key:?} has no value (cannot end with ,)")),
            Some('=') => {
                let value = match self.list_value()? {
                    ListValue::List(items) => Value::Array(items),
                    ListValue::End => Value::String(String::new()),
                    ListValue::NotList => typed(&self.until(&[',']).0),
                };
                set(data, key, value);
                Ok(())
            }
            Some('[') => {
                let index = self
                    .index()
                    .map_err(|e| format!("error parsing index: {e}"))?;
                let list = match data.remove(&key) {
                    Some(Value::Array(list)) => list,
                    _ => Vec::new(),
                };
                let list = self.list_item(list, index, level)?;
                set(data, key, Value::Array(list));
                Ok(())
            }
            Some('.') => {
                let level = level + 1;
                if level > MAX_NESTED_NAME_LEVEL {
                    return Err(format!(
                        "value name nested level is greater than maximum supported nested level of {MAX_NESTED_NAME_LEVEL}"
                    ));
                }
                let mut inner = match data.remove(&key) {
                    Some(Value::Object(inner)) => inner,
                    _ => Mapping::new(),
                };
                self.key(&mut inner, level)?;
                if inner.is_empty() {
                    return Err(format!("key map {key:?} has no value"));
                }
                set(data, key, Value::Object(inner));
                Ok(())
            }
            Some(other) => Err(format!("unexpected {other:?} in key")),
        }
    }

    fn index(&mut self) -> Result<i64, String> {
        let (digits, stop) = self.until(&[']']);
        if stop.is_none() {
            return Err(format!("unterminated index {digits:?}"));
        }
        digits
            .parse::<i64>()
            .map_err(|_| format!("invalid index {digits:?}"))
    }

    fn list_item(
        &mut self,
        mut list: Vec<Value>,
        index: i64,
        level: usize,
    ) -> Result<Vec<Value>, String> {
        if index < 0 {
            return Err(format!("negative {index} index not allowed"));
        }
        let (rest, stop) = self.until(&['[', '.', '=']);
        if !rest.is_empty() {
            return Err(format!("unexpected data at end of array index: {rest:?}"));
        }
        match stop {
            None => Err(format!("array index {index} has no value")),
            Some('=') => {
                let value = match self.list_value()? {
                    ListValue::List(items) => Value::Array(items),
                    ListValue::End => Value::String(String::new()),
                    ListValue::NotList => typed(&self.until(&[',']).0),
                };
                set_index(list, index, value)
            }
            Some('[') => {
                let next = self
                    .index()
                    .map_err(|e| format!("error parsing index: {e}"))?;
                let nested = match slot(&mut list, index) {
                    Some(Value::Array(nested)) => std::mem::take(nested),
                    _ => Vec::new(),
                };
                let nested = self.list_item(nested, next, level)?;
                set_index(list, index, Value::Array(nested))
            }
            Some('.') => {
                let mut inner = match slot(&mut list, index) {
                    Some(Value::Object(inner)) => std::mem::take(inner),
                    _ => Mapping::new(),
                };
                self.key(&mut inner, level)?;
                set_index(list, index, Value::Object(inner))
            }
            Some(other) => Err(format!("parse error: unexpected token {other:?}")),
        }
    }

    /// Parses `{a,b,c}` if the value starts with `{`.
    fn list_value(&mut self) -> Result<ListValue, String> {
        match self.peek() {
            None => return Ok(ListValue::End),
            Some('{') => {
                self.pos += 1;
            }
            Some(_) => return Ok(ListValue::NotList),
        }

        let mut items = Vec::new();
        loop {
            let (item, stop) = self.until(&[',', '}']);
            match stop {
                None => return Err("list must terminate with '}'".to_string()),
                Some('}') => {
                    if self.peek() == Some(',') {
                        self.pos += 1;
                    }
                    if !(items.is_empty() && item.is_empty()) {
                        items.push(typed(&item));
                    }
                    return Ok(ListValue::List(items));
                }
                Some(_) => items.push(typed(&item)),
            }
        }
    }
}

/// Mutable access to an existing list slot.
fn slot(list: &mut [Value], index: i64) -> Option<&mut Value> {
    usize::try_from(index).ok().and_then(|i| list.get_mut(i))
}

fn set(data: &mut Mapping, key: String, value: Value) {
    if !key.is_empty() {
        data.insert(key, value);
    }
}

fn set_index(mut list: Vec<Value>, index: i64, value: Value) -> Result<Vec<Value>, String> {
    if index < 0 {
        return Err(format!("negative {index} index not allowed"));
    }
    if index > MAX_INDEX {
        return Err(format!(
            "index of {index} is greater than maximum supported index {MAX_INDEX}"
        ));
    }
    let index = index as usize;
    if list.len() <= index {
        list.resize(index + 1, Value::Null);
    }
    list[index] = value;
    Ok(list)
}

/// Converts a raw value into a typed one.
fn typed(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if raw == "0" {
        return Value::Number(0.into());
    }
    if !raw.is_empty() && !raw.starts_with('0') {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Number(n.into());
        }
    }
    Value::String(raw.to_string())
}
