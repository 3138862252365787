//! Context lookup with missing-key tracking.
//!
//! MiniJinja's strict mode rejects undefined values but does not say which
//! key was missing. The context is therefore exposed to templates through
//! [`Scope`], a view into the shared context document that logs the dotted
//! path of every lookup that found nothing. When rendering fails with an
//! undefined value, the failing expression is matched against that log to
//! name the offending key.
//!
//! The document is stored once behind an [`Arc`]; a scope is only a pointer
//! into it, so nested lookups and list indexing never copy data.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use minijinja::value::{Enumerator, Object, ObjectRepr};
use minijinja::Value;
use serde_json::Value as Json;

use crate::Context;

/// Recent misses kept for attribution. A failing expression always fails
/// right after its own lookups, so a short window is enough.
const MISS_WINDOW: usize = 16;

/// Key paths lookups failed to resolve, newest last.
#[derive(Debug, Clone, Default)]
pub(crate) struct MissLog(Arc<Mutex<VecDeque<String>>>);

impl MissLog {
    fn record(&self, path: String) {
        if let Ok(mut log) = self.0.lock() {
            if log.len() == MISS_WINDOW {
                log.pop_front();
            }
            log.push_back(path);
        }
    }

    /// The newest miss that `expression` refers to.
    ///
    /// Misses that did not fail the render (globals looked up in the
    /// context first, `is defined` checks, `default` subjects) stay in the
    /// log, so a miss only counts when its name occurs in the expression.
    pub(crate) fn culprit(&self, expression: &str) -> Option<String> {
        let log = self.0.lock().ok()?;
        log.iter()
            .rev()
            .find(|path| mentions(expression, leaf_name(path)))
            .cloned()
    }
}

/// Last named segment of a path: `port` for `servers[0].port`, `ports`
/// for `ports[3]`.
fn leaf_name(path: &str) -> &str {
    let mut name = path;
    while name.ends_with(']') {
        match name.rfind('[') {
            Some(open) => name = &name[..open],
            None => break,
        }
    }
    match name.rfind('.') {
        Some(dot) => &name[dot + 1..],
        None => name,
    }
}

/// Whether `name` occurs in `text` as a whole identifier.
fn mentions(text: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    text.match_indices(name).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + name.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

/// A mapping or sequence inside the context, exposed to the template engine.
pub(crate) struct Scope {
    document: Arc<Json>,
    pointer: String,
    path: String,
    misses: MissLog,
}

impl Scope {
    /// Wraps the root context.
    pub(crate) fn root(values: &Context, misses: MissLog) -> Value {
        Value::from_object(Scope {
            document: Arc::new(Json::Object(values.clone())),
            pointer: String::new(),
            path: String::new(),
            misses,
        })
    }

    fn node(&self) -> Option<&Json> {
        self.document.pointer(&self.pointer)
    }

    fn child(&self, segment: &str, path: String, value: &Json) -> Value {
        match value {
            Json::Object(_) | Json::Array(_) => Value::from_object(Scope {
                document: Arc::clone(&self.document),
                pointer: format!(
                    "{}/{}",
                    self.pointer,
                    segment.replace('~', "~0").replace('/', "~1")
                ),
                path,
                misses: self.misses.clone(),
            }),
            scalar => Value::from_serialize(scalar),
        }
    }

    fn key_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            Some(node) => fmt::Debug::fmt(node, f),
            None => f.write_str("<detached>"),
        }
    }
}

impl Object for Scope {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        match self.node() {
            Some(Json::Array(_)) => ObjectRepr::Seq,
            _ => ObjectRepr::Map,
        }
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let (segment, path, found) = match self.node()? {
            Json::Array(items) => {
                let index = key.as_usize();
                let segment = match index {
                    Some(index) => index.to_string(),
                    None => key.to_string(),
                };
                let path = match key.as_i64() {
                    Some(index) => format!("{}[{}]", self.path, index),
                    None => self.key_path(&segment),
                };
                let found = index.and_then(|index| items.get(index));
                (segment, path, found)
            }
            Json::Object(map) => {
                let name = match key.as_str() {
                    Some(name) => name.to_string(),
                    None => key.to_string(),
                };
                let found = map.get(&name);
                (name.clone(), self.key_path(&name), found)
            }
            _ => return None,
        };

        match found {
            Some(value) => Some(self.child(&segment, path, value)),
            None => {
                self.misses.record(path);
                None
            }
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        match self.node() {
            Some(Json::Array(items)) => Enumerator::Seq(items.len()),
            Some(Json::Object(map)) => {
                Enumerator::Values(map.keys().map(|k| Value::from(k.as_str())).collect())
            }
            _ => Enumerator::Empty,
        }
    }
}
