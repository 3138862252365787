//! Recursive merging of value mappings.
//!
//! The rule is asymmetric: mappings present on both sides are merged key by
//! key, while every other value in the source (scalars, sequences, null)
//! replaces whatever the destination held. Sequences are never merged
//! element-wise.
//!
//! ```rust
//! use serde_json::json;
//! use sprig_values::merge;
//!
//! let file = json!({"a": {"x": 1}, "tags": [1, 2]});
//! let set = json!({"a": {"y": 2}, "tags": [3]});
//!
//! let merged = merge(file.as_object().unwrap(), set.as_object().unwrap());
//! assert_eq!(
//!     serde_json::Value::Object(merged),
//!     json!({"a": {"x": 1, "y": 2}, "tags": [3]})
//! );
//! ```

use serde_json::Value;

use crate::Mapping;

/// Merges `src` over `dst`, returning a new mapping.
///
/// Neither input is modified. Keys only present in one side keep that side's
/// value unchanged.
pub fn merge(dst: &Mapping, src: &Mapping) -> Mapping {
    let mut out = dst.clone();
    for (key, value) in src {
        let merged = match (out.get(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                Value::Object(merge(existing, incoming))
            }
            _ => value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    out
}

/// Folds a sequence of mappings left to right with [`merge`].
pub fn merge_all<'a, I>(sources: I) -> Mapping
where
    I: IntoIterator<Item = &'a Mapping>,
{
    sources
        .into_iter()
        .fold(Mapping::new(), |acc, src| merge(&acc, src))
}
