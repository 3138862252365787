//! Layered values for template rendering.
//!
//! `sprig-values` assembles the context a template is rendered against from
//! three kinds of sources, lowest precedence first:
//!
//! 1. YAML values files, in the order given
//! 2. `--set` override specs, in the order given
//! 3. an optional snapshot of the process environment
//!
//! Mappings present in two sources are merged recursively; any other value
//! in a higher-precedence source replaces the lower one outright.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sprig_values::{EnvSnapshot, MockEnv, SourceList};
//!
//! let env = MockEnv::new().with_var("REGION", "eu-west-1");
//!
//! let values = SourceList::new()
//!     .set("image.repo=nginx,image.tag=1.25")
//!     .set("image.tag=1.27")
//!     .environment(EnvSnapshot::from_reader(&env))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     serde_json::Value::Object(values),
//!     json!({"image": {"repo": "nginx", "tag": "1.27"}, "REGION": "eu-west-1"})
//! );
//! ```
//!
//! # Testing
//!
//! The environment is only read through [`EnvReader`]; use [`MockEnv`] to
//! supply a fixed set of variables.

mod builder;
pub mod env;
mod error;
mod file;
mod merge;
mod overrides;

pub use builder::{ContextBuilder, SourceList};
pub use env::{apply_environment, EnvReader, EnvSnapshot, MockEnv, RealEnv};
pub use error::ValuesError;
pub use file::{load_file_source, parse_yaml};
pub use merge::{merge, merge_all};
pub use overrides::{apply_override, MAX_INDEX, MAX_NESTED_NAME_LEVEL};

/// A nested, string-keyed value mapping.
pub type Mapping = serde_json::Map<String, serde_json::Value>;
