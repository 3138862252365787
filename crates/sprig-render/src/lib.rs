//! # Sprig Render - Strict-Key Template Execution
//!
//! `sprig-render` compiles a template once and renders it against a
//! JSON-shaped context, treating every reference to an absent key as an
//! error instead of printing nothing.
//!
//! The template language is MiniJinja; the helper library is MiniJinja's
//! built-ins plus `minijinja-contrib`. See [`helpers`] for what is bound.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sprig_render::{Program, RenderError};
//!
//! let program = Program::parse("{{ app.name }} x{{ app.replicas }}\n").unwrap();
//!
//! let context = json!({"app": {"name": "web", "replicas": 3}});
//! let output = program
//!     .render_to_string(context.as_object().unwrap())
//!     .unwrap();
//! assert_eq!(output, "web x3\n");
//!
//! let partial = json!({"app": {"name": "web"}});
//! let err = program
//!     .render_to_string(partial.as_object().unwrap())
//!     .unwrap_err();
//! assert!(matches!(err, RenderError::MissingKey { ref key, .. } if key == "app.replicas"));
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! Unparsed ──parse──▶ Parsed ──execute──▶ Rendering ──▶ Done
//!     │                                       │
//!     └──────── Syntax ──▶ Failed ◀── MissingKey / Runtime / Write
//! ```
//!
//! Output is streamed, so a failure while rendering leaves whatever was
//! already written in the destination.

mod context;
mod engine;
mod error;
pub mod helpers;

pub use engine::{render, Program};
pub use error::{Phase, RenderError};

/// The mapping a template is rendered against.
pub type Context = serde_json::Map<String, serde_json::Value>;
