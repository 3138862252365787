//! Parsed template programs.
//!
//! A [`Program`] owns a MiniJinja environment holding exactly one compiled
//! template. Parsing fails fast on malformed source; execution streams
//! output into any [`std::io::Write`] and fails on the first missing key.

use std::io::Write;

use minijinja::Environment;

use crate::context::{MissLog, Scope};
use crate::error::RenderError;
use crate::helpers::strict_environment;
use crate::Context;

const TEMPLATE_NAME: &str = "template";

/// A compiled template bound to the helper library.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use sprig_render::Program;
///
/// let program = Program::parse("Hello, {{ name | title }}!").unwrap();
/// let context = json!({"name": "world"}).as_object().unwrap().clone();
///
/// let mut out = Vec::new();
/// program.execute(&context, &mut out).unwrap();
/// assert_eq!(out, b"Hello, World!");
/// ```
pub struct Program {
    env: Environment<'static>,
    source: String,
}

impl Program {
    /// Compiles `source`.
    pub fn parse(source: &str) -> Result<Self, RenderError> {
        let mut env = strict_environment();
        env.add_template_owned(TEMPLATE_NAME, source.to_string())
            .map_err(|err| {
                tracing::debug!("{:#}", err.display_debug_info());
                RenderError::from(err)
            })?;
        tracing::debug!(bytes = source.len(), "parsed template");
        Ok(Self {
            env,
            source: source.to_string(),
        })
    }

    /// Renders against `context`, writing output as it is produced.
    ///
    /// Output already written stays written if rendering fails part way.
    pub fn execute<W: Write>(&self, context: &Context, writer: W) -> Result<(), RenderError> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        let misses = MissLog::default();
        let root = Scope::root(context, misses.clone());

        template
            .render_to_write(root, writer)
            .map_err(|err| self.fail(err, &misses))?;
        tracing::debug!("rendered template");
        Ok(())
    }

    /// Renders against `context` into a string.
    pub fn render_to_string(&self, context: &Context) -> Result<String, RenderError> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        let misses = MissLog::default();
        template
            .render(Scope::root(context, misses.clone()))
            .map_err(|err| self.fail(err, &misses))
    }

    fn fail(&self, err: minijinja::Error, misses: &MissLog) -> RenderError {
        tracing::debug!("{:#}", err.display_debug_info());
        let expression = self.failing_expression(&err);
        let missing = expression.and_then(|text| misses.culprit(text));
        RenderError::from_minijinja(err, missing, expression)
    }

    /// Source text of the expression an error points at, falling back to
    /// its whole line when no span was recorded.
    fn failing_expression(&self, err: &minijinja::Error) -> Option<&str> {
        let spanned = err.range().and_then(|range| self.source.get(range));
        let text = match spanned {
            Some(text) if !text.trim().is_empty() => text,
            _ => self.source.lines().nth(err.line()?.checked_sub(1)?)?,
        };
        Some(text.trim()).filter(|text| !text.is_empty())
    }
}

/// Parses and executes in one step.
pub fn render<W: Write>(source: &str, context: &Context, writer: W) -> Result<(), RenderError> {
    Program::parse(source)?.execute(context, writer)
}
