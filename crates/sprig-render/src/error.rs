//! Error types for template rendering.
//!
//! [`RenderError`] abstracts over MiniJinja's errors so callers can tell a
//! broken template apart from a missing key or a failing helper without
//! depending on MiniJinja directly.

use std::fmt;

/// The stage of an invocation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Render,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Parse => write!(f, "parse"),
            Phase::Render => write!(f, "render"),
        }
    }
}

/// Error type for template operations.
#[derive(Debug)]
pub enum RenderError {
    /// Malformed template, or a reference to a filter, test, function or
    /// method the helper library does not provide.
    Syntax {
        message: String,
        line: Option<usize>,
    },

    /// The template referenced a key absent from the context.
    MissingKey { key: String, line: Option<usize> },

    /// A helper failed while rendering.
    Runtime {
        message: String,
        line: Option<usize>,
    },

    /// The output stream rejected a write.
    Write(String),
}

impl RenderError {
    /// Which phase the error belongs to.
    ///
    /// Unknown helpers count as parse failures even when MiniJinja only
    /// notices them while executing.
    pub fn phase(&self) -> Phase {
        match self {
            RenderError::Syntax { .. } => Phase::Parse,
            _ => Phase::Render,
        }
    }

    /// Template line the error points at, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            RenderError::Syntax { line, .. }
            | RenderError::MissingKey { line, .. }
            | RenderError::Runtime { line, .. } => *line,
            RenderError::Write(_) => None,
        }
    }

    /// Classifies a MiniJinja error.
    ///
    /// `missing` is the context path the failing expression could not
    /// resolve, and `expression` the source text of that expression. An
    /// undefined value with no such path did not come from the context (an
    /// attribute of a scalar, say) and is reported as a runtime error.
    pub(crate) fn from_minijinja(
        err: minijinja::Error,
        missing: Option<String>,
        expression: Option<&str>,
    ) -> Self {
        use minijinja::ErrorKind;

        let line = err.line();
        match err.kind() {
            ErrorKind::SyntaxError
            | ErrorKind::BadEscape
            | ErrorKind::UnknownTest
            | ErrorKind::UnknownFunction
            | ErrorKind::UnknownFilter
            | ErrorKind::UnknownMethod => RenderError::Syntax {
                message: err.to_string(),
                line,
            },
            ErrorKind::UndefinedError => match (missing, expression) {
                (Some(key), _) => RenderError::MissingKey { key, line },
                (None, Some(expression)) => RenderError::Runtime {
                    message: format!("{} (at `{}`)", err, expression),
                    line,
                },
                (None, None) => RenderError::Runtime {
                    message: err.to_string(),
                    line,
                },
            },
            ErrorKind::WriteFailure => RenderError::Write(err.to_string()),
            _ => RenderError::Runtime {
                message: err.to_string(),
                line,
            },
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Syntax { message, .. } => {
                write!(f, "could not parse template: {}", message)
            }
            RenderError::MissingKey { key, line } => match line {
                Some(line) => write!(f, "map has no entry for key {:?} (line {})", key, line),
                None => write!(f, "map has no entry for key {:?}", key),
            },
            RenderError::Runtime { message, .. } => write!(f, "template error: {}", message),
            RenderError::Write(msg) => write!(f, "could not write output: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        RenderError::from_minijinja(err, None, None)
    }
}
