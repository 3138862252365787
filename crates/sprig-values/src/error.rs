//! Error types for building a values context.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while assembling values from their sources.
#[derive(Debug, thiserror::Error)]
pub enum ValuesError {
    /// A values file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A values file was read but is not a usable YAML mapping.
    #[error("failed to parse {}: {message}", path.display())]
    SourceParse { path: PathBuf, message: String },

    /// A `--set` specification could not be parsed.
    #[error("failed parsing --set data {spec:?}: {reason}")]
    OverrideSyntax { spec: String, reason: String },
}

impl ValuesError {
    /// Create a parse error for the given file.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SourceParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an override syntax error.
    pub fn override_syntax(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OverrideSyntax {
            spec: spec.into(),
            reason: reason.into(),
        }
    }
}
