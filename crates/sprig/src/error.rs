//! Top-level error type for the `sprig` command.

use std::io;
use std::path::PathBuf;

use sprig_render::RenderError;
use sprig_values::ValuesError;

/// Everything that can stop an invocation.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Bad combination of command-line arguments.
    #[error("{0}")]
    Usage(String),

    /// `--stdin` was given but nothing is piped in.
    #[error("--stdin is enabled, but no input is piped in")]
    InputUnavailable,

    /// The template file could not be read.
    #[error("could not read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the template from stdin failed.
    #[error("could not read input: {0}")]
    StdinFailed(#[source] io::Error),

    /// Flushing rendered output failed.
    #[error("could not write output: {0}")]
    Output(#[source] io::Error),

    #[error(transparent)]
    Values(#[from] ValuesError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl CliError {
    /// Create a usage error.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Process exit status for this error.
    ///
    /// Usage errors share clap's status so scripts see one code for every
    /// bad invocation.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}
