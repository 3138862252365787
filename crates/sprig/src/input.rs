//! Template input.
//!
//! The template comes either from a file or from piped stdin. Stdin is read
//! through [`StdinReader`] so tests can simulate both a terminal and a pipe.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Where the template text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    Stdin,
}

/// Abstraction over stdin reading.
pub trait StdinReader {
    /// Returns `true` if stdin is interactive, `false` if piped.
    fn is_terminal(&self) -> bool;

    /// Read all content from stdin.
    fn read_to_string(&self) -> io::Result<String>;
}

/// Real stdin reader using std::io.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealStdin;

impl StdinReader for RealStdin {
    fn is_terminal(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn read_to_string(&self) -> io::Result<String> {
        let mut buffer = String::new();
        io::stdin().lock().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

/// Mock stdin reader for testing.
#[derive(Debug, Clone)]
pub struct MockStdin {
    is_terminal: bool,
    content: String,
}

impl MockStdin {
    /// Simulates a terminal (no piped input).
    pub fn terminal() -> Self {
        Self {
            is_terminal: true,
            content: String::new(),
        }
    }

    /// Simulates piped input.
    pub fn piped(content: impl Into<String>) -> Self {
        Self {
            is_terminal: false,
            content: content.into(),
        }
    }
}

impl StdinReader for MockStdin {
    fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    fn read_to_string(&self) -> io::Result<String> {
        Ok(self.content.clone())
    }
}

/// Reads the whole template.
///
/// Unlike most piped-input readers, content is never trimmed: whitespace is
/// part of the template.
pub fn read_template(
    source: &TemplateSource,
    stdin: &impl StdinReader,
) -> Result<String, CliError> {
    match source {
        TemplateSource::File(path) => read_file(path),
        TemplateSource::Stdin => {
            if stdin.is_terminal() {
                return Err(CliError::InputUnavailable);
            }
            let text = stdin.read_to_string().map_err(CliError::StdinFailed)?;
            tracing::debug!(bytes = text.len(), "read template from stdin");
            Ok(text)
        }
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read template file");
    Ok(text)
}
