//! Command-line arguments.
//!
//! [`Cli`] is what clap parses; [`Invocation`] is the validated plan the
//! rest of the program runs. Converting one into the other checks the input
//! mode and snapshots the environment, and touches no files.

use std::path::PathBuf;

use clap::Parser;
use sprig_values::{EnvReader, EnvSnapshot, SourceList};

use crate::error::CliError;
use crate::input::TemplateSource;

/// Render a template with values from YAML files, --set overrides and the
/// environment.
#[derive(Debug, Parser)]
#[command(name = "sprig", version)]
pub struct Cli {
    /// Template file to render
    #[arg(value_name = "TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Read the template from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Pull template values from the environment
    #[arg(long)]
    pub env: bool,

    /// Values in a YAML file (can specify multiple, comma separated)
    #[arg(short = 'f', long = "values", value_name = "PATH", value_delimiter = ',')]
    pub values: Vec<PathBuf>,

    /// Set values on the command line (can specify multiple or separate
    /// values with commas: key1=val1,key2=val2)
    #[arg(long = "set", value_name = "SPEC")]
    pub set: Vec<String>,
}

impl Cli {
    /// Resolves the input mode. Exactly one of a template path and `--stdin`
    /// must be given.
    pub fn template_source(&self) -> Result<TemplateSource, CliError> {
        match (&self.template, self.stdin) {
            (Some(_), true) => Err(CliError::usage(
                "a template file cannot be combined with --stdin",
            )),
            (None, false) => Err(CliError::usage(
                "no template given: pass a template file or use --stdin",
            )),
            (Some(path), false) => Ok(TemplateSource::File(path.clone())),
            (None, true) => Ok(TemplateSource::Stdin),
        }
    }
}

/// A validated invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub source: TemplateSource,
    pub values: SourceList,
}

impl Invocation {
    /// Validates `cli`, reading the environment through `env` only when
    /// `--env` is set.
    pub fn from_cli(cli: &Cli, env: &impl EnvReader) -> Result<Self, CliError> {
        let source = cli.template_source()?;

        let mut values = SourceList::new()
            .files(cli.values.iter().cloned())
            .sets(cli.set.iter().cloned());
        if cli.env {
            values = values.environment(EnvSnapshot::from_reader(env));
        }

        Ok(Self { source, values })
    }
}
