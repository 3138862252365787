//! Running one invocation end to end.

use std::io::Write;

use sprig_render::Program;
use sprig_values::RealEnv;

use crate::cli::{Cli, Invocation};
use crate::error::CliError;
use crate::input::{read_template, RealStdin, StdinReader};

/// Builds the context, reads the template, and streams the rendered output.
///
/// Values are resolved before the template is read, so a bad values file is
/// reported even when the template is also missing.
pub fn run<R, W>(invocation: &Invocation, stdin: &R, mut out: W) -> Result<(), CliError>
where
    R: StdinReader,
    W: Write,
{
    let _span = tracing::debug_span!("invocation").entered();

    let context = invocation.values.build()?;
    let source = read_template(&invocation.source, stdin)?;
    let program = Program::parse(&source)?;

    // Partial output from a failed render is still flushed.
    let rendered = program.execute(&context, &mut out);
    let flushed = out.flush();
    rendered?;
    flushed.map_err(CliError::Output)
}

/// Runs a parsed command line against the real process.
pub fn run_cli(cli: &Cli) -> Result<(), CliError> {
    let invocation = Invocation::from_cli(cli, &RealEnv)?;
    run(&invocation, &RealStdin, std::io::stdout().lock())
}
