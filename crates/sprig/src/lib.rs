//! The `sprig` command: render a template against layered values.
//!
//! ```text
//! sprig [--env] [-f values.yaml[,more.yaml]]... [--set key=value]... (TEMPLATE | --stdin)
//! ```
//!
//! Values are resolved by [`sprig_values`] (files, then `--set`, then the
//! environment) and the template is executed by [`sprig_render`] in strict
//! mode, so any reference to a missing key fails the run.
//!
//! Every side of the process that tests would want to control (stdin, the
//! environment, stdout) is passed in; see [`run()`].

pub mod cli;
mod error;
pub mod input;
pub mod logging;
mod run;

pub use cli::{Cli, Invocation};
pub use error::CliError;
pub use input::{MockStdin, RealStdin, StdinReader, TemplateSource};
pub use run::{run, run_cli};
