use std::process::ExitCode;

use clap::Parser;
use console::style;
use sprig::{logging, run_cli, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    match run_cli(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").for_stderr().red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}
