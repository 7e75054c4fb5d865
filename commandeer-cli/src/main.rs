//! # Commandeer CLI Entry Point
//!
//! Discovers the demo components' command handlers, parses the process
//! arguments against them, and runs the selected command.

use std::process::ExitCode;

use anyhow::{Context, Result};
use commandeer_cli::output::print_error;
use commandeer_cli::{CommandRunner, RunnerError, demo, get_config_dirs, logging};

fn main() -> ExitCode {
  match run() {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}

fn run() -> Result<()> {
  let log = logging::init();

  let config = get_config_dirs()?.load_runner_config()?;
  let commands = commandeer_core::explore(&demo::container(), &demo::metadata());
  let runner = CommandRunner::new(config, commands)?;

  let invocation = match runner.parse(std::env::args_os()) {
    Ok(invocation) => invocation,
    // Help, version, and usage errors are printed and exit by clap
    Err(RunnerError::Parse(err)) => err.exit(),
    Err(err) => return Err(err.into()),
  };

  log.set_verbosity(invocation.verbosity())?;
  invocation.colors().apply();

  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")?;
  rt.block_on(invocation.run())
}
