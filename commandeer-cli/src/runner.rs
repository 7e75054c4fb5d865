//! # Command Runner
//!
//! Registers discovered command descriptors as clap subcommands, parses the
//! process arguments, and dispatches to the selected command's handler.

use std::collections::HashSet;
use std::ffi::OsString;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use commandeer_core::{CommandDescriptor, ParsedArgs};
use thiserror::Error;
use tracing::{debug, warn};

use crate::clap_schema::{ArgConflict, ArgLayout, ArgReadError, ClapSchema};
use crate::command_spec::CommandSpecError;
use crate::config::RunnerConfig;
use crate::output::ColorMode;

/// Errors raised while registering commands or parsing arguments
#[derive(Debug, Error)]
pub enum RunnerError {
  /// Argument parsing failed, or help/version output was requested
  #[error(transparent)]
  Parse(#[from] clap::Error),
  #[error("invalid command string '{command}'")]
  InvalidCommand {
    command: String,
    #[source]
    source: CommandSpecError,
  },
  #[error("command '{command}' declares conflicting arguments")]
  ConflictingArgs {
    command: String,
    #[source]
    source: ArgConflict,
  },
  #[error("no command was given")]
  NoCommand,
  #[error(transparent)]
  Read(#[from] ArgReadError),
}

struct RegisteredCommand {
  descriptor: CommandDescriptor,
  command: Command,
  layout: ArgLayout,
}

/// Feeds discovered commands to clap and dispatches the selected one
pub struct CommandRunner {
  config: RunnerConfig,
  commands: Vec<RegisteredCommand>,
}

impl CommandRunner {
  /// Register every descriptor as a subcommand.
  ///
  /// When a descriptor's name or one of its aliases is already taken by an
  /// earlier command, the earlier command is kept.
  pub fn new(config: RunnerConfig, descriptors: Vec<CommandDescriptor>) -> Result<Self, RunnerError> {
    let mut commands: Vec<RegisteredCommand> = Vec::with_capacity(descriptors.len());
    let mut claimed: HashSet<String> = HashSet::new();

    for descriptor in descriptors {
      let schema = ClapSchema::from_descriptor(&descriptor).map_err(|source| RunnerError::InvalidCommand {
        command: descriptor.command().to_string(),
        source,
      })?;

      let mut names = std::iter::once(schema.name()).chain(descriptor.aliases().iter().map(String::as_str));
      if let Some(taken) = names.find(|name| claimed.contains(*name)) {
        warn!(
          "Command '{}' is already registered; skipping '{}'",
          taken,
          descriptor.command()
        );
        continue;
      }

      let name = schema.name().to_string();
      let (command, layout) = schema
        .finish()
        .map_err(|source| RunnerError::ConflictingArgs { command: name, source })?;
      claimed.insert(command.get_name().to_string());
      claimed.extend(command.get_visible_aliases().map(str::to_string));
      debug!("Registered command '{}'", command.get_name());
      commands.push(RegisteredCommand {
        descriptor,
        command,
        layout,
      });
    }

    Ok(Self { config, commands })
  }

  pub fn config(&self) -> &RunnerConfig {
    &self.config
  }

  /// Names of the registered commands, in registration order
  pub fn command_names(&self) -> Vec<&str> {
    self.commands.iter().map(|registered| registered.command.get_name()).collect()
  }

  /// The top-level clap command with every registered subcommand attached
  pub fn command(&self) -> Command {
    let mut root = Command::new(self.config.script_name.clone())
      .version(env!("CARGO_PKG_VERSION"))
      .propagate_version(true)
      .disable_help_subcommand(true)
      .max_term_width(self.config.max_term_width)
      .subcommand_required(self.config.demand_command)
      .arg_required_else_help(self.config.demand_command)
      .arg(
        Arg::new("verbose")
          .short('v')
          .long("verbose")
          .action(ArgAction::Count)
          .global(true)
          .help("Sets the level of verbosity (can be used multiple times)"),
      )
      .arg(
        Arg::new("colors")
          .long("colors")
          .value_parser(value_parser!(ColorMode))
          .ignore_case(true)
          .default_value("auto")
          .global(true)
          .help("Controls when colored output is used"),
      );

    if let Some(about) = &self.config.about {
      root = root.about(about.clone());
    }

    for registered in &self.commands {
      root = root.subcommand(registered.command.clone());
    }

    root
  }

  /// Parse `argv` (including the binary name) into an invocation
  pub fn parse<I, T>(&self, argv: I) -> Result<Invocation, RunnerError>
  where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
  {
    let matches = self.command().try_get_matches_from(argv)?;
    let verbosity = matches.get_count("verbose");
    let colors = matches.get_one::<ColorMode>("colors").copied().unwrap_or_default();

    let (name, sub_matches) = matches.subcommand().ok_or(RunnerError::NoCommand)?;
    let registered = self
      .commands
      .iter()
      .find(|registered| registered.command.get_name() == name)
      .ok_or(RunnerError::NoCommand)?;

    let args = self.parsed_args(registered, name, sub_matches)?;
    debug!("Dispatching '{}' with {:?}", name, args.values);

    Ok(Invocation {
      descriptor: registered.descriptor.clone(),
      args,
      verbosity,
      colors,
    })
  }

  fn parsed_args(&self, registered: &RegisteredCommand, name: &str, matches: &ArgMatches) -> Result<ParsedArgs, RunnerError> {
    let parsed = ParsedArgs::new(self.config.script_name.clone()).command(name);
    Ok(registered.layout.read(matches, parsed)?)
  }

  /// Parse `argv` and run the selected command to completion
  pub async fn exec<I, T>(&self, argv: I) -> Result<()>
  where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
  {
    self.parse(argv)?.run().await
  }
}

/// A parsed invocation of one command
#[derive(Debug)]
pub struct Invocation {
  descriptor: CommandDescriptor,
  args: ParsedArgs,
  verbosity: u8,
  colors: ColorMode,
}

impl Invocation {
  pub fn name(&self) -> &str {
    self.descriptor.name()
  }

  pub fn args(&self) -> &ParsedArgs {
    &self.args
  }

  /// Number of `-v` flags given
  pub fn verbosity(&self) -> u8 {
    self.verbosity
  }

  pub fn colors(&self) -> ColorMode {
    self.colors
  }

  /// Await the command's handler; its error, if any, is returned unchanged
  pub async fn run(self) -> Result<()> {
    self.descriptor.handle(self.args).await
  }
}
