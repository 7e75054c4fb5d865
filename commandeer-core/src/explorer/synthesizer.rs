//! # Command Synthesis
//!
//! Turns annotated operations into [`CommandDescriptor`]s: a builder that
//! registers the command's options and positionals against an
//! [`OptionSchema`], and a handler that rebuilds the method's positional call
//! arguments from parsed input and awaits the bound method.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, warn};

use super::extractor::CommandCandidate;
use crate::args::{CallArg, CallArgs, ParsedArgs};
use crate::component::{BoundMethod, Instance};
use crate::metadata::{CommandMetadata, CommandOption, CommandParams, ParamKind};
use crate::schema::OptionSchema;

/// Registers a command's options and positionals
pub type CommandBuilder = Arc<dyn Fn(&mut dyn OptionSchema) + Send + Sync>;

/// Runs a command against parsed input
pub type CommandHandler = Arc<dyn Fn(ParsedArgs) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// A runnable command: identity fields, schema builder, and handler
#[derive(Clone)]
pub struct CommandDescriptor {
  metadata: Arc<CommandMetadata>,
  builder: CommandBuilder,
  handler: CommandHandler,
}

impl CommandDescriptor {
  /// Identity and help fields, copied from the metadata
  pub fn option(&self) -> &CommandOption {
    &self.metadata.option
  }

  pub fn name(&self) -> &str {
    self.metadata.option.name()
  }

  pub fn command(&self) -> &str {
    &self.metadata.option.command
  }

  pub fn describe(&self) -> Option<&str> {
    self.metadata.option.describe.as_deref()
  }

  pub fn aliases(&self) -> &[String] {
    &self.metadata.option.aliases
  }

  pub fn metadata(&self) -> &CommandMetadata {
    &self.metadata
  }

  pub fn params(&self) -> &CommandParams {
    &self.metadata.params
  }

  /// Register this command's options and positionals on `schema` and hand it back
  pub fn build<'s>(&self, schema: &'s mut dyn OptionSchema) -> &'s mut dyn OptionSchema {
    (self.builder)(&mut *schema);
    schema
  }

  /// Invoke the bound method with arguments drawn from `argv`
  pub fn handle(&self, argv: ParsedArgs) -> BoxFuture<'static, Result<()>> {
    (self.handler)(argv)
  }
}

impl fmt::Debug for CommandDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CommandDescriptor")
      .field("option", &self.metadata.option)
      .field("params", &self.metadata.params)
      .finish_non_exhaustive()
  }
}

/// Builds command descriptors for the annotated operations of one instance
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandSynthesizer;

impl CommandSynthesizer {
  pub fn new() -> Self {
    Self
  }

  /// One descriptor per candidate that carries metadata
  pub fn synthesize(&self, instance: &Instance, candidates: Vec<CommandCandidate>) -> Vec<CommandDescriptor> {
    candidates
      .into_iter()
      .filter_map(|candidate| {
        let metadata = candidate.metadata?;
        let Some(exec) = Arc::clone(instance).bind(candidate.method_name) else {
          warn!(
            "{} does not expose '{}'; skipping command",
            instance.type_name(),
            candidate.method_name
          );
          return None;
        };

        debug!(
          "Synthesized command '{}' from {}::{}",
          metadata.option.command,
          instance.type_name(),
          candidate.method_name
        );
        Some(self.descriptor(metadata, exec))
      })
      .collect()
  }

  fn descriptor(&self, metadata: Arc<CommandMetadata>, exec: BoundMethod) -> CommandDescriptor {
    warn_on_duplicate_indices(&metadata);

    let builder_metadata = Arc::clone(&metadata);
    let builder: CommandBuilder = Arc::new(move |schema: &mut dyn OptionSchema| {
      register_params(&builder_metadata, schema);
    });

    let handler_metadata = Arc::clone(&metadata);
    let handler: CommandHandler = Arc::new(move |argv: ParsedArgs| {
      let params = call_args(&handler_metadata, argv);
      let exec = Arc::clone(&exec);
      async move { exec(params).await }.boxed()
    });

    CommandDescriptor {
      metadata,
      builder,
      handler,
    }
  }
}

/// Register every `OPTION` and `POSITIONAL` binding on `schema`
pub fn register_params(metadata: &CommandMetadata, schema: &mut dyn OptionSchema) {
  for (kind, binding) in metadata.params.iter() {
    if !matches!(kind, ParamKind::Option | ParamKind::Positional) {
      continue;
    }
    let Some(config) = &binding.option else {
      warn!(
        "Command '{}' binds parameter {} as {:?} without a descriptor",
        metadata.option.command, binding.index, kind
      );
      continue;
    };

    match kind {
      ParamKind::Option => schema.option(&config.name, config),
      ParamKind::Positional => schema.positional(&config.name, config),
      ParamKind::Argv | ParamKind::Unknown => {}
    }
  }
}

/// Rebuild the method's call arguments from parsed input.
///
/// Slots are filled in binding order, so when two bindings share an index the
/// later one wins.
pub fn call_args(metadata: &CommandMetadata, argv: ParsedArgs) -> CallArgs {
  let mut args = CallArgs::with_len(metadata.params.arity());

  for (kind, binding) in metadata.params.iter() {
    match kind {
      ParamKind::Option | ParamKind::Positional => {
        let value = binding
          .name()
          .and_then(|name| argv.get(name))
          .cloned()
          .map(CallArg::Value);
        args.set(binding.index, value);
      }
      ParamKind::Argv => args.set(binding.index, Some(CallArg::Argv(argv.clone()))),
      ParamKind::Unknown => {}
    }
  }

  args
}

fn warn_on_duplicate_indices(metadata: &CommandMetadata) {
  let mut seen = HashSet::new();
  for (_, binding) in metadata.params.iter() {
    if !seen.insert(binding.index) {
      warn!(
        "Command '{}' binds parameter {} more than once; the last binding wins",
        metadata.option.command, binding.index
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::metadata::{ArgConfig, ParamBinding};

  #[derive(Default)]
  struct Recorder {
    calls: Vec<String>,
  }

  impl OptionSchema for Recorder {
    fn option(&mut self, name: &str, _config: &ArgConfig) {
      self.calls.push(format!("option {name}"));
    }

    fn positional(&mut self, name: &str, _config: &ArgConfig) {
      self.calls.push(format!("positional {name}"));
    }
  }

  fn copy_command() -> CommandMetadata {
    CommandMetadata::new(CommandOption::new("copy <target>"))
      .option(0, ArgConfig::new("force").boolean())
      .positional(1, ArgConfig::new("target"))
      .argv(2)
  }

  #[test]
  fn test_register_params_skips_argv_and_unknown() {
    let mut metadata = copy_command();
    metadata.params.push(ParamKind::Unknown, ParamBinding::new(3, Some(ArgConfig::new("env"))));
    let mut recorder = Recorder::default();

    register_params(&metadata, &mut recorder);

    assert_eq!(recorder.calls, vec!["option force", "positional target"]);
  }

  #[test]
  fn test_register_params_skips_bindings_without_descriptor() {
    let mut metadata = CommandMetadata::new(CommandOption::new("broken"));
    metadata.params.push(ParamKind::Option, ParamBinding::new(0, None));
    let mut recorder = Recorder::default();

    register_params(&metadata, &mut recorder);

    assert!(recorder.calls.is_empty());
  }

  #[test]
  fn test_call_args_places_values_by_index() {
    let argv = ParsedArgs::new("bin")
      .command("copy")
      .with("force", true)
      .with("target", "a.txt");

    let args = call_args(&copy_command(), argv.clone());

    assert_eq!(args.len(), 3);
    assert_eq!(args.value(0), Some(&json!(true)));
    assert_eq!(args.value(1), Some(&json!("a.txt")));
    assert_eq!(args.argv(2), Some(&argv));
  }

  #[test]
  fn test_call_args_ignores_unknown_kinds() {
    let mut metadata = copy_command();
    metadata.params.push(ParamKind::Unknown, ParamBinding::new(1, Some(ArgConfig::new("env"))));
    metadata.params.push(ParamKind::Unknown, ParamBinding::new(3, Some(ArgConfig::new("env"))));
    let argv = ParsedArgs::new("bin")
      .command("copy")
      .with("force", true)
      .with("target", "a.txt")
      .with("env", "prod");

    let args = call_args(&metadata, argv.clone());

    assert_eq!(args.len(), 4);
    assert_eq!(args.value(0), Some(&json!(true)));
    assert_eq!(args.value(1), Some(&json!("a.txt")));
    assert_eq!(args.argv(2), Some(&argv));
    assert!(args.slot(3).is_none());
  }

  #[test]
  fn test_call_args_leaves_missing_names_and_gaps_empty() {
    let metadata = CommandMetadata::new(CommandOption::new("gap"))
      .option(0, ArgConfig::new("present"))
      .option(3, ArgConfig::new("absent"));

    let args = call_args(&metadata, ParsedArgs::new("bin").with("present", 1));

    assert_eq!(args.len(), 4);
    assert_eq!(args.value(0), Some(&json!(1)));
    assert!(args.slot(1).is_none());
    assert!(args.slot(2).is_none());
    assert!(args.slot(3).is_none());
  }

  #[test]
  fn test_call_args_last_binding_wins() {
    let metadata = CommandMetadata::new(CommandOption::new("dup"))
      .option(0, ArgConfig::new("first"))
      .positional(0, ArgConfig::new("second"));

    let args = call_args(&metadata, ParsedArgs::new("bin").with("first", "a").with("second", "b"));

    assert_eq!(args.value(0), Some(&json!("b")));
  }

  #[test]
  fn test_call_args_without_params_is_empty() {
    let args = call_args(
      &CommandMetadata::new(CommandOption::new("ping")),
      ParsedArgs::new("bin"),
    );

    assert!(args.is_empty());
  }
}
