//! # Clap-Backed Option Schema
//!
//! Adapts synthesized command builders to clap: positionals are laid out in
//! command-string order, options become long flags, and parsed matches are
//! read back into [`ParsedArgs`] using the kinds that were registered.

use std::collections::HashSet;

use clap::builder::PossibleValuesParser;
use clap::parser::MatchesError;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use commandeer_core::{ArgConfig, ArgKind, CommandDescriptor, OptionSchema, ParsedArgs};
use serde_json::Value;
use thiserror::Error;

use crate::command_spec::{CommandSpec, CommandSpecError, PositionalSpec};

/// Argument names the runner defines on every command, plus clap's help and version
pub const RESERVED_NAMES: &[&str] = &["help", "version", "verbose", "colors"];

/// Short flags taken by the reserved arguments
pub const RESERVED_SHORTS: &[char] = &['h', 'V', 'v'];

/// An argument registered on a clap command and the kind it is read back as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSlot {
  pub name: String,
  pub kind: ArgKind,
}

/// Raised when a registered argument cannot be read back from clap's matches
#[derive(Debug, Error)]
#[error("failed to read argument '{name}'")]
pub struct ArgReadError {
  pub name: String,
  #[source]
  pub source: MatchesError,
}

/// Two arguments of one command, or an argument and the runner, claim the same name or flag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgConflict {
  #[error("argument name '{0}' is reserved")]
  ReservedName(String),
  #[error("short flag '-{0}' is reserved")]
  ReservedShort(char),
  #[error("argument name '{0}' is used more than once")]
  DuplicateName(String),
  #[error("short flag '-{0}' is used more than once")]
  DuplicateShort(char),
}

/// Names and short flags already claimed on one command
#[derive(Debug, Default)]
struct ClaimedArgs {
  names: HashSet<String>,
  shorts: HashSet<char>,
}

impl ClaimedArgs {
  fn name(&mut self, name: &str) -> Result<(), ArgConflict> {
    if RESERVED_NAMES.contains(&name) {
      return Err(ArgConflict::ReservedName(name.to_string()));
    }
    if !self.names.insert(name.to_string()) {
      return Err(ArgConflict::DuplicateName(name.to_string()));
    }
    Ok(())
  }

  fn short(&mut self, short: char) -> Result<(), ArgConflict> {
    if RESERVED_SHORTS.contains(&short) {
      return Err(ArgConflict::ReservedShort(short));
    }
    if !self.shorts.insert(short) {
      return Err(ArgConflict::DuplicateShort(short));
    }
    Ok(())
  }

  fn option(&mut self, config: &ArgConfig) -> Result<(), ArgConflict> {
    self.name(&config.name)?;
    for alias in &config.alias {
      self.name(alias)?;
    }
    if let Some(short) = config.short {
      self.short(short)?;
    }
    Ok(())
  }
}

/// The names and kinds a finished command reads from its matches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgLayout {
  slots: Vec<ArgSlot>,
}

impl ArgLayout {
  pub fn slots(&self) -> &[ArgSlot] {
    &self.slots
  }

  fn push(&mut self, name: &str, kind: ArgKind) {
    self.slots.push(ArgSlot {
      name: name.to_string(),
      kind,
    });
  }

  /// Convert clap matches into a parsed-arguments object.
  ///
  /// Names with no value in `matches` are left out.
  pub fn read(&self, matches: &ArgMatches, mut parsed: ParsedArgs) -> Result<ParsedArgs, ArgReadError> {
    for slot in &self.slots {
      let value = read_value(matches, &slot.name, slot.kind).map_err(|source| ArgReadError {
        name: slot.name.clone(),
        source,
      })?;
      if let Some(value) = value {
        parsed.insert(slot.name.clone(), value);
      }
    }
    Ok(parsed)
  }
}

/// [`OptionSchema`] that builds a clap subcommand
#[derive(Debug)]
pub struct ClapSchema {
  command: Command,
  spec: CommandSpec,
  options: Vec<ArgConfig>,
  positionals: Vec<ArgConfig>,
}

impl ClapSchema {
  /// Start a subcommand for the given command string
  pub fn new(spec: CommandSpec) -> Self {
    Self {
      command: Command::new(spec.name.clone()),
      spec,
      options: Vec::new(),
      positionals: Vec::new(),
    }
  }

  /// Build the subcommand for a discovered command
  pub fn from_descriptor(descriptor: &CommandDescriptor) -> Result<Self, CommandSpecError> {
    let option = descriptor.option();
    let mut schema = Self::new(CommandSpec::parse(&option.command)?);

    let mut command = std::mem::take(&mut schema.command);
    if let Some(describe) = &option.describe {
      command = command.about(describe.clone());
    }
    let aliases = schema.aliases(&option.aliases);
    if !aliases.is_empty() {
      command = command.visible_aliases(aliases);
    }
    if option.deprecated {
      command = command.hide(true);
    }
    schema.command = command;

    descriptor.build(&mut schema);
    Ok(schema)
  }

  pub fn name(&self) -> &str {
    &self.spec.name
  }

  /// `aliases` without repeats or the command's own name
  fn aliases(&self, aliases: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(aliases.len());
    for alias in aliases {
      if alias != &self.spec.name && !unique.contains(alias) {
        unique.push(alias.clone());
      }
    }
    unique
  }

  /// Lay out the arguments and return the finished subcommand with its layout.
  ///
  /// Positionals named in the command string come first, in that order, then
  /// any others in registration order, then options.
  pub fn finish(self) -> Result<(Command, ArgLayout), ArgConflict> {
    let Self {
      mut command,
      spec,
      options,
      mut positionals,
    } = self;
    let mut layout = ArgLayout::default();
    let mut claimed = ClaimedArgs::default();

    let mut ordered: Vec<(ArgConfig, Option<&PositionalSpec>)> = Vec::with_capacity(positionals.len());
    for declared in &spec.positionals {
      let config = match positionals.iter().position(|config| config.name == declared.name) {
        Some(index) => positionals.remove(index),
        None => ArgConfig::new(declared.name.clone()),
      };
      ordered.push((config, Some(declared)));
    }
    ordered.extend(positionals.into_iter().map(|config| (config, None)));

    for (config, declared) in ordered {
      claimed.name(&config.name)?;
      let (arg, kind) = positional_arg(&config, declared);
      layout.push(&config.name, kind);
      command = command.arg(arg);
    }

    for config in options {
      claimed.option(&config)?;
      command = command.arg(option_arg(&config));
      layout.push(&config.name, config.kind);
    }

    Ok((command, layout))
  }
}

impl OptionSchema for ClapSchema {
  fn option(&mut self, name: &str, config: &ArgConfig) {
    let mut config = config.clone();
    config.name = name.to_string();
    self.options.push(config);
  }

  fn positional(&mut self, name: &str, config: &ArgConfig) {
    let mut config = config.clone();
    config.name = name.to_string();
    self.positionals.push(config);
  }
}

fn option_arg(config: &ArgConfig) -> Arg {
  let mut arg = Arg::new(config.name.clone()).long(config.name.clone());
  if let Some(short) = config.short {
    arg = arg.short(short);
  }
  if !config.alias.is_empty() {
    arg = arg.visible_aliases(config.alias.clone());
  }

  arg = match config.kind {
    ArgKind::Boolean => arg.action(ArgAction::SetTrue),
    ArgKind::Count => arg.action(ArgAction::Count),
    ArgKind::Number => arg.action(ArgAction::Set).value_parser(value_parser!(f64)),
    ArgKind::Array => arg.action(ArgAction::Append).num_args(1..),
    ArgKind::String => arg.action(ArgAction::Set),
  };

  with_common(arg, config, config.kind)
}

fn positional_arg(config: &ArgConfig, declared: Option<&PositionalSpec>) -> (Arg, ArgKind) {
  let variadic = declared.is_some_and(|spec| spec.variadic) || config.kind == ArgKind::Array;
  let kind = match config.kind {
    _ if variadic => ArgKind::Array,
    ArgKind::Count => ArgKind::String,
    kind => kind,
  };

  let mut arg = Arg::new(config.name.clone()).value_name(config.name.to_uppercase());
  arg = match kind {
    ArgKind::Array => arg.action(ArgAction::Append).num_args(1..),
    ArgKind::Boolean => arg.action(ArgAction::Set).value_parser(value_parser!(bool)),
    ArgKind::Number => arg.action(ArgAction::Set).value_parser(value_parser!(f64)),
    ArgKind::String | ArgKind::Count => arg.action(ArgAction::Set),
  };
  if declared.is_some_and(|spec| spec.required) {
    arg = arg.required(true);
  }

  (with_common(arg, config, kind), kind)
}

fn with_common(mut arg: Arg, config: &ArgConfig, kind: ArgKind) -> Arg {
  if let Some(describe) = &config.describe {
    arg = arg.help(describe.clone());
  }
  if config.required {
    arg = arg.required(true);
  }
  if !config.choices.is_empty() && matches!(kind, ArgKind::String | ArgKind::Array) {
    arg = arg.value_parser(PossibleValuesParser::new(config.choices.clone()));
  }
  if let Some(default) = &config.default {
    let defaults = default_strings(default);
    if !defaults.is_empty() {
      arg = arg.default_values(defaults);
    }
  }
  arg
}

fn default_strings(value: &Value) -> Vec<String> {
  match value {
    Value::Null => Vec::new(),
    Value::String(text) => vec![text.clone()],
    Value::Array(items) => items.iter().flat_map(default_strings).collect(),
    other => vec![other.to_string()],
  }
}

fn read_value(matches: &ArgMatches, name: &str, kind: ArgKind) -> Result<Option<Value>, MatchesError> {
  let value = match kind {
    ArgKind::Boolean => matches.try_get_one::<bool>(name)?.map(|flag| Value::Bool(*flag)),
    ArgKind::Count => matches.try_get_one::<u8>(name)?.map(|count| Value::from(*count)),
    ArgKind::Number => matches.try_get_one::<f64>(name)?.map(|number| number_value(*number)),
    ArgKind::String => matches.try_get_one::<String>(name)?.map(|text| Value::String(text.clone())),
    ArgKind::Array => matches
      .try_get_many::<String>(name)?
      .map(|values| Value::Array(values.map(|text| Value::String(text.clone())).collect())),
  };
  Ok(value)
}

fn number_value(number: f64) -> Value {
  if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
    Value::from(number as i64)
  } else {
    serde_json::Number::from_f64(number).map(Value::Number).unwrap_or(Value::Null)
  }
}

#[cfg(test)]
mod tests {
  use commandeer_core::{CommandMetadata, CommandOption, Container, MetadataStore, ParsedArgs};
  use commandeer_test_utils::RecordingComponent;
  use serde_json::json;
  use test_case::test_case;

  use super::*;

  fn schema_for(command: &str) -> ClapSchema {
    ClapSchema::new(CommandSpec::parse(command).unwrap())
  }

  fn parse(schema: ClapSchema, argv: &[&str]) -> ParsedArgs {
    let name = schema.name().to_string();
    let (command, layout) = schema.finish().unwrap();
    let matches = command.no_binary_name(true).try_get_matches_from(argv).unwrap();
    layout.read(&matches, ParsedArgs::new("test").command(name)).unwrap()
  }

  #[test]
  fn test_positionals_follow_command_string_order() {
    let mut schema = schema_for("copy <src> <dst>");
    schema.positional("dst", &ArgConfig::new("dst").describe("Destination"));
    schema.positional("extra", &ArgConfig::new("extra"));
    schema.positional("src", &ArgConfig::new("src"));

    let (command, layout) = schema.finish().unwrap();

    let names: Vec<&str> = layout.slots().iter().map(|slot| slot.name.as_str()).collect();
    assert_eq!(names, vec!["src", "dst", "extra"]);
    let dst = command.get_arguments().find(|arg| arg.get_id() == "dst").unwrap();
    assert!(dst.is_required_set());
    assert_eq!(dst.get_help().map(ToString::to_string), Some("Destination".to_string()));
  }

  #[test]
  fn test_reads_typed_values() {
    let mut schema = schema_for("build <target>");
    schema.option("release", &ArgConfig::new("release").boolean());
    schema.option("jobs", &ArgConfig::new("jobs").number().short('j'));
    schema.option("level", &ArgConfig::new("level").count().short('l'));
    schema.option("feature", &ArgConfig::new("feature").array());
    schema.option("profile", &ArgConfig::new("profile").default_value("dev"));

    let parsed = parse(
      schema,
      &["app", "--release", "-j", "4", "-ll", "--feature", "a", "b"],
    );

    assert_eq!(parsed.get("target"), Some(&json!("app")));
    assert_eq!(parsed.get("release"), Some(&json!(true)));
    assert_eq!(parsed.get("jobs"), Some(&json!(4)));
    assert_eq!(parsed.get("level"), Some(&json!(2)));
    assert_eq!(parsed.get("feature"), Some(&json!(["a", "b"])));
    assert_eq!(parsed.get("profile"), Some(&json!("dev")));
    assert_eq!(parsed.commands, vec!["build".to_string()]);
  }

  #[test]
  fn test_missing_optional_values_are_absent() {
    let mut schema = schema_for("greet [name]");
    schema.option("greeting", &ArgConfig::new("greeting"));
    schema.option("ratio", &ArgConfig::new("ratio").number());

    let parsed = parse(schema, &[]);

    assert!(!parsed.contains("name"));
    assert!(!parsed.contains("greeting"));
    assert!(!parsed.contains("ratio"));
  }

  #[test]
  fn test_variadic_positional_collects_values() {
    let parsed = parse(schema_for("echo <words..>"), &["hello", "there"]);

    assert_eq!(parsed.get("words"), Some(&json!(["hello", "there"])));
  }

  #[test]
  fn test_required_positional_is_enforced() {
    let (command, _) = schema_for("copy <src>").finish().unwrap();

    let err = command.no_binary_name(true).try_get_matches_from(Vec::<&str>::new()).unwrap_err();

    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
  }

  #[test]
  fn test_choices_reject_unknown_values() {
    let mut schema = schema_for("deploy");
    schema.option("env", &ArgConfig::new("env").choices(["staging", "prod"]));
    let (command, _) = schema.finish().unwrap();

    let err = command
      .no_binary_name(true)
      .try_get_matches_from(["--env", "dev"])
      .unwrap_err();

    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
  }

  fn descriptor_for(metadata: CommandMetadata) -> CommandDescriptor {
    let container = Container::new().module("fixtures", |module| {
      module.provide(RecordingComponent::new());
    });
    let mut store = MetadataStore::new();
    store.command::<RecordingComponent>("record", metadata);
    commandeer_core::explore(&container, &store).remove(0)
  }

  #[test]
  fn test_from_descriptor_copies_identity_and_registers_bindings() {
    let descriptor = descriptor_for(
      CommandMetadata::new(
        CommandOption::new("record <entry>")
          .describe("Record an entry")
          .alias("rec"),
      )
      .positional(0, ArgConfig::new("entry"))
      .option(1, ArgConfig::new("tag").short('t')),
    );

    let schema = ClapSchema::from_descriptor(&descriptor).unwrap();
    let (command, layout) = schema.finish().unwrap();

    assert_eq!(command.get_name(), "record");
    assert_eq!(command.get_about().map(ToString::to_string), Some("Record an entry".to_string()));
    assert_eq!(command.get_visible_aliases().collect::<Vec<_>>(), vec!["rec"]);
    let names: Vec<&str> = layout.slots().iter().map(|slot| slot.name.as_str()).collect();
    assert_eq!(names, vec!["entry", "tag"]);
  }

  #[test]
  fn test_from_descriptor_drops_repeated_aliases() {
    let descriptor = descriptor_for(CommandMetadata::new(
      CommandOption::new("record").alias("record").alias("rec").alias("rec"),
    ));

    let (command, _) = ClapSchema::from_descriptor(&descriptor).unwrap().finish().unwrap();

    assert_eq!(command.get_visible_aliases().collect::<Vec<_>>(), vec!["rec"]);
  }

  #[test_case("record", ArgConfig::new("verbose").count() => ArgConflict::ReservedName("verbose".into()) ; "runner verbose flag")]
  #[test_case("record", ArgConfig::new("colors") => ArgConflict::ReservedName("colors".into()) ; "runner colors flag")]
  #[test_case("record", ArgConfig::new("loud").boolean().short('v') => ArgConflict::ReservedShort('v') ; "runner verbose short")]
  #[test_case("record", ArgConfig::new("show").short('h') => ArgConflict::ReservedShort('h') ; "help short")]
  #[test_case("record <entry>", ArgConfig::new("entry") => ArgConflict::DuplicateName("entry".into()) ; "command string positional")]
  #[test_case("record", ArgConfig::new("tag").alias("label") => ArgConflict::DuplicateName("label".into()) ; "alias of another option")]
  #[test_case("record", ArgConfig::new("tail").short('t') => ArgConflict::DuplicateShort('t') ; "short of another option")]
  fn test_conflicting_option_is_rejected(command: &str, config: ArgConfig) -> ArgConflict {
    let mut schema = schema_for(command);
    schema.option("label", &ArgConfig::new("label").short('t'));
    schema.option(&config.name, &config);

    schema.finish().unwrap_err()
  }

  #[test]
  fn test_repeated_positional_is_rejected() {
    let mut schema = schema_for("copy <src>");
    schema.positional("src", &ArgConfig::new("src"));
    schema.positional("src", &ArgConfig::new("src"));

    assert_eq!(schema.finish().unwrap_err(), ArgConflict::DuplicateName("src".into()));
  }

  #[test]
  fn test_from_descriptor_rejects_empty_command() {
    let descriptor = descriptor_for(CommandMetadata::new(CommandOption::new("")));

    assert_eq!(ClapSchema::from_descriptor(&descriptor).unwrap_err(), CommandSpecError::Empty);
  }

  #[test_case(1.0 => json!(1) ; "whole number")]
  #[test_case(-3.0 => json!(-3) ; "negative whole number")]
  #[test_case(0.5 => json!(0.5) ; "fraction")]
  #[test_case(f64::NAN => Value::Null ; "not a number")]
  fn test_number_value(number: f64) -> Value {
    number_value(number)
  }

  #[test_case(json!("x") => vec!["x".to_string()] ; "string")]
  #[test_case(json!(true) => vec!["true".to_string()] ; "boolean")]
  #[test_case(json!(8) => vec!["8".to_string()] ; "number")]
  #[test_case(json!(["a", 1]) => vec!["a".to_string(), "1".to_string()] ; "array")]
  #[test_case(Value::Null => Vec::<String>::new() ; "null")]
  fn test_default_strings(value: Value) -> Vec<String> {
    default_strings(&value)
  }
}
