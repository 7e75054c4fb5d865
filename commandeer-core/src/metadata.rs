//! # Command Metadata
//!
//! Declarative records attached to component methods that mark them as CLI
//! command handlers. A record describes the command itself ([`CommandOption`])
//! and how each method parameter is sourced from parsed command-line input
//! ([`CommandParams`]).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// How a method parameter receives its value when the command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamKind {
  /// A named flag (`--force`)
  Option,
  /// A positional argument (`<target>`)
  Positional,
  /// The whole parsed-arguments object
  Argv,
  /// A tag this version does not understand; ignored by builder and handler
  #[serde(other)]
  Unknown,
}

/// Value type of a CLI option or positional, as understood by the parser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
  #[default]
  String,
  Boolean,
  Number,
  Count,
  Array,
}

/// Parser-facing descriptor for a single option or positional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgConfig {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub describe: Option<String>,
  #[serde(default, rename = "type")]
  pub kind: ArgKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default: Option<Value>,
  #[serde(default)]
  pub required: bool,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub alias: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub short: Option<char>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub choices: Vec<String>,
}

impl ArgConfig {
  /// Create a string-typed descriptor with the given name
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Default::default()
    }
  }

  pub fn describe(mut self, describe: impl Into<String>) -> Self {
    self.describe = Some(describe.into());
    self
  }

  pub fn kind(mut self, kind: ArgKind) -> Self {
    self.kind = kind;
    self
  }

  pub fn boolean(self) -> Self {
    self.kind(ArgKind::Boolean)
  }

  pub fn number(self) -> Self {
    self.kind(ArgKind::Number)
  }

  pub fn count(self) -> Self {
    self.kind(ArgKind::Count)
  }

  pub fn array(self) -> Self {
    self.kind(ArgKind::Array)
  }

  pub fn default_value(mut self, value: impl Into<Value>) -> Self {
    self.default = Some(value.into());
    self
  }

  pub fn required(mut self) -> Self {
    self.required = true;
    self
  }

  pub fn alias(mut self, alias: impl Into<String>) -> Self {
    self.alias.push(alias.into());
    self
  }

  pub fn short(mut self, short: char) -> Self {
    self.short = Some(short);
    self
  }

  pub fn choices<I, S>(mut self, choices: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.choices = choices.into_iter().map(Into::into).collect();
    self
  }
}

/// Binds one method parameter slot to a source of parsed input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamBinding {
  /// Zero-based position of the target parameter in the method's argument list
  pub index: usize,
  /// Descriptor for `OPTION`/`POSITIONAL` bindings; absent for `ARGV`
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub option: Option<ArgConfig>,
}

impl ParamBinding {
  pub fn new(index: usize, option: Option<ArgConfig>) -> Self {
    Self { index, option }
  }

  /// Name of the option or positional this binding reads, if it has one
  pub fn name(&self) -> Option<&str> {
    self.option.as_ref().map(|option| option.name.as_str())
  }
}

/// All bindings of one kind, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGroup {
  pub kind: ParamKind,
  pub bindings: Vec<ParamBinding>,
}

/// Mapping from parameter kind to its bindings.
///
/// Each kind appears at most once and kinds keep the order in which they were
/// first declared. That order, followed by binding order within a kind, is the
/// order the handler assigns call slots in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CommandParams {
  groups: Vec<ParamGroup>,
}

impl<'de> Deserialize<'de> for CommandParams {
  /// Groups repeating a kind are merged into its first occurrence
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let mut params = CommandParams::new();
    for group in Vec::<ParamGroup>::deserialize(deserializer)? {
      for binding in group.bindings {
        params.push(group.kind, binding);
      }
    }
    Ok(params)
  }
}

impl CommandParams {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a binding under `kind`, creating the group on first use
  pub fn push(&mut self, kind: ParamKind, binding: ParamBinding) {
    match self.groups.iter_mut().find(|group| group.kind == kind) {
      Some(group) => group.bindings.push(binding),
      None => self.groups.push(ParamGroup {
        kind,
        bindings: vec![binding],
      }),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.groups.iter().all(|group| group.bindings.is_empty())
  }

  pub fn groups(&self) -> &[ParamGroup] {
    &self.groups
  }

  /// Bindings declared for a single kind
  pub fn get(&self, kind: ParamKind) -> &[ParamBinding] {
    self
      .groups
      .iter()
      .find(|group| group.kind == kind)
      .map(|group| group.bindings.as_slice())
      .unwrap_or_default()
  }

  /// Visit every binding in assignment order
  pub fn iter(&self) -> impl Iterator<Item = (ParamKind, &ParamBinding)> {
    self
      .groups
      .iter()
      .flat_map(|group| group.bindings.iter().map(move |binding| (group.kind, binding)))
  }

  /// Number of call slots needed to hold every bound index
  pub fn arity(&self) -> usize {
    self.iter().map(|(_, binding)| binding.index + 1).max().unwrap_or(0)
  }
}

/// Identity and help fields of a command, handed to the parser verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
  /// Command string, e.g. `create:user <username> [group]`
  pub command: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub describe: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub aliases: Vec<String>,
  #[serde(default)]
  pub deprecated: bool,
}

impl CommandOption {
  pub fn new(command: impl Into<String>) -> Self {
    Self {
      command: command.into(),
      ..Default::default()
    }
  }

  pub fn describe(mut self, describe: impl Into<String>) -> Self {
    self.describe = Some(describe.into());
    self
  }

  pub fn alias(mut self, alias: impl Into<String>) -> Self {
    self.aliases.push(alias.into());
    self
  }

  pub fn deprecated(mut self) -> Self {
    self.deprecated = true;
    self
  }

  /// The command name without any positional placeholders
  pub fn name(&self) -> &str {
    self.command.split_whitespace().next().unwrap_or_default()
  }
}

/// Metadata record attached to a command handler method
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandMetadata {
  pub option: CommandOption,
  #[serde(default, skip_serializing_if = "CommandParams::is_empty")]
  pub params: CommandParams,
}

impl CommandMetadata {
  /// Start a record for the given command
  pub fn new(option: CommandOption) -> Self {
    Self {
      option,
      params: CommandParams::new(),
    }
  }

  /// Bind parameter `index` to a named option
  pub fn option(mut self, index: usize, config: ArgConfig) -> Self {
    self.params.push(ParamKind::Option, ParamBinding::new(index, Some(config)));
    self
  }

  /// Bind parameter `index` to a positional argument
  pub fn positional(mut self, index: usize, config: ArgConfig) -> Self {
    self
      .params
      .push(ParamKind::Positional, ParamBinding::new(index, Some(config)));
    self
  }

  /// Bind parameter `index` to the whole parsed-arguments object
  pub fn argv(mut self, index: usize) -> Self {
    self.params.push(ParamKind::Argv, ParamBinding::new(index, None));
    self
  }
}
