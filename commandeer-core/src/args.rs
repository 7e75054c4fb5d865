//! # Parsed and Call Arguments
//!
//! [`ParsedArgs`] is what the CLI parser hands to a command handler.
//! [`CallArgs`] is the positional argument list the handler reconstructs from
//! it before invoking the bound method.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Parsed command-line input, keyed by option and positional name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedArgs {
  /// Name the program was invoked as (`$0`)
  #[serde(rename = "$0")]
  pub script: String,
  /// Command path that was matched (`_`)
  #[serde(rename = "_")]
  pub commands: Vec<String>,
  /// Named values; names the user did not supply are absent
  #[serde(flatten)]
  pub values: BTreeMap<String, Value>,
}

impl ParsedArgs {
  pub fn new(script: impl Into<String>) -> Self {
    Self {
      script: script.into(),
      ..Default::default()
    }
  }

  pub fn command(mut self, command: impl Into<String>) -> Self {
    self.commands.push(command.into());
    self
  }

  pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.insert(name, value);
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    self.values.insert(name.into(), value.into());
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.values.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }
}

/// A single filled call slot
#[derive(Debug, Clone, PartialEq)]
pub enum CallArg {
  /// Value of one option or positional
  Value(Value),
  /// The whole parsed-arguments object
  Argv(ParsedArgs),
}

/// Errors raised while reading typed values out of [`CallArgs`]
#[derive(Debug, Error)]
pub enum CallArgError {
  #[error("argument {index} does not hold a value")]
  NotAValue { index: usize },
  #[error("argument {index} has an unexpected shape: {source}")]
  Deserialize {
    index: usize,
    #[source]
    source: serde_json::Error,
  },
}

/// Sparse, ordered call-argument list handed to a bound method.
///
/// Slots that no binding targets, or whose source name was absent from the
/// parsed input, are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
  slots: Vec<Option<CallArg>>,
}

impl CallArgs {
  /// Empty list sized for `len` slots
  pub fn with_len(len: usize) -> Self {
    Self { slots: vec![None; len] }
  }

  /// Fill slot `index`, growing the list as needed and replacing any earlier value
  pub fn set(&mut self, index: usize, arg: Option<CallArg>) {
    if index >= self.slots.len() {
      self.slots.resize(index + 1, None);
    }
    self.slots[index] = arg;
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  pub fn slot(&self, index: usize) -> Option<&CallArg> {
    self.slots.get(index).and_then(Option::as_ref)
  }

  /// Raw value in slot `index`, if it holds one
  pub fn value(&self, index: usize) -> Option<&Value> {
    match self.slot(index) {
      Some(CallArg::Value(value)) => Some(value),
      _ => None,
    }
  }

  /// Parsed-arguments object in slot `index`, if it holds one
  pub fn argv(&self, index: usize) -> Option<&ParsedArgs> {
    match self.slot(index) {
      Some(CallArg::Argv(argv)) => Some(argv),
      _ => None,
    }
  }

  /// Deserialize slot `index` into `T`.
  ///
  /// An empty slot reads as `null`, so optional parameters should ask for
  /// `Option<T>`.
  pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, CallArgError> {
    let value = match self.slot(index) {
      None => Value::Null,
      Some(CallArg::Value(value)) => value.clone(),
      Some(CallArg::Argv(_)) => return Err(CallArgError::NotAValue { index }),
    };
    serde_json::from_value(value).map_err(|source| CallArgError::Deserialize { index, source })
  }

  pub fn iter(&self) -> impl Iterator<Item = Option<&CallArg>> {
    self.slots.iter().map(Option::as_ref)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_parsed_args_serialize_like_an_argv_object() {
    let argv = ParsedArgs::new("commandeer")
      .command("create:user")
      .with("username", "alice")
      .with("admin", true);

    assert_eq!(
      serde_json::to_value(&argv).unwrap(),
      json!({ "$0": "commandeer", "_": ["create:user"], "username": "alice", "admin": true })
    );
  }

  #[test]
  fn test_set_grows_and_overwrites() {
    let mut args = CallArgs::with_len(1);
    args.set(2, Some(CallArg::Value(json!("late"))));
    args.set(2, Some(CallArg::Value(json!("later"))));

    assert_eq!(args.len(), 3);
    assert!(args.slot(0).is_none());
    assert!(args.slot(1).is_none());
    assert_eq!(args.value(2), Some(&json!("later")));
  }

  #[test]
  fn test_typed_reads() {
    let mut args = CallArgs::with_len(3);
    args.set(0, Some(CallArg::Value(json!(true))));
    args.set(2, Some(CallArg::Argv(ParsedArgs::new("bin"))));

    assert!(args.get::<bool>(0).unwrap());
    assert_eq!(args.get::<Option<String>>(1).unwrap(), None);
    assert!(matches!(args.get::<String>(1), Err(CallArgError::Deserialize { index: 1, .. })));
    assert!(matches!(args.get::<bool>(2), Err(CallArgError::NotAValue { index: 2 })));
    assert_eq!(args.argv(2).map(|argv| argv.script.as_str()), Some("bin"));
  }
}
