//! # Command Strings
//!
//! Parses the command string carried by command metadata, e.g.
//! `create:user <username> [group]`, into a command name and the positionals
//! it declares. `<x>` is required, `[x]` optional, and a trailing `..` makes
//! the positional variadic.

use thiserror::Error;

/// A positional declared in a command string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalSpec {
  pub name: String,
  pub required: bool,
  pub variadic: bool,
}

/// A parsed command string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub name: String,
  pub positionals: Vec<PositionalSpec>,
}

/// Errors raised for malformed command strings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandSpecError {
  #[error("command string is empty")]
  Empty,
  #[error("'{0}' is not a positional placeholder; expected <name> or [name]")]
  InvalidPlaceholder(String),
  #[error("positional placeholder '{0}' has no name")]
  UnnamedPlaceholder(String),
  #[error("variadic positional '{0}' must be the last placeholder")]
  VariadicNotLast(String),
}

impl CommandSpec {
  /// Parse a command string
  pub fn parse(command: &str) -> Result<Self, CommandSpecError> {
    let mut tokens = command.split_whitespace();
    let name = tokens.next().ok_or(CommandSpecError::Empty)?.to_string();

    let mut positionals: Vec<PositionalSpec> = Vec::new();
    for token in tokens {
      if let Some(previous) = positionals.last()
        && previous.variadic
      {
        return Err(CommandSpecError::VariadicNotLast(previous.name.clone()));
      }
      positionals.push(parse_placeholder(token)?);
    }

    Ok(Self { name, positionals })
  }

  pub fn positional(&self, name: &str) -> Option<&PositionalSpec> {
    self.positionals.iter().find(|positional| positional.name == name)
  }
}

fn parse_placeholder(token: &str) -> Result<PositionalSpec, CommandSpecError> {
  let (inner, required) = if let Some(inner) = token.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
    (inner, true)
  } else if let Some(inner) = token.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
    (inner, false)
  } else {
    return Err(CommandSpecError::InvalidPlaceholder(token.to_string()));
  };

  let (name, variadic) = match inner.strip_suffix("..") {
    Some(name) => (name, true),
    None => (inner, false),
  };

  if name.is_empty() {
    return Err(CommandSpecError::UnnamedPlaceholder(token.to_string()));
  }

  Ok(PositionalSpec {
    name: name.to_string(),
    required,
    variadic,
  })
}
