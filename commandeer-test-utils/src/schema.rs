//! Option schema that records every registration it receives

use commandeer_core::{ArgConfig, OptionSchema};

/// Which registration operation was called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
  Option,
  Positional,
}

/// A recorded registration call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
  pub registration: Registration,
  pub name: String,
  pub config: ArgConfig,
}

/// An [`OptionSchema`] that remembers calls instead of building a parser
#[derive(Debug, Default)]
pub struct RecordingSchema {
  pub calls: Vec<RecordedCall>,
}

impl RecordingSchema {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn options(&self) -> Vec<&RecordedCall> {
    self.by(Registration::Option)
  }

  pub fn positionals(&self) -> Vec<&RecordedCall> {
    self.by(Registration::Positional)
  }

  fn by(&self, registration: Registration) -> Vec<&RecordedCall> {
    self
      .calls
      .iter()
      .filter(|call| call.registration == registration)
      .collect()
  }

  /// One line per call, e.g. `option force (boolean)`
  pub fn listing(&self) -> String {
    self
      .calls
      .iter()
      .map(|call| {
        let registration = match call.registration {
          Registration::Option => "option",
          Registration::Positional => "positional",
        };
        let kind = format!("{:?}", call.config.kind).to_lowercase();
        format!("{registration} {} ({kind})", call.name)
      })
      .collect::<Vec<_>>()
      .join("\n")
  }
}

impl OptionSchema for RecordingSchema {
  fn option(&mut self, name: &str, config: &ArgConfig) {
    self.calls.push(RecordedCall {
      registration: Registration::Option,
      name: name.to_string(),
      config: config.clone(),
    });
  }

  fn positional(&mut self, name: &str, config: &ArgConfig) {
    self.calls.push(RecordedCall {
      registration: Registration::Positional,
      name: name.to_string(),
      config: config.clone(),
    });
  }
}
