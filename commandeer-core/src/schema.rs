//! Registration seam between synthesized command builders and a CLI parser.

use crate::metadata::ArgConfig;

/// Option-schema object a command builder registers its arguments against
pub trait OptionSchema {
  /// Register a named option
  fn option(&mut self, name: &str, config: &ArgConfig);

  /// Register a positional argument
  fn positional(&mut self, name: &str, config: &ArgConfig);
}

impl<S: OptionSchema + ?Sized> OptionSchema for &mut S {
  fn option(&mut self, name: &str, config: &ArgConfig) {
    (**self).option(name, config);
  }

  fn positional(&mut self, name: &str, config: &ArgConfig) {
    (**self).positional(name, config);
  }
}
