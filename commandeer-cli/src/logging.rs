//! # Tracing Setup
//!
//! The global subscriber is installed before commands are discovered, so
//! warnings raised while they are registered reach the terminal. The level is
//! adjusted once the `-v` count has been parsed.

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing::{Level, debug};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

/// Map a `-v` count to the log level it enables
pub fn level_for_verbosity(verbosity: u8) -> Level {
  match verbosity {
    0 => Level::WARN,  // Default: warnings and errors
    1 => Level::INFO,  // -v: info, warnings, and errors
    2 => Level::DEBUG, // -vv: debug, info, warnings, and errors
    _ => Level::TRACE, // -vvv or more: trace and everything else
  }
}

/// Filter at `level`, unless `RUST_LOG` holds directives of its own
pub fn env_filter(level: Level) -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(LevelFilter::from_level(level).into())
    .from_env_lossy()
}

/// Changes the installed subscriber's level
pub struct LogHandle {
  filter: reload::Handle<EnvFilter, Registry>,
}

impl LogHandle {
  pub fn set_verbosity(&self, verbosity: u8) -> Result<()> {
    let level = level_for_verbosity(verbosity);
    self
      .filter
      .reload(env_filter(level))
      .context("Failed to update the tracing level")?;
    debug!("Tracing level set to {}", level);
    Ok(())
  }
}

/// Install the global subscriber at the default level
pub fn init() -> LogHandle {
  let (filter, handle) = reload::Layer::new(env_filter(level_for_verbosity(0)));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(std::io::stderr))
    .init();

  LogHandle { filter: handle }
}

#[cfg(test)]
mod tests {
  use test_case::test_case;

  use super::*;

  #[test_case(0 => Level::WARN ; "default")]
  #[test_case(1 => Level::INFO ; "one flag")]
  #[test_case(2 => Level::DEBUG ; "two flags")]
  #[test_case(3 => Level::TRACE ; "three flags")]
  #[test_case(9 => Level::TRACE ; "many flags")]
  fn test_level_for_verbosity(verbosity: u8) -> Level {
    level_for_verbosity(verbosity)
  }
}
