//! # Commandeer CLI Library
//!
//! Turns discovered command descriptors into a clap command line: command
//! string parsing, option schema translation, runner configuration, and the
//! sample components shipped with the `commandeer` binary.

pub mod clap_schema;
pub mod command_spec;
pub mod config;
pub mod demo;
pub mod logging;
pub mod output;
pub mod runner;

pub use clap_schema::{ArgConflict, ArgLayout, ArgReadError, ClapSchema};
pub use command_spec::{CommandSpec, CommandSpecError, PositionalSpec};
pub use config::{ConfigDirs, RunnerConfig, get_config_dirs};
pub use output::ColorMode;
pub use runner::{CommandRunner, Invocation, RunnerError};
