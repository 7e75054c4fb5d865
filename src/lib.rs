//! # Commandeer
//!
//! Discovers component operations annotated as command handlers and exposes
//! them as a clap command line. The discovery pipeline lives in
//! [`commandeer_core`]; the runner and the `commandeer` binary live in
//! [`cli`].

pub use commandeer_cli as cli;
pub use commandeer_core::*;
