//! # Commandeer Core Library
//!
//! Discovers component methods annotated as CLI command handlers and turns
//! each one into a runnable [`CommandDescriptor`]: an option-schema builder
//! plus a handler that marshals parsed command-line input back into the
//! method's positional arguments.

pub mod args;
pub mod component;
pub mod container;
pub mod explorer;
pub mod metadata;
pub mod schema;
pub mod store;

// Re-export main types for command authors
pub use args::{CallArg, CallArgError, CallArgs, ParsedArgs};
pub use component::{BoundMethod, Component, Injectable, Instance, MethodKey, MethodRef, MethodSet};
pub use container::{ComponentEntry, Container, Module};
pub use explorer::{CommandCandidate, CommandDescriptor, CommandExplorer, MetadataExtractor, RegistryScanner};
pub use metadata::{ArgConfig, ArgKind, CommandMetadata, CommandOption, CommandParams, ParamBinding, ParamKind};
pub use schema::OptionSchema;
pub use store::{MetadataLookup, MetadataStore};

/// Discover every command handler in `container` using `store` for metadata lookups
pub fn explore<L: MetadataLookup + ?Sized>(container: &Container, store: &L) -> Vec<CommandDescriptor> {
  CommandExplorer::new(container, store).explore()
}
