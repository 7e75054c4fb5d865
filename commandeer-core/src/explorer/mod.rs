//! # Command Discovery
//!
//! Scans the container for component instances, pairs each of their
//! operations with command metadata, and synthesizes a [`CommandDescriptor`]
//! for every annotated operation.

mod extractor;
mod scanner;
mod synthesizer;

pub use extractor::{CommandCandidate, MetadataExtractor};
pub use scanner::RegistryScanner;
pub use synthesizer::{CommandBuilder, CommandDescriptor, CommandHandler, CommandSynthesizer, call_args, register_params};
use tracing::debug;

use crate::container::Container;
use crate::store::MetadataLookup;

/// Discovers every command handler in a container
pub struct CommandExplorer<'a, L: ?Sized> {
  container: &'a Container,
  lookup: &'a L,
}

impl<'a, L: MetadataLookup + ?Sized> CommandExplorer<'a, L> {
  pub fn new(container: &'a Container, lookup: &'a L) -> Self {
    Self { container, lookup }
  }

  /// Run one discovery pass.
  ///
  /// Descriptors follow container order: module by module, entry by entry,
  /// then each instance's own operations before inherited ones.
  pub fn explore(&self) -> Vec<CommandDescriptor> {
    let extractor = MetadataExtractor::new(self.lookup);
    let synthesizer = CommandSynthesizer::new();

    let commands: Vec<CommandDescriptor> = RegistryScanner::new(self.container)
      .discover()
      .into_iter()
      .flatten()
      .flat_map(|instance| {
        let candidates = extractor.extract(&instance);
        synthesizer.synthesize(&instance, candidates)
      })
      .collect();

    debug!(
      "Discovered {} command(s) across {} module(s)",
      commands.len(),
      self.container.len()
    );
    commands
  }
}
