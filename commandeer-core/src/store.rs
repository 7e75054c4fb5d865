//! # Metadata Store
//!
//! The explicit registration table that stands in for declaration-time
//! annotations: command metadata is attached to a [`MethodKey`] once, during
//! startup, and read many times by the explorer.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::component::{Component, MethodKey};
use crate::metadata::CommandMetadata;

/// Read-only lookup of command metadata by method identity
pub trait MetadataLookup {
  fn get_metadata(&self, key: &MethodKey) -> Option<Arc<CommandMetadata>>;
}

/// Registration table mapping method identities to command metadata
#[derive(Debug, Default)]
pub struct MetadataStore {
  records: HashMap<MethodKey, Arc<CommandMetadata>>,
  annotated: HashSet<TypeId>,
}

impl MetadataStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Attach `metadata` to the method identified by `key`.
  ///
  /// A second definition for the same key replaces the first.
  pub fn define(&mut self, key: MethodKey, metadata: CommandMetadata) -> &mut Self {
    if self.records.insert(key, Arc::new(metadata)).is_some() {
      warn!("Command metadata for {:?} was redefined", key);
    }
    self
  }

  /// Attach `metadata` to `method` as declared on `T`
  pub fn command<T: 'static>(&mut self, method: &'static str, metadata: CommandMetadata) -> &mut Self {
    self.define(MethodKey::of::<T>(method), metadata)
  }

  /// Run `T`'s annotation hook, at most once per type
  pub fn register<T: Component>(&mut self) -> &mut Self {
    if self.annotated.insert(TypeId::of::<T>()) {
      debug!("Annotating component {}", std::any::type_name::<T>());
      T::annotate(self);
    }
    self
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }
}

impl MetadataLookup for MetadataStore {
  fn get_metadata(&self, key: &MethodKey) -> Option<Arc<CommandMetadata>> {
    self.records.get(key).cloned()
  }
}

impl<L: MetadataLookup + ?Sized> MetadataLookup for Arc<L> {
  fn get_metadata(&self, key: &MethodKey) -> Option<Arc<CommandMetadata>> {
    (**self).get_metadata(key)
  }
}

#[cfg(test)]
mod tests {
  use anyhow::Result;
  use futures::FutureExt;

  use super::*;
  use crate::args::CallArgs;
  use crate::component::MethodSet;
  use crate::metadata::CommandOption;

  struct Jobs;

  impl Jobs {
    async fn run(&self, _args: CallArgs) -> Result<()> {
      Ok(())
    }
  }

  impl Component for Jobs {
    fn methods(methods: &mut MethodSet<Self>) {
      methods.method("run", |this, args| this.run(args).boxed());
    }

    fn annotate(store: &mut MetadataStore) {
      store.command::<Jobs>("run", CommandMetadata::new(CommandOption::new("jobs:run")));
    }
  }

  struct Reports;

  #[test]
  fn test_lookup_is_keyed_by_declaring_type() {
    let mut store = MetadataStore::new();
    store.command::<Jobs>("run", CommandMetadata::new(CommandOption::new("jobs:run")));

    assert!(store.get_metadata(&MethodKey::of::<Jobs>("run")).is_some());
    assert!(store.get_metadata(&MethodKey::of::<Reports>("run")).is_none());
    assert!(store.get_metadata(&MethodKey::of::<Jobs>("stop")).is_none());
  }

  #[test]
  fn test_redefinition_replaces_record() {
    let mut store = MetadataStore::new();
    store
      .command::<Jobs>("run", CommandMetadata::new(CommandOption::new("first")))
      .command::<Jobs>("run", CommandMetadata::new(CommandOption::new("second")));

    let metadata = store.get_metadata(&MethodKey::of::<Jobs>("run")).unwrap();
    assert_eq!(metadata.option.command, "second");
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn test_register_annotates_once() {
    let mut store = MetadataStore::new();
    store.register::<Jobs>().register::<Jobs>();

    assert_eq!(store.len(), 1);
    assert_eq!(
      store.get_metadata(&MethodKey::of::<Jobs>("run")).unwrap().option.command,
      "jobs:run"
    );
  }
}
