//! Pairs each reachable operation of an instance with its command metadata.

use std::sync::Arc;

use crate::component::Instance;
use crate::metadata::CommandMetadata;
use crate::store::MetadataLookup;

/// One reachable operation and whatever metadata is attached to it
#[derive(Debug, Clone)]
pub struct CommandCandidate {
  pub method_name: &'static str,
  pub metadata: Option<Arc<CommandMetadata>>,
}

impl CommandCandidate {
  pub fn is_command(&self) -> bool {
    self.metadata.is_some()
  }
}

/// Looks up command metadata for every operation an instance exposes
pub struct MetadataExtractor<'l, L: ?Sized> {
  lookup: &'l L,
}

impl<'l, L: MetadataLookup + ?Sized> MetadataExtractor<'l, L> {
  pub fn new(lookup: &'l L) -> Self {
    Self { lookup }
  }

  /// One candidate per operation name, whether or not it carries metadata
  pub fn extract(&self, instance: &Instance) -> Vec<CommandCandidate> {
    instance
      .method_refs()
      .into_iter()
      .map(|method| CommandCandidate {
        method_name: method.name,
        metadata: self.lookup.get_metadata(&method.key),
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use anyhow::Result;
  use futures::FutureExt;

  use super::*;
  use crate::args::CallArgs;
  use crate::component::{Component, MethodSet};
  use crate::metadata::CommandOption;
  use crate::store::MetadataStore;

  struct Base;

  impl Base {
    async fn hello(&self, _args: CallArgs) -> Result<()> {
      Ok(())
    }
  }

  impl Component for Base {
    fn methods(methods: &mut MethodSet<Self>) {
      methods.method("hello", |this, args| this.hello(args).boxed());
    }

    fn annotate(store: &mut MetadataStore) {
      store.command::<Base>("hello", CommandMetadata::new(CommandOption::new("hello")));
    }
  }

  struct Child {
    base: Base,
  }

  impl Child {
    async fn helper(&self, _args: CallArgs) -> Result<()> {
      Ok(())
    }
  }

  impl Component for Child {
    fn methods(methods: &mut MethodSet<Self>) {
      methods
        .method("helper", |this, args| this.helper(args).boxed())
        .extend::<Base>(|this| &this.base);
    }

    fn annotate(store: &mut MetadataStore) {
      store.register::<Base>();
    }
  }

  struct Shadow {
    base: Base,
  }

  impl Shadow {
    async fn hello(&self, _args: CallArgs) -> Result<()> {
      Ok(())
    }
  }

  impl Component for Shadow {
    fn methods(methods: &mut MethodSet<Self>) {
      methods
        .extend::<Base>(|this| &this.base)
        .method("hello", |this, args| this.hello(args).boxed());
    }
  }

  #[test]
  fn test_extract_emits_every_method_once() {
    let mut store = MetadataStore::new();
    store.register::<Child>();

    let instance: Instance = Arc::new(Child { base: Base });
    let candidates = MetadataExtractor::new(&store).extract(&instance);

    let names: Vec<&str> = candidates.iter().map(|candidate| candidate.method_name).collect();
    assert_eq!(names, vec!["helper", "hello"]);
    assert!(!candidates[0].is_command());
    assert!(candidates[1].is_command());
  }

  #[test]
  fn test_override_without_metadata_hides_base_command() {
    let mut store = MetadataStore::new();
    store.register::<Base>();

    let instance: Instance = Arc::new(Shadow { base: Base });
    let candidates = MetadataExtractor::new(&store).extract(&instance);

    assert_eq!(candidates.len(), 1);
    assert!(!candidates[0].is_command());
  }
}
