//! Enumerates every component instance held by the container.

use crate::component::Instance;
use crate::container::Container;

/// Flattens the container into one instance list
#[derive(Debug, Clone, Copy)]
pub struct RegistryScanner<'c> {
  container: &'c Container,
}

impl<'c> RegistryScanner<'c> {
  pub fn new(container: &'c Container) -> Self {
    Self { container }
  }

  /// Every entry's instance, module by module, in registration order.
  ///
  /// Entries without an instance are kept as `None`.
  pub fn discover(&self) -> Vec<Option<Instance>> {
    self
      .container
      .modules()
      .iter()
      .flat_map(|module| module.components.iter())
      .map(|entry| entry.instance.clone())
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

  struct Probe;

  impl Probe {
    async fn noop(&self, _args: CallArgs) -> Result<()> {
      Ok(())
    }
  }

  impl Component for Probe {
    fn methods(methods: &mut MethodSet<Self>) {
      methods.method("noop", |this, args| this.noop(args).boxed());
    }
  }

  #[test]
  fn test_discover_flattens_in_order_and_keeps_empty_entries() {
    let container = Container::new()
      .module("first", |module| {
        module.provide(Probe).value("CONFIG");
      })
      .module("empty", |_| {})
      .module("second", |module| {
        module.provide(Probe);
      });

    let instances = RegistryScanner::new(&container).discover();

    assert_eq!(instances.len(), 3);
    assert!(instances[0].is_some());
    assert!(instances[1].is_none());
    assert!(instances[2].is_some());
    assert!(RegistryScanner::new(&Container::new()).discover().is_empty());
  }
}
