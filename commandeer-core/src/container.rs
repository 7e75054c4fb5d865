//! # Component Container
//!
//! An already-populated, read-only view of the application's modules and the
//! component instances they provide. Discovery receives the container
//! explicitly; nothing here is global.

use std::sync::Arc;

use crate::component::{Component, Instance};

/// One provider registered in a module
#[derive(Clone)]
pub struct ComponentEntry {
  /// Name the provider was registered under
  pub token: String,
  /// Live instance, absent for value and factory providers
  pub instance: Option<Instance>,
}

impl std::fmt::Debug for ComponentEntry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ComponentEntry")
      .field("token", &self.token)
      .field("instance", &self.instance.as_ref().map(|instance| instance.type_name()))
      .finish()
  }
}

/// A named group of component entries
#[derive(Debug, Clone)]
pub struct Module {
  pub name: String,
  pub components: Vec<ComponentEntry>,
}

impl Module {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      components: Vec::new(),
    }
  }

  /// Provide a component instance, registered under its type name
  pub fn provide<T: Component>(&mut self, component: T) -> &mut Self {
    self.provide_shared(Arc::new(component))
  }

  /// Provide an instance that is shared with other owners
  pub fn provide_shared<T: Component>(&mut self, component: Arc<T>) -> &mut Self {
    self.components.push(ComponentEntry {
      token: std::any::type_name::<T>().to_string(),
      instance: Some(component),
    });
    self
  }

  /// Register a provider that has no instance
  pub fn value(&mut self, token: impl Into<String>) -> &mut Self {
    self.components.push(ComponentEntry {
      token: token.into(),
      instance: None,
    });
    self
  }
}

/// Ordered collection of modules
#[derive(Debug, Clone, Default)]
pub struct Container {
  modules: Vec<Module>,
}

impl Container {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a module, configuring its providers with `configure`
  pub fn module<F>(mut self, name: impl Into<String>, configure: F) -> Self
  where
    F: FnOnce(&mut Module),
  {
    let mut module = Module::new(name);
    configure(&mut module);
    self.modules.push(module);
    self
  }

  pub fn add_module(&mut self, module: Module) {
    self.modules.push(module);
  }

  pub fn modules(&self) -> &[Module] {
    &self.modules
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }
}
