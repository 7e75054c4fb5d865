//! # Components and Their Operation Sets
//!
//! A component is an object held by the application container. Instead of
//! walking a runtime prototype chain, each component type declares the async
//! operations it exposes through [`Component::methods`], and may fold in the
//! operations of components it structurally extends with
//! [`MethodSet::extend`].

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};

use crate::args::CallArgs;
use crate::store::MetadataStore;

/// Stable identity of a declared method.
///
/// Identity is the declaring type plus the method name, so two types that
/// both declare `run` produce distinct keys.
#[derive(Clone, Copy)]
pub struct MethodKey {
  owner: TypeId,
  owner_name: &'static str,
  method: &'static str,
}

impl MethodKey {
  /// Key for `method` as declared on `T`
  pub fn of<T: 'static>(method: &'static str) -> Self {
    Self {
      owner: TypeId::of::<T>(),
      owner_name: type_name::<T>(),
      method,
    }
  }

  pub fn owner_name(&self) -> &'static str {
    self.owner_name
  }

  pub fn method(&self) -> &'static str {
    self.method
  }
}

impl PartialEq for MethodKey {
  fn eq(&self, other: &Self) -> bool {
    self.owner == other.owner && self.method == other.method
  }
}

impl Eq for MethodKey {}

impl Hash for MethodKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.owner.hash(state);
    self.method.hash(state);
  }
}

impl fmt::Debug for MethodKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}::{}", self.owner_name, self.method)
  }
}

/// An operation declared on `T`, invoked with the instance and its call arguments
pub type MethodFn<T> = Arc<dyn for<'a> Fn(&'a T, CallArgs) -> BoxFuture<'a, Result<()>> + Send + Sync>;

/// An operation bound to a specific instance
pub type BoundMethod = Arc<dyn Fn(CallArgs) -> BoxFuture<'static, Result<()>> + Send + Sync>;

fn method_fn<T, F>(func: F) -> MethodFn<T>
where
  F: for<'a> Fn(&'a T, CallArgs) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
{
  Arc::new(func)
}

struct MethodEntry<T> {
  key: MethodKey,
  depth: usize,
  func: MethodFn<T>,
}

/// The de-duplicated operation set of a component type.
///
/// Operations declared with [`MethodSet::method`] sit at depth zero; each
/// [`MethodSet::extend`] level adds one. A name is resolved once, at the
/// shallowest depth that declares it.
pub struct MethodSet<T> {
  entries: Vec<MethodEntry<T>>,
}

impl<T: Component> MethodSet<T> {
  fn new() -> Self {
    Self { entries: Vec::new() }
  }

  /// Declared operation set of `T`
  pub fn of() -> Self {
    let mut set = Self::new();
    T::methods(&mut set);
    set
  }

  /// Declare an operation on `T`
  pub fn method<F>(&mut self, name: &'static str, func: F) -> &mut Self
  where
    F: for<'a> Fn(&'a T, CallArgs) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
  {
    self.insert(MethodKey::of::<T>(name), 0, method_fn(func));
    self
  }

  /// Fold in every operation of the extended component `B`.
  ///
  /// Operations keep `B`'s identity, so metadata attached to `B`'s methods
  /// applies to `T` too unless `T` overrides the name.
  pub fn extend<B: Component>(&mut self, upcast: fn(&T) -> &B) -> &mut Self {
    for entry in MethodSet::<B>::of().entries {
      let base = entry.func;
      let func = method_fn(move |this: &T, args: CallArgs| base(upcast(this), args));
      self.insert(entry.key, entry.depth + 1, func);
    }
    self
  }

  fn insert(&mut self, key: MethodKey, depth: usize, func: MethodFn<T>) {
    match self.entries.iter_mut().find(|entry| entry.key.method == key.method) {
      Some(existing) if depth < existing.depth => *existing = MethodEntry { key, depth, func },
      Some(_) => {}
      None => self.entries.push(MethodEntry { key, depth, func }),
    }
  }

  fn ordered(&self) -> Vec<&MethodEntry<T>> {
    let mut entries: Vec<&MethodEntry<T>> = self.entries.iter().collect();
    entries.sort_by_key(|entry| entry.depth);
    entries
  }

  /// Operation names and identities, own operations first
  pub fn refs(&self) -> Vec<MethodRef> {
    self
      .ordered()
      .into_iter()
      .map(|entry| MethodRef {
        name: entry.key.method,
        key: entry.key,
      })
      .collect()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  fn get(&self, name: &str) -> Option<MethodFn<T>> {
    self
      .entries
      .iter()
      .find(|entry| entry.key.method == name)
      .map(|entry| Arc::clone(&entry.func))
  }
}

/// A reachable operation: the name it answers to and the identity its metadata is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodRef {
  pub name: &'static str,
  pub key: MethodKey,
}

/// A type whose instances can live in the container and expose commands
pub trait Component: Send + Sync + Sized + 'static {
  /// Declare the operations this component answers to
  fn methods(methods: &mut MethodSet<Self>);

  /// Attach command metadata to this component's operations
  fn annotate(_store: &mut MetadataStore) {}
}

/// Type-erased view of a component instance
pub trait Injectable: Send + Sync + 'static {
  fn type_name(&self) -> &'static str;

  /// Every reachable operation, de-duplicated by name
  fn method_refs(&self) -> Vec<MethodRef>;

  /// Bind the named operation to this instance
  fn bind(self: Arc<Self>, name: &str) -> Option<BoundMethod>;
}

impl<T: Component> Injectable for T {
  fn type_name(&self) -> &'static str {
    type_name::<T>()
  }

  fn method_refs(&self) -> Vec<MethodRef> {
    MethodSet::<T>::of().refs()
  }

  fn bind(self: Arc<Self>, name: &str) -> Option<BoundMethod> {
    let func = MethodSet::<T>::of().get(name)?;
    Some(Arc::new(move |args: CallArgs| {
      let this = Arc::clone(&self);
      let func = Arc::clone(&func);
      async move { func(&this, args).await }.boxed()
    }))
  }
}

/// A live component instance as held by the container
pub type Instance = Arc<dyn Injectable>;
