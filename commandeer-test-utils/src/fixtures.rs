//! Fixture components for discovery and dispatch tests.
//!
//! None of these attach metadata on their own; tests decide which of their
//! operations are commands with [`MetadataStore::command`].
//!
//! [`MetadataStore::command`]: commandeer_core::MetadataStore::command

use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use commandeer_core::{CallArgs, Component, MethodSet};
use futures::FutureExt;

/// Shared log of the call arguments each invocation received
pub type CallLog = Arc<Mutex<Vec<CallArgs>>>;

/// Records the arguments of every `record` call; `fail` always errors; `idle` does nothing
#[derive(Debug, Default)]
pub struct RecordingComponent {
  pub log: CallLog,
}

impl RecordingComponent {
  pub fn new() -> Self {
    Self::default()
  }

  /// Handle to the call log that outlives the component being moved into a container
  pub fn log(&self) -> CallLog {
    Arc::clone(&self.log)
  }

  async fn record(&self, args: CallArgs) -> Result<()> {
    self.log.lock().expect("call log poisoned").push(args);
    Ok(())
  }

  async fn fail(&self, _args: CallArgs) -> Result<()> {
    bail!("fixture failure")
  }

  async fn idle(&self, _args: CallArgs) -> Result<()> {
    Ok(())
  }
}

impl Component for RecordingComponent {
  fn methods(methods: &mut MethodSet<Self>) {
    methods
      .method("record", |this, args| this.record(args).boxed())
      .method("fail", |this, args| this.fail(args).boxed())
      .method("idle", |this, args| this.idle(args).boxed());
  }
}

/// Extends [`RecordingComponent`] and adds its own `extra` operation
#[derive(Debug, Default)]
pub struct ExtendedComponent {
  pub inner: RecordingComponent,
}

impl ExtendedComponent {
  async fn extra(&self, args: CallArgs) -> Result<()> {
    self.inner.record(args).await
  }
}

impl Component for ExtendedComponent {
  fn methods(methods: &mut MethodSet<Self>) {
    methods
      .method("extra", |this, args| this.extra(args).boxed())
      .extend::<RecordingComponent>(|this| &this.inner);
  }
}

/// A component with operations but no commands
#[derive(Debug, Default)]
pub struct SilentComponent;

impl SilentComponent {
  async fn tick(&self, _args: CallArgs) -> Result<()> {
    Ok(())
  }
}

impl Component for SilentComponent {
  fn methods(methods: &mut MethodSet<Self>) {
    methods.method("tick", |this, args| this.tick(args).boxed());
  }
}
