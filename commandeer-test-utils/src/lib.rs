//! Test utilities shared across the commandeer workspace
//!
//! This crate provides common testing infrastructure including:
//! - A registration-recording option schema ([`RecordingSchema`])
//! - Fixture components that log their invocations ([`RecordingComponent`])
//! - Environment isolation for configuration tests ([`ConfigDirTestGuard`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod fixtures;
pub mod schema;

// Re-export commonly used items
pub use env::{ConfigDirTestGuard, EnvVarGuard};
pub use fixtures::{CallLog, ExtendedComponent, RecordingComponent, SilentComponent};
pub use schema::{RecordedCall, RecordingSchema, Registration};
