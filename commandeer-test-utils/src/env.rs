//! Environment variable management for testing
//!
//! Tests that touch process-wide environment variables use these guards so
//! the original values are restored when the test finishes.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use tempfile::TempDir;

/// Restores a single environment variable on drop
pub struct EnvVarGuard {
  key: String,
  original: Option<OsString>,
}

impl EnvVarGuard {
  /// Remember the current value of `key`
  pub fn new(key: &str) -> Self {
    Self {
      key: key.to_string(),
      original: env::var_os(key),
    }
  }

  pub fn set<V: Into<OsString>>(&self, value: V) {
    unsafe {
      env::set_var(&self.key, value.into());
    }
  }

  pub fn remove(&self) {
    unsafe {
      env::remove_var(&self.key);
    }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    match &self.original {
      Some(value) => unsafe {
        env::set_var(&self.key, value);
      },
      None => unsafe {
        env::remove_var(&self.key);
      },
    }
  }
}

/// Points `COMMANDEER_CONFIG_DIR` at a per-test temporary directory
pub struct ConfigDirTestGuard {
  /// The temporary directory backing the config dir
  pub temp_dir: TempDir,
  _var: EnvVarGuard,
}

impl Default for ConfigDirTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl ConfigDirTestGuard {
  pub const CONFIG_DIR_VAR: &'static str = "COMMANDEER_CONFIG_DIR";

  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let var = EnvVarGuard::new(Self::CONFIG_DIR_VAR);
    var.set(temp_dir.path());

    Self { temp_dir, _var: var }
  }

  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().to_path_buf()
  }

  /// Write `contents` to a file inside the config directory
  pub fn write(&self, file_name: &str, contents: &str) -> PathBuf {
    let path = self.temp_dir.path().join(file_name);
    std::fs::write(&path, contents).expect("Failed to write config file");
    path
  }
}
