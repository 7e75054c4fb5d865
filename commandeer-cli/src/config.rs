//! # Configuration Management
//!
//! Resolves the commandeer config directory and loads runner settings from
//! `runner.toml` inside it.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "COMMANDEER_CONFIG_DIR";

/// Represents the configuration directory for commandeer
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Resolve the config directory, honouring `COMMANDEER_CONFIG_DIR`
  pub fn new() -> Result<Self> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV) {
      return Ok(Self {
        config_dir: PathBuf::from(dir),
      });
    }

    let proj_dirs =
      ProjectDirs::from("dev", "commandeer", "commandeer").context("Failed to determine project directories")?;
    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the path to the runner configuration file
  pub fn runner_config_path(&self) -> PathBuf {
    self.config_dir.join("runner.toml")
  }

  /// Load runner configuration from file or return default
  pub fn load_runner_config(&self) -> Result<RunnerConfig> {
    RunnerConfig::load_from_path(self.runner_config_path())
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// Settings for the command runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
  /// Program name shown in usage and passed to handlers as `$0`
  #[serde(default = "RunnerConfig::default_script_name")]
  pub script_name: String,
  /// One-line description for the top-level help
  #[serde(default)]
  pub about: Option<String>,
  /// Require a command on every invocation
  #[serde(default = "RunnerConfig::default_demand_command")]
  pub demand_command: bool,
  /// Wrap help output at this width
  #[serde(default = "RunnerConfig::default_max_term_width")]
  pub max_term_width: usize,
}

impl Default for RunnerConfig {
  fn default() -> Self {
    Self {
      script_name: Self::default_script_name(),
      about: None,
      demand_command: Self::default_demand_command(),
      max_term_width: Self::default_max_term_width(),
    }
  }
}

impl RunnerConfig {
  fn default_script_name() -> String {
    "commandeer".to_string()
  }

  fn default_demand_command() -> bool {
    true
  }

  fn default_max_term_width() -> usize {
    120
  }

  /// Load configuration from `path`, falling back to defaults if it does not exist
  pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read runner config from {}", path.display()))?;
    let config: RunnerConfig =
      toml::from_str(&content).with_context(|| format!("Failed to parse runner config from {}", path.display()))?;

    Ok(config)
  }

  pub fn script_name(mut self, script_name: impl Into<String>) -> Self {
    self.script_name = script_name.into();
    self
  }

  pub fn about(mut self, about: impl Into<String>) -> Self {
    self.about = Some(about.into());
    self
  }

  pub fn demand_command(mut self, demand_command: bool) -> Self {
    self.demand_command = demand_command;
    self
  }
}
