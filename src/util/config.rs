//! Configuration file support for Manifold.
//!
//! Manifold supports two configuration file locations:
//! - Global: `~/.manifold/config.toml` - User-wide defaults
//! - Project: `.manifold/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::backend::{Compiler, Platform};
use crate::ops::export::ExportFormat;

/// Manifold tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph export settings
    pub output: OutputConfig,

    /// Defaults for evaluating a configuration
    pub evaluate: EvaluateConfig,
}

/// Export-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default export format (json, toml)
    pub format: Option<String>,

    /// Pretty-print JSON output
    pub pretty: Option<bool>,
}

/// Evaluation-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluateConfig {
    /// Compiler assumed when a configuration does not name one
    pub compiler: Option<String>,

    /// Platform assumed when a configuration does not name one
    pub platform: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
        if other.output.pretty.is_some() {
            self.output.pretty = other.output.pretty;
        }

        if other.evaluate.compiler.is_some() {
            self.evaluate.compiler = other.evaluate.compiler;
        }
        if other.evaluate.platform.is_some() {
            self.evaluate.platform = other.evaluate.platform;
        }
    }

    /// Parse export format from config string.
    pub fn format(&self) -> Option<ExportFormat> {
        self.output.format.as_ref().and_then(|s| s.parse().ok())
    }

    /// Whether JSON output is pretty-printed (default: yes).
    pub fn pretty(&self) -> bool {
        self.output.pretty.unwrap_or(true)
    }

    /// Parse compiler from config string.
    pub fn compiler(&self) -> Option<Compiler> {
        self.evaluate.compiler.as_ref().and_then(|s| s.parse().ok())
    }

    /// Parse platform from config string.
    pub fn platform(&self) -> Option<Platform> {
        self.evaluate.platform.as_ref().and_then(|s| s.parse().ok())
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.manifold/config.toml)
/// 2. Global config (~/.manifold/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global manifold config directory (~/.manifold).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".manifold"))
}

/// Get the project config path (.manifold/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".manifold").join("config.toml")
}
