//! Build configurations - named, inheritable bundles of build settings.
//!
//! A configuration selects the platform, compiler and build flavor and
//! declares which backends it activates. Configurations inherit from a
//! parent by name; the resolver folds the chain root-to-leaf.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::backend::{BackendTag, Compiler, Platform};

/// A configuration as declared in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    /// Unique configuration name
    pub name: String,

    /// Parent configuration name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<Compiler>,

    /// Backends whose targets this configuration enables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activates: Option<Vec<BackendTag>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub compile_definitions: BTreeMap<String, String>,

    /// Free-form settings passed through to the orchestrator
    /// (generator, build type, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, toml::Value>,
}

impl ConfigurationRecord {
    pub fn new(name: impl Into<String>) -> Self {
        ConfigurationRecord {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn inherits(mut self, parent: impl Into<String>) -> Self {
        self.inherits = Some(parent.into());
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn activates(mut self, backends: impl IntoIterator<Item = impl Into<BackendTag>>) -> Self {
        self.activates = Some(backends.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_define(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.compile_definitions.insert(name.into(), value.into());
        self
    }

    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }
}

/// A configuration with its inheritance chain folded in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfiguration {
    pub name: String,

    /// Declared parent, kept for export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,

    /// Inheritance chain from root to this configuration
    pub chain: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<Compiler>,

    pub activates: BTreeSet<BackendTag>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub compile_definitions: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, toml::Value>,
}

impl ResolvedConfiguration {
    /// Check if this configuration enables targets of the given backend.
    pub fn activates(&self, backend: &BackendTag) -> bool {
        self.activates.contains(backend)
    }

    /// Look up a pass-through setting as a string.
    pub fn override_str(&self, key: &str) -> Option<&str> {
        self.overrides.get(key).and_then(|v| v.as_str())
    }
}
