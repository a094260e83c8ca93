//! ProjectGraph - the immutable, exported result of an assembly pass.

use serde::{Deserialize, Serialize};

use crate::core::configuration::ResolvedConfiguration;
use crate::core::import::ImportSpec;
use crate::core::target::TargetRecord;
use crate::util::hash::Fingerprint;

/// The expanded project handed to the build orchestrator.
///
/// A graph is never mutated after assembly; re-running the assembly with
/// the same manifest yields an identical graph and fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectGraph {
    pub name: String,

    pub version: String,

    /// Include directories applied to every target
    #[serde(default)]
    pub include_dirs: Vec<String>,

    #[serde(default)]
    pub imports: Vec<ImportSpec>,

    /// Targets in expansion order: backends by tag, catalog order within a
    /// backend, then hand-written targets
    pub targets: Vec<TargetRecord>,

    /// Resolved configurations in declaration order
    pub configurations: Vec<ResolvedConfiguration>,

    /// Target names with every target after its target dependencies
    pub build_order: Vec<String>,
}

impl ProjectGraph {
    /// Get a target by name.
    pub fn target(&self, name: &str) -> Option<&TargetRecord> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Get a resolved configuration by name.
    pub fn configuration(&self, name: &str) -> Option<&ResolvedConfiguration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    /// Targets generated from one catalog entry.
    pub fn targets_for_entry<'a>(&'a self, entry: &'a str) -> impl Iterator<Item = &'a TargetRecord> {
        self.targets.iter().filter(move |t| t.is_from_entry(entry))
    }

    /// Targets that list `name` as a dependency.
    pub fn dependents(&self, name: &str) -> Vec<&TargetRecord> {
        self.targets
            .iter()
            .filter(|t| t.all_dependencies().any(|d| d == name))
            .collect()
    }

    /// Configurations under which a target is enabled, ignoring platform filters
    /// the configuration leaves unset.
    pub fn enabling_configurations(&self, target: &TargetRecord) -> Vec<&ResolvedConfiguration> {
        self.configurations
            .iter()
            .filter(|c| match c.platform {
                Some(platform) => target.enabled.is_enabled(&c.activates, Some(platform)),
                None => target.enabled.backends.iter().any(|b| c.activates.contains(b)),
            })
            .collect()
    }

    /// Content fingerprint of the graph (sha256, hex).
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.name).update_str(&self.version);
        fp.update_strs(self.include_dirs.iter().map(String::as_str));

        for import in &self.imports {
            fp.update_str(&serde_json::to_string(import)?);
        }
        for target in &self.targets {
            fp.update_str(&serde_json::to_string(target)?);
        }
        for config in &self.configurations {
            fp.update_str(&serde_json::to_string(config)?);
        }
        fp.update_strs(self.build_order.iter().map(String::as_str));

        Ok(fp.finish())
    }
}
