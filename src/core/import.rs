//! External imports - shared target definitions provided by the orchestrator.
//!
//! manifold never fetches an import. It records the request and uses the
//! exported names to validate dependencies. An export can be gated to a
//! set of backends, so it only exists under configurations activating one.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::backend::BackendTag;

/// A request for externally defined libraries or targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Import group name
    pub name: String,

    /// Where the orchestrator fetches the definitions from
    pub url: Url,

    /// Files the orchestrator loads from the import location
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    /// Target/library names the import provides
    #[serde(default)]
    pub exports: BTreeSet<String>,

    /// Backends gating individual exports; ungated exports are always active
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub enable: BTreeMap<String, BTreeSet<BackendTag>>,
}

impl ImportSpec {
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        ImportSpec {
            name: name.into(),
            url,
            files: Vec::new(),
            exports: BTreeSet::new(),
            enable: BTreeMap::new(),
        }
    }

    pub fn with_exports(mut self, exports: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exports = exports.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict an export to configurations activating one of `backends`.
    pub fn with_gate(
        mut self,
        export: impl Into<String>,
        backends: impl IntoIterator<Item = impl Into<BackendTag>>,
    ) -> Self {
        self.enable
            .insert(export.into(), backends.into_iter().map(Into::into).collect());
        self
    }

    /// Check if this import provides the given name.
    pub fn exports(&self, name: &str) -> bool {
        self.exports.contains(name)
    }

    /// Check if an export is active with the given backends activated.
    pub fn is_export_active(&self, name: &str, activates: &BTreeSet<BackendTag>) -> bool {
        self.exports(name)
            && self
                .enable
                .get(name)
                .map_or(true, |gate| !gate.is_disjoint(activates))
    }

    /// Exports active with the given backends activated, sorted by name.
    pub fn active_exports<'a>(
        &'a self,
        activates: &'a BTreeSet<BackendTag>,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.exports
            .iter()
            .map(String::as_str)
            .filter(move |name| self.is_export_active(name, activates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_exports() {
        let url = Url::parse("https://github.com/floooh/fibs-libs").unwrap();
        let import = ImportSpec::new("libs", url)
            .with_exports(["imgui", "glfw3"])
            .with_gate("glfw3", ["glfw"]);

        assert!(import.exports("glfw3"));
        assert!(!import.exports("sokol"));
        assert!(!import.is_export_active("glfw3", &BTreeSet::new()));
    }

    #[test]
    fn test_import_deserialize() {
        let import: ImportSpec = toml::from_str(
            r#"
name = "utils"
url = "https://github.com/floooh/fibs-utils"
files = ["stdoptions.ts"]
exports = ["stdoptions"]
"#,
        )
        .unwrap();

        assert_eq!(import.url.host_str(), Some("github.com"));
        assert_eq!(import.files, vec!["stdoptions.ts"]);
        assert!(import.enable.is_empty());
    }

    #[test]
    fn test_gated_export() {
        let import: ImportSpec = toml::from_str(
            r#"
name = "libs"
url = "https://github.com/floooh/fibs-libs"
exports = ["imgui", "glfw3"]
enable = { glfw3 = ["glfw"] }
"#,
        )
        .unwrap();

        let sapp: BTreeSet<BackendTag> = [BackendTag::new("sapp")].into_iter().collect();
        let glfw: BTreeSet<BackendTag> = [BackendTag::new("glfw")].into_iter().collect();

        assert!(!import.is_export_active("glfw3", &sapp));
        assert!(import.is_export_active("glfw3", &glfw));
        assert!(import.is_export_active("imgui", &sapp));
        assert!(!import.is_export_active("sokol", &glfw));

        let active: Vec<_> = import.active_exports(&sapp).collect();
        assert_eq!(active, vec!["imgui"]);
    }
}
