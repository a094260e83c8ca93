//! Explain where a target comes from and what it pulls in.

use std::collections::BTreeSet;

use anyhow::{anyhow, Result};

use crate::core::graph::ProjectGraph;
use crate::core::target::{Enablement, TargetOrigin};
use crate::ops::assemble::{classify_dependency, DependencySource};
use crate::util::diagnostic::suggestions;

/// One dependency of the explained target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainedDependency {
    pub name: String,

    /// Platform the dependency is limited to, if any
    pub platform: Option<String>,

    /// How the dependency resolves, `None` if it dangles
    pub source: Option<DependencySource>,
}

/// Provenance and reachability of one target.
#[derive(Debug, Clone)]
pub struct TargetExplanation {
    pub name: String,
    pub origin: TargetOrigin,
    pub ui_variant: bool,
    pub enabled: Enablement,

    /// Configurations under which the target is enabled, in declaration order
    pub configurations: Vec<String>,

    pub dependencies: Vec<ExplainedDependency>,

    /// Targets that depend on this one
    pub dependents: Vec<String>,
}

/// Explain `name` within `graph`.
pub fn explain(graph: &ProjectGraph, name: &str) -> Result<TargetExplanation> {
    let target = graph.target(name).ok_or_else(|| {
        anyhow!(
            "target `{}` not found in project `{}`\n{}",
            name,
            graph.name,
            suggestions::TARGET_NOT_FOUND
        )
    })?;

    let names: BTreeSet<&str> = graph.targets.iter().map(|t| t.name.as_str()).collect();
    let classify = |dep: &str| classify_dependency(dep, &names, &graph.imports);

    let mut dependencies: Vec<ExplainedDependency> = target
        .dependencies
        .iter()
        .map(|d| ExplainedDependency {
            name: d.clone(),
            platform: None,
            source: classify(d),
        })
        .collect();
    for cond in &target.conditional_dependencies {
        dependencies.extend(cond.deps.iter().map(|d| ExplainedDependency {
            name: d.clone(),
            platform: Some(cond.platform.to_string()),
            source: classify(d),
        }));
    }

    Ok(TargetExplanation {
        name: target.name.clone(),
        origin: target.origin.clone(),
        ui_variant: target.is_ui_variant(),
        enabled: target.enabled.clone(),
        configurations: graph
            .enabling_configurations(target)
            .into_iter()
            .map(|c| c.name.clone())
            .collect(),
        dependencies,
        dependents: graph
            .dependents(name)
            .into_iter()
            .map(|t| t.name.clone())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::assemble::assemble;
    use crate::test_support::fixtures;

    #[test]
    fn test_explain_catalog_target() {
        let graph = assemble(&fixtures::sample_manifest()).unwrap();
        let explained = explain(&graph, "cube-sapp-ui").unwrap();

        assert!(matches!(
            explained.origin,
            TargetOrigin::Catalog { ref entry, .. } if entry == "cube"
        ));
        assert!(explained.ui_variant);
        assert!(explained
            .configurations
            .contains(&"sapp-gl-macos-ninja-debug".to_string()));
        assert!(!explained
            .configurations
            .contains(&"glfw-macos-ninja-debug".to_string()));

        let dbgui = explained.dependencies.iter().find(|d| d.name == "dbgui").unwrap();
        assert_eq!(dbgui.source, Some(DependencySource::Target));
        assert!(explained.dependents.is_empty());
    }

    #[test]
    fn test_explain_runtime_library() {
        let graph = assemble(&fixtures::sample_manifest()).unwrap();
        let explained = explain(&graph, "entry_metal").unwrap();

        assert_eq!(explained.origin, TargetOrigin::Declared);
        assert!(explained.dependents.contains(&"cube-metal".to_string()));

        let cocoa = explained
            .dependencies
            .iter()
            .find(|d| d.name == "-framework Cocoa")
            .unwrap();
        assert_eq!(cocoa.platform.as_deref(), Some("macos"));
        assert_eq!(cocoa.source, Some(DependencySource::LinkerDirective));

        let includes = &explained.dependencies[0];
        assert_eq!(includes.name, "sokol-includes");
        assert_eq!(includes.source, Some(DependencySource::Import("libs".to_string())));
    }

    #[test]
    fn test_platform_restricted_configurations() {
        let graph = assemble(&fixtures::sample_manifest()).unwrap();
        let explained = explain(&graph, "metal-glfw").unwrap();

        assert!(explained
            .configurations
            .contains(&"glfw-macos-ninja-debug".to_string()));
        assert!(!explained
            .configurations
            .contains(&"glfw-win-vstudio-debug".to_string()));
    }

    #[test]
    fn test_explain_unknown_target() {
        let graph = assemble(&fixtures::cube_manifest()).unwrap();
        let err = explain(&graph, "cube-metal").unwrap_err();
        assert!(err.to_string().contains("manifold targets"));
    }
}
