//! Evaluation of a project graph under one configuration.
//!
//! This is the query side handed to a build orchestrator: given a
//! resolved configuration (and optionally a platform/compiler that
//! differs from the one it declares), list the active targets with
//! their concrete dependencies, options and definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::backend::{Compiler, Platform};
use crate::core::configuration::ResolvedConfiguration;
use crate::core::graph::ProjectGraph;
use crate::core::target::{JobSpec, TargetKind, TargetRecord};

/// The configuration a graph is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationContext<'a> {
    pub config: &'a ResolvedConfiguration,

    /// Target platform, defaults to the configuration's
    pub platform: Option<Platform>,

    /// Compiler family, defaults to the configuration's
    pub compiler: Option<Compiler>,
}

impl<'a> ConfigurationContext<'a> {
    pub fn new(config: &'a ResolvedConfiguration) -> Self {
        ConfigurationContext {
            config,
            platform: config.platform,
            compiler: config.compiler,
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Check if a target is enabled in this context.
    pub fn is_enabled(&self, target: &TargetRecord) -> bool {
        target.enabled.is_enabled(&self.config.activates, self.platform)
    }
}

impl ProjectGraph {
    /// Targets enabled in `ctx`, in build order.
    pub fn enabled_targets<'g>(&'g self, ctx: &ConfigurationContext<'_>) -> Vec<&'g TargetRecord> {
        self.build_order
            .iter()
            .filter_map(|name| self.target(name))
            .filter(|t| ctx.is_enabled(t))
            .collect()
    }
}

/// A target with every conditional attribute settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluatedTarget {
    pub name: String,
    pub kind: TargetKind,
    pub dir: PathBuf,
    pub sources: Vec<PathBuf>,
    pub dependencies: Vec<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub compile_definitions: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub compile_options: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_dirs: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub link_options: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<JobSpec>,
}

/// The active slice of a project under one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedProject {
    pub project: String,
    pub configuration: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler: Option<Compiler>,

    /// Pass-through settings for the orchestrator (generator, build type, ...)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, toml::Value>,

    /// Imported names active under this configuration
    pub imports: Vec<String>,

    pub targets: Vec<EvaluatedTarget>,
}

impl EvaluatedProject {
    /// Get an evaluated target by name.
    pub fn target(&self, name: &str) -> Option<&EvaluatedTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Check if an imported name is active.
    pub fn imports(&self, name: &str) -> bool {
        self.imports.iter().any(|i| i == name)
    }
}

/// Evaluate the graph under `ctx`.
pub fn evaluate(graph: &ProjectGraph, ctx: &ConfigurationContext<'_>) -> EvaluatedProject {
    let targets: Vec<EvaluatedTarget> = graph
        .enabled_targets(ctx)
        .into_iter()
        .map(|t| evaluate_target(graph, t, ctx))
        .collect();

    let activates = &ctx.config.activates;
    let imports: Vec<String> = graph
        .imports
        .iter()
        .flat_map(|import| import.active_exports(activates))
        .map(String::from)
        .collect();

    for target in &targets {
        for dep in &target.dependencies {
            let gated_off = graph
                .imports
                .iter()
                .any(|i| i.exports(dep) && !i.is_export_active(dep, activates));
            if gated_off && !imports.contains(dep) {
                tracing::warn!(
                    "target `{}` depends on `{}`, which configuration `{}` does not enable",
                    target.name,
                    dep,
                    ctx.config.name
                );
            }
        }
    }

    tracing::debug!(
        "configuration `{}` enables {} of {} targets",
        ctx.config.name,
        targets.len(),
        graph.targets.len()
    );

    EvaluatedProject {
        project: graph.name.clone(),
        configuration: ctx.config.name.clone(),
        platform: ctx.platform,
        compiler: ctx.compiler,
        overrides: ctx.config.overrides.clone(),
        imports,
        targets,
    }
}

fn evaluate_target(
    graph: &ProjectGraph,
    target: &TargetRecord,
    ctx: &ConfigurationContext<'_>,
) -> EvaluatedTarget {
    // Target definitions win over configuration-wide ones.
    let mut compile_definitions = ctx.config.compile_definitions.clone();
    compile_definitions.extend(
        target
            .compile_definitions
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    let mut include_dirs = graph.include_dirs.clone();
    for dir in &target.include_dirs {
        if !include_dirs.contains(dir) {
            include_dirs.push(dir.clone());
        }
    }

    EvaluatedTarget {
        name: target.name.clone(),
        kind: target.kind,
        dir: target.dir.clone(),
        sources: target.sources.clone(),
        dependencies: target.dependencies_for(ctx.platform),
        compile_definitions,
        compile_options: target.compile_options_for(ctx.compiler),
        include_dirs,
        link_options: target.link_options.clone(),
        jobs: target.jobs.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::assemble::assemble;
    use crate::test_support::fixtures;

    fn sample_graph() -> ProjectGraph {
        assemble(&fixtures::sample_manifest()).unwrap()
    }

    fn evaluate_named(graph: &ProjectGraph, name: &str) -> EvaluatedProject {
        let config = graph.configuration(name).unwrap();
        evaluate(graph, &ConfigurationContext::new(config))
    }

    #[test]
    fn test_base_configuration_enables_nothing() {
        let graph = sample_graph();
        let evaluated = evaluate_named(&graph, "macos-ninja-debug");
        assert!(evaluated.targets.is_empty());
        assert_eq!(evaluated.platform, Some(Platform::Macos));
    }

    #[test]
    fn test_sapp_configuration() {
        let graph = sample_graph();
        let evaluated = evaluate_named(&graph, "sapp-gl-macos-ninja-debug");

        assert!(evaluated.targets.iter().all(|t| !t.name.ends_with("-glfw")));
        assert!(evaluated.target("entry_metal").is_none());

        let cube_ui = evaluated.target("cube-sapp-ui").unwrap();
        assert_eq!(
            cube_ui.compile_definitions.get("SOKOL_GLCORE33").map(String::as_str),
            Some("1")
        );
        assert_eq!(
            cube_ui.compile_definitions.get("USE_DBG_UI").map(String::as_str),
            Some("1")
        );
        assert_eq!(cube_ui.include_dirs, vec!["libs", "@targetbuild:"]);
        assert_eq!(cube_ui.jobs.len(), 1);

        assert_eq!(
            evaluated.overrides.get("generator").and_then(|v| v.as_str()),
            Some("Ninja")
        );
    }

    #[test]
    fn test_gated_import_follows_configuration() {
        let graph = sample_graph();

        let sapp = evaluate_named(&graph, "sapp-gl-macos-ninja-debug");
        assert!(!sapp.imports("glfw3"));
        assert!(sapp.imports("imgui"));
        assert!(sapp.imports("sokol-config"));

        let glfw = evaluate_named(&graph, "glfw-macos-ninja-debug");
        assert!(glfw.imports("glfw3"));
        let multiwindow = glfw.target("multiwindow-glfw").unwrap();
        assert!(multiwindow.dependencies.iter().all(|d| {
            graph.target(d).is_some() || glfw.imports(d) || d.starts_with('-')
        }));
    }

    #[test]
    fn test_targets_follow_build_order() {
        let graph = sample_graph();
        let evaluated = evaluate_named(&graph, "sapp-gl-macos-ninja-debug");

        let position = |name: &str| evaluated.targets.iter().position(|t| t.name == name).unwrap();
        assert!(position("sokol") < position("dbgui"));
        assert!(position("dbgui") < position("cube-sapp-ui"));
    }

    #[test]
    fn test_platform_conditional_dependencies() {
        let graph = sample_graph();
        let config = graph.configuration("metal-macos-ninja-debug").unwrap();

        let macos = evaluate(&graph, &ConfigurationContext::new(config));
        let entry = macos.target("entry_metal").unwrap();
        assert!(entry.dependencies.contains(&"-framework Cocoa".to_string()));
        assert!(!entry.dependencies.contains(&"-framework UIKit".to_string()));

        let ios = evaluate(&graph, &ConfigurationContext::new(config).with_platform(Platform::Ios));
        let entry = ios.target("entry_metal").unwrap();
        assert!(entry.dependencies.contains(&"-framework UIKit".to_string()));
        assert!(!entry.dependencies.contains(&"-framework Cocoa".to_string()));
        assert_eq!(entry.dependencies[0], "sokol-includes");
    }

    #[test]
    fn test_platform_restricted_target() {
        let graph = sample_graph();

        let macos = evaluate_named(&graph, "glfw-macos-ninja-debug");
        assert!(macos.target("metal-glfw").is_some());
        assert!(macos.target("multiwindow-glfw").is_some());

        let windows = evaluate_named(&graph, "glfw-win-vstudio-debug");
        assert!(windows.target("metal-glfw").is_none());
        assert!(windows.target("multiwindow-glfw").is_some());
    }

    #[test]
    fn test_msvc_compile_options() {
        let graph = sample_graph();

        let windows = evaluate_named(&graph, "glfw-win-vstudio-debug");
        assert_eq!(
            windows.target("sgl-test-glfw").unwrap().compile_options,
            vec!["/wd4996", "/wd4152"]
        );

        let macos = evaluate_named(&graph, "glfw-macos-ninja-debug");
        assert!(macos.target("sgl-test-glfw").unwrap().compile_options.is_empty());
    }

    #[test]
    fn test_target_definitions_win() {
        let mut manifest = fixtures::cube_manifest();
        manifest.configs[1] = manifest.configs[1].clone().with_define("USE_DBG_UI", "0");
        let graph = assemble(&manifest).unwrap();

        let evaluated = evaluate_named(&graph, "sapp-linux-debug");
        let plain = evaluated.target("cube-sapp").unwrap();
        let ui = evaluated.target("cube-sapp-ui").unwrap();
        assert_eq!(plain.compile_definitions.get("USE_DBG_UI").map(String::as_str), Some("0"));
        assert_eq!(ui.compile_definitions.get("USE_DBG_UI").map(String::as_str), Some("1"));
        assert_eq!(ui.compile_definitions.get("SOKOL_GLCORE").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_context_overrides_compiler() {
        let graph = sample_graph();
        let config = graph.configuration("glfw-macos-ninja-debug").unwrap();

        let ctx = ConfigurationContext::new(config).with_compiler(Compiler::Msvc);
        let evaluated = evaluate(&graph, &ctx);
        assert_eq!(evaluated.compiler, Some(Compiler::Msvc));
        assert_eq!(
            evaluated.target("sgl-test-glfw").unwrap().compile_options.len(),
            2
        );
    }
}
