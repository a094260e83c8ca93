//! Project assembly.
//!
//! Expands the catalog for every backend, appends the hand-written
//! targets, resolves configurations and validates that every dependency
//! resolves. All dangling references are collected before failing.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use thiserror::Error;

use crate::core::backend::BackendSpec;
use crate::core::configuration::ResolvedConfiguration;
use crate::core::graph::ProjectGraph;
use crate::core::import::ImportSpec;
use crate::core::manifest::Manifest;
use crate::core::target::{is_linker_directive, TargetRecord};
use crate::ops::expand::{expand, filter, ExpandError};
use crate::resolver::{self, ConfigError};
use crate::util::diagnostic::Diagnostic;

/// How a dependency string resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    /// Another target in the project
    Target,
    /// A name exported by the named import
    Import(String),
    /// Opaque linker directive (`-framework Metal`)
    LinkerDirective,
}

impl fmt::Display for DependencySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencySource::Target => write!(f, "target"),
            DependencySource::Import(name) => write!(f, "import `{}`", name),
            DependencySource::LinkerDirective => write!(f, "linker directive"),
        }
    }
}

/// Classify a dependency against the known target names and imports.
pub fn classify_dependency(
    dep: &str,
    target_names: &BTreeSet<&str>,
    imports: &[ImportSpec],
) -> Option<DependencySource> {
    if target_names.contains(dep) {
        Some(DependencySource::Target)
    } else if let Some(import) = imports.iter().find(|i| i.exports(dep)) {
        Some(DependencySource::Import(import.name.clone()))
    } else if is_linker_directive(dep) {
        Some(DependencySource::LinkerDirective)
    } else {
        None
    }
}

/// One unresolved dependency reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingDependency {
    /// Target that references the dependency
    pub target: String,
    /// The unresolved dependency name
    pub dependency: String,
}

/// All unresolved dependencies found in one assembly pass.
#[derive(Debug, Error, MietteDiagnostic, PartialEq, Eq)]
#[error("unresolved dependencies: {}", format_violations(.violations))]
#[diagnostic(
    code(manifold::assemble::dangling_dependency),
    help("Declare the missing target, add the name to an import's `exports`, or prefix linker directives with `-`")
)]
pub struct DanglingDependencyError {
    pub violations: Vec<DanglingDependency>,
}

fn format_violations(violations: &[DanglingDependency]) -> String {
    violations
        .iter()
        .map(|v| format!("`{}` (required by `{}`)", v.dependency, v.target))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error while assembling the project graph.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error(transparent)]
    Expand(#[from] ExpandError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("duplicate target names: {}", .names.join(", "))]
    DuplicateTargets { names: Vec<String> },

    #[error(transparent)]
    Dangling(#[from] DanglingDependencyError),

    #[error("cycle detected in target dependencies: {}", .targets.join(", "))]
    TargetCycle { targets: Vec<String> },
}

impl AssembleError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            AssembleError::Expand(e) => e.to_diagnostic(),
            AssembleError::Config(e) => e.to_diagnostic(),

            AssembleError::DuplicateTargets { names } => {
                let mut diag = Diagnostic::error("target names must be unique");
                for name in names {
                    diag = diag.with_context(format!("`{}` is defined more than once", name));
                }
                diag.with_suggestion("Rename the hand-written target or the catalog entry")
                    .with_suggestion("Check for two backends sharing the same label")
            }

            AssembleError::Dangling(e) => {
                let mut diag = Diagnostic::error(format!(
                    "{} unresolved {}",
                    e.violations.len(),
                    if e.violations.len() == 1 {
                        "dependency"
                    } else {
                        "dependencies"
                    }
                ));
                for v in &e.violations {
                    diag = diag.with_context(format!(
                        "`{}` requires `{}`, which is not a target, an import export, or a linker directive",
                        v.target, v.dependency
                    ));
                }
                diag.with_suggestion("Declare the missing target in `[targets]`")
                    .with_suggestion("Add the name to the `exports` of an `[[imports]]` entry")
            }

            AssembleError::TargetCycle { targets } => {
                Diagnostic::error("cycle detected in target dependencies")
                    .with_context(format!("targets: {}", targets.join(", ")))
                    .with_suggestion("Break the cycle by removing a dependency")
            }
        }
    }
}

/// Assemble the project graph described by a manifest.
pub fn assemble(manifest: &Manifest) -> Result<ProjectGraph, AssembleError> {
    let mut targets = Vec::new();

    for backend in &manifest.backends {
        let entries = filter(&manifest.catalog, &backend.tag);
        tracing::debug!(
            "expanding {} catalog entries for backend `{}`",
            entries.len(),
            backend.tag
        );
        for entry in entries {
            targets.extend(expand(entry, backend)?);
        }
    }
    targets.extend(manifest.targets.iter().cloned());

    check_unique_names(&targets)?;

    let mut resolved = resolver::resolve(&manifest.configs, &manifest.backends)?;
    warn_unactivated_backends(&manifest.backends, resolved.values());
    let configurations: Vec<ResolvedConfiguration> = manifest
        .configs
        .iter()
        .filter_map(|c| resolved.remove(&c.name))
        .collect();

    validate_dependencies(&targets, &manifest.imports)?;
    let build_order = build_order(&targets)?;

    tracing::info!(
        "assembled `{}`: {} targets, {} configurations",
        manifest.project.name,
        targets.len(),
        configurations.len()
    );

    Ok(ProjectGraph {
        name: manifest.project.name.clone(),
        version: manifest.project.version.clone(),
        include_dirs: manifest.project.include_dirs.clone(),
        imports: manifest.imports.clone(),
        targets,
        configurations,
        build_order,
    })
}

fn check_unique_names(targets: &[TargetRecord]) -> Result<(), AssembleError> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for target in targets {
        if !seen.insert(target.name.as_str()) {
            duplicates.insert(target.name.clone());
        }
    }

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(AssembleError::DuplicateTargets {
            names: duplicates.into_iter().collect(),
        })
    }
}

fn warn_unactivated_backends<'a>(
    backends: &[BackendSpec],
    configs: impl Iterator<Item = &'a ResolvedConfiguration> + Clone,
) {
    for backend in backends {
        if !configs.clone().any(|c| c.activates(&backend.tag)) {
            tracing::warn!(
                "no configuration activates backend `{}`; its targets are never enabled",
                backend.tag
            );
        }
    }
}

/// Check every dependency, collecting all violations.
pub fn validate_dependencies(
    targets: &[TargetRecord],
    imports: &[ImportSpec],
) -> Result<(), DanglingDependencyError> {
    let names: BTreeSet<&str> = targets.iter().map(|t| t.name.as_str()).collect();
    let mut violations = Vec::new();

    for target in targets {
        for dep in target.all_dependencies() {
            if classify_dependency(dep, &names, imports).is_none() {
                violations.push(DanglingDependency {
                    target: target.name.clone(),
                    dependency: dep.to_string(),
                });
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DanglingDependencyError { violations })
    }
}

/// Order targets so that every target follows the targets it depends on.
fn build_order(targets: &[TargetRecord]) -> Result<Vec<String>, AssembleError> {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

    for (i, target) in targets.iter().enumerate() {
        nodes.insert(target.name.as_str(), graph.add_node(i));
    }

    for target in targets {
        let to = nodes[target.name.as_str()];
        for dep in target.all_dependencies() {
            if let Some(&from) = nodes.get(dep) {
                if !graph.contains_edge(from, to) {
                    graph.add_edge(from, to, ());
                }
            }
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order
            .into_iter()
            .map(|n| targets[graph[n]].name.clone())
            .collect()),
        Err(_) => {
            let mut cyclic: Vec<String> = tarjan_scc(&graph)
                .into_iter()
                .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
                .flatten()
                .map(|n| targets[graph[n]].name.clone())
                .collect();
            cyclic.sort();
            Err(AssembleError::TargetCycle { targets: cyclic })
        }
    }
}
