//! Target definitions - what the external orchestrator builds.
//!
//! A TargetRecord is a fully resolved buildable artifact: sources,
//! dependencies, compile definitions, auxiliary jobs and the declarative
//! enablement rule deciding under which configurations it is active.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::backend::{BackendTag, Compiler, Platform};

/// The kind of target being described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// Console executable
    #[serde(alias = "bin")]
    Exe,

    /// Executable with a native window (app bundle on macOS, /SUBSYSTEM:WINDOWS on Windows)
    #[serde(alias = "windowed")]
    WindowedExe,

    /// Library
    #[serde(alias = "staticlib")]
    Lib,

    /// Executable without any platform-specific window setup
    PlainExe,
}

impl Default for TargetKind {
    fn default() -> Self {
        TargetKind::Exe
    }
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Exe => "exe",
            TargetKind::WindowedExe => "windowed-exe",
            TargetKind::Lib => "lib",
            TargetKind::PlainExe => "plain-exe",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative replacement for a configuration predicate.
///
/// A target is enabled when the configuration activates one of `backends`
/// and, if `platforms` is non-empty, the configuration platform is listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enablement {
    pub backends: BTreeSet<BackendTag>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<Platform>,
}

impl Enablement {
    /// Enablement gated on a single backend.
    pub fn backend(tag: BackendTag) -> Self {
        let mut backends = BTreeSet::new();
        backends.insert(tag);
        Enablement {
            backends,
            platforms: Vec::new(),
        }
    }

    /// Evaluate against the backends a configuration activates.
    pub fn is_enabled(&self, activated: &BTreeSet<BackendTag>, platform: Option<Platform>) -> bool {
        let backend_ok = self.backends.iter().any(|b| activated.contains(b));
        let platform_ok = self.platforms.is_empty()
            || platform.map(|p| self.platforms.contains(&p)).unwrap_or(false);
        backend_ok && platform_ok
    }
}

/// An auxiliary job the orchestrator runs before compiling the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub job: String,

    #[serde(default)]
    pub args: BTreeMap<String, String>,
}

impl JobSpec {
    /// Shader compile request: `{ job, args: { src } }`.
    pub fn shader(job: impl Into<String>, src: impl Into<String>) -> Self {
        let mut args = BTreeMap::new();
        args.insert("src".to_string(), src.into());
        JobSpec {
            job: job.into(),
            args,
        }
    }
}

/// Dependencies only added on one platform (e.g. `-framework Cocoa` on macOS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDependencies {
    pub platform: Platform,
    pub deps: Vec<String>,
}

/// Compile options only passed to one compiler family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerOptions {
    pub compiler: Compiler,
    pub options: Vec<String>,
}

/// Name suffix of the debug-UI variant of a sample target.
pub const UI_SUFFIX: &str = "-ui";

/// Where a target record came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum TargetOrigin {
    /// Generated from a catalog entry for one backend
    Catalog { entry: String, backend: BackendTag },
    /// Declared by hand in `[targets]`
    Declared,
}

/// A fully resolved build target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    /// Target name, unique across the project
    pub name: String,

    pub kind: TargetKind,

    /// Directory the sources are relative to
    pub dir: PathBuf,

    /// Source files in build order (may include generated shader headers)
    pub sources: Vec<PathBuf>,

    /// Target names, imported library names or linker directives
    pub dependencies: Vec<String>,

    /// Dependencies added per platform
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_dependencies: Vec<PlatformDependencies>,

    pub enabled: Enablement,

    #[serde(default)]
    pub compile_definitions: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compile_options: Vec<CompilerOptions>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_dirs: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link_options: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<JobSpec>,

    pub origin: TargetOrigin,
}

impl TargetRecord {
    /// Create a new declared target with the given name and kind.
    pub fn new(name: impl Into<String>, kind: TargetKind) -> Self {
        TargetRecord {
            name: name.into(),
            kind,
            dir: PathBuf::new(),
            sources: Vec::new(),
            dependencies: Vec::new(),
            conditional_dependencies: Vec::new(),
            enabled: Enablement::default(),
            compile_definitions: BTreeMap::new(),
            compile_options: Vec::new(),
            include_dirs: Vec::new(),
            link_options: Vec::new(),
            jobs: Vec::new(),
            origin: TargetOrigin::Declared,
        }
    }

    /// Create a new library target.
    pub fn lib(name: impl Into<String>) -> Self {
        Self::new(name, TargetKind::Lib)
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_deps(mut self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_enablement(mut self, enabled: Enablement) -> Self {
        self.enabled = enabled;
        self
    }

    /// All dependency strings, unconditional first, then per platform.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(String::as_str).chain(
            self.conditional_dependencies
                .iter()
                .flat_map(|c| c.deps.iter().map(String::as_str)),
        )
    }

    /// Dependencies that apply on the given platform.
    pub fn dependencies_for(&self, platform: Option<Platform>) -> Vec<String> {
        let mut deps = self.dependencies.clone();
        if let Some(platform) = platform {
            for cond in &self.conditional_dependencies {
                if cond.platform == platform {
                    deps.extend(cond.deps.iter().cloned());
                }
            }
        }
        deps
    }

    /// Compile options that apply to the given compiler.
    pub fn compile_options_for(&self, compiler: Option<Compiler>) -> Vec<String> {
        match compiler {
            Some(compiler) => self
                .compile_options
                .iter()
                .filter(|o| o.compiler == compiler)
                .flat_map(|o| o.options.iter().cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Check if this target was generated from the given catalog entry.
    pub fn is_from_entry(&self, entry: &str) -> bool {
        matches!(&self.origin, TargetOrigin::Catalog { entry: e, .. } if e == entry)
    }

    /// Check if this is the debug-UI variant of a sample.
    pub fn is_ui_variant(&self) -> bool {
        matches!(self.origin, TargetOrigin::Catalog { .. }) && self.name.ends_with(UI_SUFFIX)
    }
}

/// Check whether a dependency string is a linker directive passed through
/// verbatim (`-framework Metal`, `-lm`, ...).
pub fn is_linker_directive(dep: &str) -> bool {
    dep.starts_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enablement_backend_match() {
        let enabled = Enablement::backend(BackendTag::new("sapp"));
        let mut active = BTreeSet::new();
        assert!(!enabled.is_enabled(&active, None));

        active.insert(BackendTag::new("sapp"));
        assert!(enabled.is_enabled(&active, None));
    }

    #[test]
    fn test_enablement_platform_filter() {
        let mut enabled = Enablement::backend(BackendTag::new("glfw"));
        enabled.platforms.push(Platform::Macos);

        let active: BTreeSet<_> = [BackendTag::new("glfw")].into_iter().collect();
        assert!(enabled.is_enabled(&active, Some(Platform::Macos)));
        assert!(!enabled.is_enabled(&active, Some(Platform::Windows)));
        assert!(!enabled.is_enabled(&active, None));
    }

    #[test]
    fn test_conditional_dependencies() {
        let mut target = TargetRecord::lib("entry_metal").with_deps(["sokol-includes"]);
        target.conditional_dependencies.push(PlatformDependencies {
            platform: Platform::Macos,
            deps: vec!["-framework Cocoa".to_string()],
        });
        target.conditional_dependencies.push(PlatformDependencies {
            platform: Platform::Ios,
            deps: vec!["-framework UIKit".to_string()],
        });

        assert_eq!(
            target.dependencies_for(Some(Platform::Macos)),
            vec!["sokol-includes", "-framework Cocoa"]
        );
        assert_eq!(target.dependencies_for(None), vec!["sokol-includes"]);
        assert_eq!(target.all_dependencies().count(), 3);
    }

    #[test]
    fn test_compile_options_for_compiler() {
        let mut target = TargetRecord::new("sgl-test-glfw", TargetKind::PlainExe);
        target.compile_options.push(CompilerOptions {
            compiler: Compiler::Msvc,
            options: vec!["/wd4996".to_string(), "/wd4152".to_string()],
        });

        assert_eq!(
            target.compile_options_for(Some(Compiler::Msvc)),
            vec!["/wd4996", "/wd4152"]
        );
        assert!(target.compile_options_for(Some(Compiler::Clang)).is_empty());
    }

    #[test]
    fn test_shader_job() {
        let job = JobSpec::shader("sokolshdc", "cube-sapp.glsl");
        assert_eq!(job.job, "sokolshdc");
        assert_eq!(job.args.get("src").map(String::as_str), Some("cube-sapp.glsl"));
    }

    #[test]
    fn test_linker_directive() {
        assert!(is_linker_directive("-framework Metal"));
        assert!(is_linker_directive("-lm"));
        assert!(!is_linker_directive("sokol"));
    }

    #[test]
    fn test_target_kind_serde() {
        let kind: TargetKind = serde_json::from_str("\"windowed-exe\"").unwrap();
        assert_eq!(kind, TargetKind::WindowedExe);
        let kind: TargetKind = serde_json::from_str("\"plain-exe\"").unwrap();
        assert_eq!(kind, TargetKind::PlainExe);
    }
}
