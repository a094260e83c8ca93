//! Manifold.toml manifest parsing and schema.
//!
//! The manifest declares the sample catalog, the backends, hand-written
//! targets, build configurations and external imports of one project.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::backend::{default_ui_defines, BackendSpec, BackendTag, Compiler, Platform};
use crate::core::catalog::{load_catalog, CatalogEntry};
use crate::core::configuration::ConfigurationRecord;
use crate::core::import::ImportSpec;
use crate::core::target::{
    CompilerOptions, Enablement, PlatformDependencies, TargetKind, TargetRecord,
};

/// File name of the project manifest.
pub const MANIFEST_NAME: &str = "Manifold.toml";

/// Manifest discovery failure.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `{}` in `{}` or any parent directory", MANIFEST_NAME, .dir.display())]
    NotFound { dir: PathBuf },
}

/// Search `start` and its ancestors for a manifest.
pub fn find_manifest(start: &Path) -> Result<PathBuf, ManifestError> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_NAME))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ManifestError::NotFound {
            dir: start.to_path_buf(),
        })
}

/// The parsed Manifold.toml manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Project metadata
    pub project: ProjectMetadata,

    /// External imports
    pub imports: Vec<ImportSpec>,

    /// Declared backends, sorted by tag
    pub backends: Vec<BackendSpec>,

    /// Validated sample catalog, in declaration order
    pub catalog: Vec<CatalogEntry>,

    /// Hand-written targets, sorted by name
    pub targets: Vec<TargetRecord>,

    /// Build configurations, in declaration order
    pub configs: Vec<ConfigurationRecord>,

    /// The directory containing this manifest
    pub manifest_dir: PathBuf,
}

/// Project metadata from the [project] section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Project name
    pub name: String,

    /// Project version (semver)
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Include directories applied to every target
    #[serde(default)]
    pub include_dirs: Vec<String>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl ProjectMetadata {
    /// Parse the version string as semver.
    pub fn version(&self) -> Result<Version> {
        self.version
            .parse()
            .with_context(|| format!("invalid version: {}", self.version))
    }
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
struct RawManifest {
    project: ProjectMetadata,

    #[serde(default)]
    imports: Vec<ImportSpec>,

    #[serde(default)]
    backends: BTreeMap<String, RawBackend>,

    #[serde(default)]
    samples: Vec<CatalogEntry>,

    #[serde(default)]
    targets: BTreeMap<String, RawTarget>,

    #[serde(default)]
    configs: Vec<ConfigurationRecord>,
}

/// Raw backend from TOML (before defaults are applied).
#[derive(Debug, Default, Deserialize)]
struct RawBackend {
    label: Option<String>,
    dir: Option<PathBuf>,
    kind: Option<TargetKind>,

    #[serde(default)]
    runtime: Vec<String>,

    #[serde(default)]
    ui_libs: Vec<String>,

    ui_defines: Option<BTreeMap<String, String>>,
    ui_variants: Option<bool>,

    #[serde(default)]
    include_dirs: Vec<String>,

    #[serde(default)]
    link_options: Vec<String>,

    #[serde(default)]
    shaders: bool,

    shader_job: Option<String>,
    config_prefix: Option<String>,
}

/// Raw hand-written target from TOML.
#[derive(Debug, Deserialize)]
struct RawTarget {
    kind: Option<TargetKind>,

    #[serde(default)]
    dir: PathBuf,

    #[serde(default)]
    sources: Vec<PathBuf>,

    #[serde(default)]
    deps: Vec<String>,

    /// Backends whose configurations enable this target
    #[serde(default)]
    backends: Vec<BackendTag>,

    #[serde(default)]
    platforms: Vec<Platform>,

    #[serde(default)]
    when: Vec<PlatformDependencies>,

    /// Compiler name -> options
    #[serde(default)]
    compile_options: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    defines: BTreeMap<String, String>,

    #[serde(default)]
    include_dirs: Vec<String>,

    #[serde(default)]
    link_options: Vec<String>,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest =
            toml::from_str(content).with_context(|| "failed to parse Manifold.toml")?;

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        raw.project.version()?;

        let backends: Vec<BackendSpec> = raw
            .backends
            .into_iter()
            .map(|(tag, raw)| Self::convert_backend(tag, raw))
            .collect();

        if backends.is_empty() && !raw.samples.is_empty() {
            bail!(
                "manifest at {} declares samples but no [backends]",
                path.display()
            );
        }

        Self::check_import_gates(&raw.imports, &backends)?;
        let catalog = load_catalog(raw.samples, &backends)?;

        let mut targets = Vec::new();
        for (name, raw_target) in raw.targets {
            targets.push(Self::convert_target(name, raw_target, &backends)?);
        }

        Ok(Manifest {
            project: raw.project,
            imports: raw.imports,
            backends,
            catalog,
            targets,
            configs: raw.configs,
            manifest_dir,
        })
    }

    fn check_import_gates(imports: &[ImportSpec], backends: &[BackendSpec]) -> Result<()> {
        for import in imports {
            for (export, gate) in &import.enable {
                if !import.exports(export) {
                    bail!(
                        "import `{}` gates `{}`, which it does not export",
                        import.name,
                        export
                    );
                }
                if let Some(tag) = gate.iter().find(|t| !backends.iter().any(|b| &b.tag == *t)) {
                    bail!(
                        "import `{}` gates `{}` on undeclared backend `{}`",
                        import.name,
                        export,
                        tag
                    );
                }
            }
        }
        Ok(())
    }

    fn convert_backend(tag: String, raw: RawBackend) -> BackendSpec {
        let mut backend = BackendSpec::new(tag);

        if let Some(label) = raw.label {
            backend.label = label;
        }
        if let Some(dir) = raw.dir {
            backend.dir = dir;
        }
        if let Some(kind) = raw.kind {
            backend.kind = kind;
        }
        if let Some(job) = raw.shader_job {
            backend.shader_job = job;
        }
        if let Some(prefix) = raw.config_prefix {
            backend.config_prefix = prefix;
        }
        if let Some(ui_variants) = raw.ui_variants {
            backend.ui_variants = ui_variants;
        }
        backend.runtime = raw.runtime;
        backend.ui_libs = raw.ui_libs;
        backend.ui_defines = raw.ui_defines.unwrap_or_else(default_ui_defines);
        backend.include_dirs = raw.include_dirs;
        backend.link_options = raw.link_options;
        backend.shaders = raw.shaders;

        backend
    }

    fn convert_target(name: String, raw: RawTarget, backends: &[BackendSpec]) -> Result<TargetRecord> {
        for tag in &raw.backends {
            if !backends.iter().any(|b| &b.tag == tag) {
                bail!("target `{}` is enabled for undeclared backend `{}`", name, tag);
            }
        }

        if raw.backends.is_empty() {
            tracing::warn!(
                "target `{}` lists no backends and will never be enabled",
                name
            );
        }

        let mut compile_options = Vec::new();
        for (compiler, options) in raw.compile_options {
            let compiler: Compiler = compiler
                .parse()
                .map_err(|e: String| anyhow::anyhow!("target `{}`: {}", name, e))?;
            compile_options.push(CompilerOptions { compiler, options });
        }

        Ok(TargetRecord {
            kind: raw.kind.unwrap_or(TargetKind::Lib),
            dir: raw.dir,
            sources: raw.sources,
            dependencies: raw.deps,
            conditional_dependencies: raw.when,
            enabled: Enablement {
                backends: raw.backends.into_iter().collect(),
                platforms: raw.platforms,
            },
            compile_definitions: raw.defines,
            compile_options,
            include_dirs: raw.include_dirs,
            link_options: raw.link_options,
            ..TargetRecord::new(name, TargetKind::Lib)
        })
    }

    /// Get the project name.
    pub fn name(&self) -> &str {
        &self.project.name
    }

    /// Get a backend by tag.
    pub fn backend(&self, tag: &str) -> Option<&BackendSpec> {
        self.backends.iter().find(|b| b.tag.as_str() == tag)
    }

    /// Get a catalog entry by id.
    pub fn entry(&self, id: &str) -> Option<&CatalogEntry> {
        self.catalog.iter().find(|e| e.id == id)
    }

    /// Get a configuration by name.
    pub fn config(&self, name: &str) -> Option<&ConfigurationRecord> {
        self.configs.iter().find(|c| c.name == name)
    }
}

/// Generate a starter Manifold.toml for a new project.
pub fn generate_default_manifest(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
version = "0.1.0"

[backends.sapp]
dir = "sapp"
kind = "windowed-exe"
runtime = ["sokol"]
ui_libs = ["dbgui"]
shaders = true
shader_job = "sokolshdc"

[[samples]]
id = "triangle"
ext = "c"
backends = ["sapp"]
ui = true
shader = true

[targets.sokol]
kind = "lib"
dir = "libs/sokol"
sources = ["sokol.c"]
backends = ["sapp"]

[targets.dbgui]
kind = "lib"
dir = "libs/dbgui"
sources = ["dbgui.cc"]
deps = ["sokol"]
backends = ["sapp"]

[[configs]]
name = "linux-ninja-debug"
platform = "linux"
compiler = "gcc"
overrides = {{ generator = "Ninja", build_type = "Debug" }}

[[configs]]
name = "sapp-linux-ninja-debug"
inherits = "linux-ninja-debug"
activates = ["sapp"]
compile_definitions = {{ SOKOL_GLCORE = "1" }}
"#
    )
}
