//! Test fixtures for common test scenarios.
//!
//! `cube_manifest` is the smallest project exercising every expansion rule;
//! `sample_manifest` is the full sokol sample description shipped in
//! `demos/sokol-samples`.

use std::path::{Path, PathBuf};

use crate::core::backend::{BackendSpec, Compiler, Platform};
use crate::core::catalog::{CatalogEntry, SourceExtension};
use crate::core::configuration::ConfigurationRecord;
use crate::core::manifest::{Manifest, ProjectMetadata};
use crate::core::target::{Enablement, TargetRecord};

/// The sokol sample manifest.
pub const SAMPLES_MANIFEST: &str = include_str!("../../demos/sokol-samples/Manifold.toml");

/// One `cube` sample for the `sapp` backend with its runtime libraries.
pub fn cube_manifest() -> Manifest {
    let sapp = BackendSpec::new("sapp")
        .with_runtime(["sokol"])
        .with_ui_libs(["dbgui"])
        .with_shaders(true);
    let tag = sapp.tag.clone();

    let catalog = vec![CatalogEntry::new("cube", SourceExtension::C, ["sapp"])
        .with_ui()
        .with_shader()];

    let targets = vec![
        TargetRecord::lib("sokol")
            .with_sources(["sokol.c"])
            .with_enablement(Enablement::backend(tag.clone())),
        TargetRecord::lib("dbgui")
            .with_sources(["dbgui.cc"])
            .with_deps(["sokol"])
            .with_enablement(Enablement::backend(tag)),
    ];

    let configs = vec![
        ConfigurationRecord::new("linux-debug")
            .with_platform(Platform::Linux)
            .with_compiler(Compiler::Gcc)
            .with_override("build_type", "Debug"),
        ConfigurationRecord::new("sapp-linux-debug")
            .inherits("linux-debug")
            .activates(["sapp"])
            .with_define("SOKOL_GLCORE", "1"),
    ];

    Manifest {
        project: ProjectMetadata {
            name: "cube".to_string(),
            version: "0.1.0".to_string(),
            description: None,
            include_dirs: Vec::new(),
        },
        imports: Vec::new(),
        backends: vec![sapp],
        catalog,
        targets,
        configs,
        manifest_dir: PathBuf::from("."),
    }
}

/// The full sokol sample manifest.
pub fn sample_manifest() -> Manifest {
    Manifest::parse(SAMPLES_MANIFEST, Path::new("demos/sokol-samples/Manifold.toml"))
        .expect("sample manifest parses")
}
