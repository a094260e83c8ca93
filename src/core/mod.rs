//! Core data structures for Manifold.
//!
//! This module contains the declarative inputs of an assembly pass and
//! the graph it produces:
//! - Backends, the sample catalog and hand-written targets
//! - Configurations and imports
//! - The manifest that declares all of them
//! - The assembled `ProjectGraph`

pub mod backend;
pub mod catalog;
pub mod configuration;
pub mod graph;
pub mod import;
pub mod manifest;
pub mod target;

pub use backend::{BackendSpec, BackendTag, Compiler, Platform};
pub use catalog::{CatalogEntry, SourceExtension, ValidationError};
pub use configuration::{ConfigurationRecord, ResolvedConfiguration};
pub use graph::ProjectGraph;
pub use import::ImportSpec;
pub use manifest::{find_manifest, Manifest, ManifestError, MANIFEST_NAME};
pub use target::{Enablement, JobSpec, TargetKind, TargetOrigin, TargetRecord};
