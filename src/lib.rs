//! Manifold - a declarative build-target expansion engine
//!
//! This crate turns a catalog of samples, a set of backends and a tree of
//! inheritable configurations into a fully expanded, validated and
//! serializable project graph for an external build orchestrator.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Manifest fixtures shared by the unit tests.
#[cfg(test)]
pub mod test_support;

pub use core::{
    backend::BackendSpec, catalog::CatalogEntry, configuration::ConfigurationRecord,
    graph::ProjectGraph, manifest::Manifest, target::TargetRecord,
};

pub use ops::assemble::{assemble, AssembleError};
pub use util::context::GlobalContext;
