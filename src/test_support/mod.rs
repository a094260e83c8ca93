//! Test utilities for manifold unit tests.
//!
//! This module is only compiled for tests. It provides ready-made manifests
//! and helpers to put manifests on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use manifold::test_support::fixtures;
//!
//! #[test]
//! fn test_example() {
//!     let manifest = fixtures::cube_manifest();
//!     let graph = manifold::ops::assemble(&manifest).unwrap();
//! }
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use fixtures::*;

/// Write a manifest into `dir` and return its path.
pub fn write_manifest(dir: &Path, content: &str) -> Result<PathBuf> {
    let path = dir.join(crate::core::MANIFEST_NAME);
    std::fs::write(&path, content)?;
    Ok(path)
}
