//! Implementation of `manifold init`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::manifest::{generate_default_manifest, MANIFEST_NAME};

/// Options for initializing a project.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Project name
    pub name: String,
}

/// Write a starter manifest into `path`, creating the directory if needed.
pub fn init_project(path: &Path, opts: &InitOptions) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }

    let manifest_path = path.join(MANIFEST_NAME);
    if manifest_path.exists() {
        bail!("`{}` already exists in `{}`", MANIFEST_NAME, path.display());
    }

    fs::write(&manifest_path, generate_default_manifest(&opts.name))
        .with_context(|| format!("failed to write {}", MANIFEST_NAME))?;

    let gitignore = path.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, "# Manifold exports\n.manifold/\n")?;
    }

    tracing::debug!("initialized `{}` at {}", opts.name, path.display());
    Ok(())
}
