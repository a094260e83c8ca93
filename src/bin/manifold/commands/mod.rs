//! Command implementations

pub mod check;
pub mod completions;
pub mod configs;
pub mod explain;
pub mod graph;
pub mod init;
pub mod targets;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use manifold::core::{Manifest, ProjectGraph};
use manifold::ops::assemble;
use manifold::util::diagnostic::suggestions;
use manifold::util::{Config, GlobalContext};

/// Options shared by every command that reads a manifest.
pub struct Session {
    pub manifest_path: Option<PathBuf>,
}

/// A loaded manifest with the tool configuration that applies to it.
pub struct Project {
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    pub config: Config,
}

impl Session {
    /// Locate and parse the manifest, then load the tool configuration.
    pub fn load(&self) -> Result<Project> {
        let ctx = GlobalContext::new()?;

        let manifest_path = match &self.manifest_path {
            Some(path) => path.clone(),
            None => ctx
                .find_manifest()
                .map_err(|e| anyhow!("{}\n{}", e, suggestions::NO_MANIFEST))?,
        };

        let manifest = Manifest::load(&manifest_path)?;
        let root = manifest_path.parent().unwrap_or(Path::new("."));
        let config = ctx.load_config(root);
        tracing::debug!(
            "loaded {} (tool home {})",
            manifest_path.display(),
            ctx.home().display()
        );

        Ok(Project {
            manifest_path,
            manifest,
            config,
        })
    }
}

impl Project {
    /// Assemble the project graph.
    pub fn assemble(&self) -> Result<ProjectGraph> {
        Ok(assemble(&self.manifest)?)
    }
}
