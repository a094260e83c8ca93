//! Catalog expansion - capability filter and target expander.
//!
//! Each catalog entry supported by a backend becomes one target record,
//! plus a `-ui` variant when the entry has a debug UI and the backend
//! builds UI variants.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::backend::{BackendSpec, BackendTag};
use crate::core::catalog::CatalogEntry;
use crate::core::target::{Enablement, JobSpec, TargetOrigin, TargetRecord, UI_SUFFIX};
use crate::util::diagnostic::Diagnostic;

/// Expansion invariant violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("catalog entry `{entry}` does not support backend `{backend}`")]
    UnsupportedBackend { entry: String, backend: BackendTag },
}

impl ExpandError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ExpandError::UnsupportedBackend { entry, backend } => Diagnostic::error(format!(
                "catalog entry `{}` cannot be expanded for backend `{}`",
                entry, backend
            ))
            .with_context(format!("`{}` does not list `{}` in its backends", entry, backend))
            .with_suggestion(format!("Add `{}` to the backends of `{}`", backend, entry)),
        }
    }
}

/// Catalog entries supporting `backend`, in catalog order.
pub fn filter<'a>(catalog: &'a [CatalogEntry], backend: &BackendTag) -> Vec<&'a CatalogEntry> {
    catalog.iter().filter(|e| e.supports(backend)).collect()
}

/// Expand one catalog entry for one backend.
pub fn expand(entry: &CatalogEntry, backend: &BackendSpec) -> Result<Vec<TargetRecord>, ExpandError> {
    if !entry.supports(&backend.tag) {
        return Err(ExpandError::UnsupportedBackend {
            entry: entry.id.clone(),
            backend: backend.tag.clone(),
        });
    }

    let stem = format!("{}-{}", entry.id, backend.label);
    let ext = entry.source_extension(&backend.tag);

    let mut sources = vec![PathBuf::from(format!("{}.{}", stem, ext))];
    let mut jobs = Vec::new();
    if entry.shader && backend.shaders {
        let shader = format!("{}.glsl", stem);
        sources.push(PathBuf::from(&shader));
        jobs.push(JobSpec::shader(&backend.shader_job, shader));
    }

    let mut dependencies = backend.runtime.clone();
    dependencies.extend(entry.libs.iter().cloned());

    let base = TargetRecord {
        name: stem.clone(),
        kind: backend.kind,
        dir: backend.dir.clone(),
        sources,
        dependencies,
        enabled: Enablement::backend(backend.tag.clone()),
        include_dirs: backend.include_dirs.clone(),
        link_options: backend.link_options.clone(),
        jobs,
        origin: TargetOrigin::Catalog {
            entry: entry.id.clone(),
            backend: backend.tag.clone(),
        },
        ..TargetRecord::new(stem.clone(), backend.kind)
    };

    if !entry.ui || !backend.ui_variants {
        return Ok(vec![base]);
    }

    let mut ui = base.clone();
    ui.name = format!("{}{}", stem, UI_SUFFIX);
    ui.dependencies = backend.runtime.clone();
    ui.dependencies.extend(backend.ui_libs.iter().cloned());
    ui.dependencies.extend(entry.libs.iter().cloned());
    ui.compile_definitions.extend(
        backend
            .ui_defines
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    Ok(vec![base, ui])
}
