//! Sample catalog - the static table of buildable items.
//!
//! Every entry describes one sample independently of backends: its source
//! extension, extra libraries, the backends it supports and whether it has
//! a debug-UI variant or needs shader compilation.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::backend::{BackendSpec, BackendTag};
use crate::util::diagnostic::Diagnostic;

static ENTRY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid entry id pattern"));

/// Source language extension of a sample's main file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceExtension {
    C,
    Cc,
    Cpp,
    /// Objective-C
    M,
    /// Objective-C++
    Mm,
}

impl SourceExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceExtension::C => "c",
            SourceExtension::Cc => "cc",
            SourceExtension::Cpp => "cpp",
            SourceExtension::M => "m",
            SourceExtension::Mm => "mm",
        }
    }
}

impl fmt::Display for SourceExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One buildable sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique sample id (`cube`, `imgui`, ...)
    pub id: String,

    /// Default source extension
    pub ext: SourceExtension,

    /// Extra libraries the sample links against
    #[serde(default)]
    pub libs: Vec<String>,

    /// Backends the sample can be built for
    pub backends: BTreeSet<BackendTag>,

    /// Whether a `-ui` variant with the debug UI is generated
    #[serde(default)]
    pub ui: bool,

    /// Whether the sample has a shader that must be compiled first
    #[serde(default)]
    pub shader: bool,

    /// Per-backend source extension overrides
    #[serde(default)]
    pub ext_overrides: BTreeMap<BackendTag, SourceExtension>,
}

impl CatalogEntry {
    /// Create a new entry supporting the given backends.
    pub fn new(
        id: impl Into<String>,
        ext: SourceExtension,
        backends: impl IntoIterator<Item = impl Into<BackendTag>>,
    ) -> Self {
        CatalogEntry {
            id: id.into(),
            ext,
            libs: Vec::new(),
            backends: backends.into_iter().map(Into::into).collect(),
            ui: false,
            shader: false,
            ext_overrides: BTreeMap::new(),
        }
    }

    pub fn with_ui(mut self) -> Self {
        self.ui = true;
        self
    }

    pub fn with_shader(mut self) -> Self {
        self.shader = true;
        self
    }

    pub fn with_libs(mut self, libs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.libs = libs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ext_override(mut self, backend: impl Into<BackendTag>, ext: SourceExtension) -> Self {
        self.ext_overrides.insert(backend.into(), ext);
        self
    }

    /// Check if the entry supports the given backend.
    pub fn supports(&self, backend: &BackendTag) -> bool {
        self.backends.contains(backend)
    }

    /// Source extension used for the given backend.
    pub fn source_extension(&self, backend: &BackendTag) -> SourceExtension {
        self.ext_overrides.get(backend).copied().unwrap_or(self.ext)
    }
}

/// Malformed catalog data.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("duplicate catalog entry `{id}`")]
    DuplicateId { id: String },

    #[error("catalog entry `{id}` supports no backends")]
    EmptyBackends { id: String },

    #[error("invalid catalog entry id `{id}`")]
    InvalidId { id: String },

    #[error("catalog entry `{id}` references undeclared backend `{backend}`")]
    UnknownBackend { id: String, backend: BackendTag },

    #[error("catalog entry `{id}` overrides extension for undeclared backend `{backend}`")]
    UnknownOverrideBackend { id: String, backend: BackendTag },

    #[error("{} catalog validation errors", .0.len())]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Collapse a list of errors into a single error.
    pub fn multiple(mut errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            ValidationError::Multiple(errors)
        }
    }

    /// Get all error messages.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ValidationError::Multiple(errors) => errors.iter().map(|e| e.to_string()).collect(),
            e => vec![e.to_string()],
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error("invalid sample catalog");
        for message in self.messages() {
            diag = diag.with_context(message);
        }

        let mut has_backend_error = false;
        let mut has_id_error = false;
        self.for_each(&mut |e| match e {
            ValidationError::UnknownBackend { .. } | ValidationError::UnknownOverrideBackend { .. } => {
                has_backend_error = true
            }
            ValidationError::DuplicateId { .. } | ValidationError::InvalidId { .. } => {
                has_id_error = true
            }
            _ => {}
        });

        if has_backend_error {
            diag = diag.with_suggestion("Declare the backend in a `[backends.<tag>]` section");
        }
        if has_id_error {
            diag = diag.with_suggestion(
                "Give every sample a unique id made of letters, digits, `-`, `_` or `.`",
            );
        }
        diag
    }

    fn for_each(&self, f: &mut impl FnMut(&ValidationError)) {
        match self {
            ValidationError::Multiple(errors) => {
                for e in errors {
                    e.for_each(f);
                }
            }
            e => f(e),
        }
    }
}

/// Validate catalog entries against the declared backends.
///
/// Returns the entries in declaration order. All violations are collected
/// before failing.
pub fn load_catalog(
    entries: Vec<CatalogEntry>,
    backends: &[BackendSpec],
) -> Result<Vec<CatalogEntry>, ValidationError> {
    let declared: HashSet<&BackendTag> = backends.iter().map(|b| &b.tag).collect();
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for entry in &entries {
        if !ENTRY_ID.is_match(&entry.id) {
            errors.push(ValidationError::InvalidId {
                id: entry.id.clone(),
            });
        }

        if !seen.insert(entry.id.as_str()) {
            errors.push(ValidationError::DuplicateId {
                id: entry.id.clone(),
            });
        }

        if entry.backends.is_empty() {
            errors.push(ValidationError::EmptyBackends {
                id: entry.id.clone(),
            });
        }

        for backend in &entry.backends {
            if !declared.contains(backend) {
                errors.push(ValidationError::UnknownBackend {
                    id: entry.id.clone(),
                    backend: backend.clone(),
                });
            }
        }

        for backend in entry.ext_overrides.keys() {
            if !declared.contains(backend) {
                errors.push(ValidationError::UnknownOverrideBackend {
                    id: entry.id.clone(),
                    backend: backend.clone(),
                });
            }
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError::multiple(errors));
    }

    tracing::debug!("loaded {} catalog entries", entries.len());
    Ok(entries)
}
