//! Configuration resolution error types and diagnostics.

use thiserror::Error;

use crate::core::backend::BackendTag;
use crate::util::diagnostic::Diagnostic;

/// Error while resolving configuration inheritance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration `{name}` is declared more than once")]
    DuplicateName { name: String },

    #[error("configuration `{name}` not found")]
    UnknownConfig { name: String },

    #[error("configuration `{config}` inherits from undeclared `{parent}`")]
    UnknownParent { config: String, parent: String },

    #[error("cycle detected in configuration inheritance")]
    Cycle { chain: Vec<String> },

    #[error("configuration `{config}` activates undeclared backend `{backend}`")]
    UnknownBackend { config: String, backend: BackendTag },
}

impl ConfigError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigError::DuplicateName { name } => {
                Diagnostic::error(format!("configuration `{}` is declared more than once", name))
                    .with_suggestion("Rename or remove one of the `[[configs]]` entries")
            }

            ConfigError::UnknownConfig { name } => {
                Diagnostic::error(format!("configuration `{}` not found", name))
                    .with_suggestion("Run `manifold configs` to list declared configurations")
            }

            ConfigError::UnknownParent { config, parent } => Diagnostic::error(format!(
                "configuration `{}` inherits from `{}`, which is not declared",
                config, parent
            ))
            .with_suggestion(format!("Declare a `[[configs]]` entry named `{}`", parent))
            .with_suggestion("Check the spelling of the `inherits` field"),

            ConfigError::Cycle { chain } => Diagnostic::error("cycle detected in configuration inheritance")
                .with_context(format!("cycle: {}", chain.join(" -> ")))
                .with_suggestion("Remove one `inherits` link to break the cycle"),

            ConfigError::UnknownBackend { config, backend } => Diagnostic::error(format!(
                "configuration `{}` activates undeclared backend `{}`",
                config, backend
            ))
            .with_suggestion(format!("Declare the backend in `[backends.{}]`", backend)),
        }
    }
}
