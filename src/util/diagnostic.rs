//! Terminal diagnostics for assembly failures.
//!
//! Typed errors convert into a [`Diagnostic`] carrying the failing
//! item, the facts behind it and a numbered list of fixes.

use std::fmt::{self, Write};

/// Hints appended to errors raised outside a typed error enum.
pub mod suggestions {
    pub const NO_MANIFEST: &str = "help: Run `manifold init` to create a new project";

    pub const TARGET_NOT_FOUND: &str = "help: Run `manifold targets` to see available targets";

    pub const CONFIG_NOT_FOUND: &str =
        "help: Run `manifold configs` to see the declared configurations";
}

const RED_BOLD: &str = "\x1b[1;31m";
const GREEN_BOLD: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

/// An error report with context lines and suggested fixes.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    pub message: String,
    /// Facts explaining the failure, one per line
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Render for the terminal, with ANSI colors when `color` is set.
    pub fn format(&self, color: bool) -> String {
        let paint = |label: &str, code: &str| {
            if color {
                format!("{code}{label}{RESET}")
            } else {
                label.to_string()
            }
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}: {}", paint("error", RED_BOLD), self.message);
        for line in &self.context {
            let _ = writeln!(out, "  → {}", line);
        }

        if !self.suggestions.is_empty() {
            let _ = writeln!(out, "\n{}: consider:", paint("help", GREEN_BOLD));
            for (i, fix) in self.suggestions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, fix);
            }
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
