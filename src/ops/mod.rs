//! High-level operations.
//!
//! Expansion and assembly produce the project graph; evaluation, export
//! and explanation query it.

pub mod assemble;
pub mod evaluate;
pub mod expand;
pub mod explain;
pub mod export;
pub mod init;

pub use assemble::{assemble, validate_dependencies, AssembleError, DanglingDependencyError};
pub use evaluate::{evaluate, ConfigurationContext, EvaluatedProject, EvaluatedTarget};
pub use expand::{expand, filter, ExpandError};
pub use explain::{explain, TargetExplanation};
pub use export::{render, ExportFormat};
pub use init::{init_project, InitOptions};
