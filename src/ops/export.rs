//! Serialization of assembled and evaluated graphs.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;

/// Output format for exported graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Toml,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Toml => "toml",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "toml" => Ok(ExportFormat::Toml),
            _ => Err(format!(
                "invalid format '{}'; expected one of: json, toml",
                s
            )),
        }
    }
}

/// Render a value in the given format.
///
/// `pretty` only affects JSON; TOML output is always multi-line.
pub fn render<T: Serialize>(value: &T, format: ExportFormat, pretty: bool) -> Result<String> {
    let mut out = match format {
        ExportFormat::Json if pretty => {
            serde_json::to_string_pretty(value).context("failed to serialize graph as JSON")?
        }
        ExportFormat::Json => {
            serde_json::to_string(value).context("failed to serialize graph as JSON")?
        }
        ExportFormat::Toml => {
            toml::to_string_pretty(value).context("failed to serialize graph as TOML")?
        }
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Render a value and write it to `path`.
pub fn write<T: Serialize>(value: &T, path: &Path, format: ExportFormat, pretty: bool) -> Result<()> {
    let content = render(value, format, pretty)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::debug!("wrote {} export to {}", format, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::ProjectGraph;
    use crate::ops::assemble::assemble;
    use crate::test_support::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("toml".parse::<ExportFormat>(), Ok(ExportFormat::Toml));
        assert!("yaml".parse::<ExportFormat>().is_err());
        assert_eq!(
            ExportFormat::from_path(Path::new("out/graph.toml")),
            Some(ExportFormat::Toml)
        );
        assert_eq!(ExportFormat::from_path(Path::new("graph")), None);
    }

    #[test]
    fn test_json_export_reads_back() {
        let graph = assemble(&fixtures::cube_manifest()).unwrap();

        let json = render(&graph, ExportFormat::Json, false).unwrap();
        assert_eq!(json.lines().count(), 1);
        let parsed: ProjectGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, graph);
    }

    #[test]
    fn test_toml_export_of_sample_graph() {
        let graph = assemble(&fixtures::sample_manifest()).unwrap();

        let rendered = render(&graph, ExportFormat::Toml, true).unwrap();
        let value: toml::Value = toml::from_str(&rendered).unwrap();
        assert_eq!(value["name"].as_str(), Some("sokol-samples"));
        let targets = value["targets"].as_array().unwrap();
        assert_eq!(targets.len(), graph.targets.len());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out").join("graph.json");
        let graph = assemble(&fixtures::cube_manifest()).unwrap();

        write(&graph, &path, ExportFormat::Json, true).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"cube-sapp-ui\""));
    }
}
