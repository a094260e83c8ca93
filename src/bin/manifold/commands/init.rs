//! `manifold init` command

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::cli::InitArgs;
use manifold::core::MANIFEST_NAME;
use manifold::ops::init::{init_project, InitOptions};

/// Determines the project name from the arguments or directory.
pub fn determine_project_name(name: &Option<String>, path: &Path) -> String {
    name.clone().unwrap_or_else(|| {
        path.canonicalize()
            .ok()
            .as_deref()
            .unwrap_or(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string()
    })
}

/// Validates a project name for common issues.
pub fn validate_project_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("project name cannot be empty");
    }

    if name.starts_with('-') || name.starts_with('_') || name.starts_with('.') {
        return Err("project name cannot start with a hyphen, underscore or dot");
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err("project name contains invalid characters");
    }

    Ok(())
}

pub fn execute(args: InitArgs) -> Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));
    if path.join(MANIFEST_NAME).exists() {
        bail!("`{}` already exists in `{}`", MANIFEST_NAME, path.display());
    }

    let name = determine_project_name(&args.name, &path);

    if let Err(msg) = validate_project_name(&name) {
        bail!("invalid project name `{}`: {}", name, msg);
    }

    init_project(&path, &InitOptions { name: name.clone() })?;

    eprintln!("     Initialized project `{}`", name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_determine_project_name() {
        assert_eq!(
            determine_project_name(&Some("given".to_string()), Path::new("/tmp/other")),
            "given"
        );

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("sokol-samples");
        std::fs::create_dir(&dir).unwrap();
        assert_eq!(determine_project_name(&None, &dir), "sokol-samples");
    }

    #[test]
    fn test_existing_manifest_reported_before_name() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".hidden");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join(MANIFEST_NAME), "[project]\nname = \"x\"\n").unwrap();

        let err = execute(InitArgs {
            name: None,
            path: Some(dir),
        })
        .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("sokol-samples").is_ok());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name("-x").is_err());
        assert!(validate_project_name("a b").is_err());
    }
}
