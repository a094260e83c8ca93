//! Backend declarations - the platforms a catalog entry can be built for.
//!
//! A backend pairs a rendering API with a windowing strategy (for example
//! `sapp` or `glfw`). Backends are declared once in the manifest and are
//! immutable afterwards; every expanded target carries the tag of the
//! backend it was generated for.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::target::TargetKind;

/// Default job name for shader compilation requests.
pub const DEFAULT_SHADER_JOB: &str = "shader-compiler";

/// Identifier of a declared backend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendTag(String);

impl BackendTag {
    pub fn new(tag: impl Into<String>) -> Self {
        BackendTag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BackendTag {
    fn from(s: &str) -> Self {
        BackendTag::new(s)
    }
}

impl AsRef<str> for BackendTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Target platform of a build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Macos,
    Ios,
    Windows,
    Linux,
    Android,
    Emscripten,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Macos => "macos",
            Platform::Ios => "ios",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Android => "android",
            Platform::Emscripten => "emscripten",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "macos" | "osx" => Ok(Platform::Macos),
            "ios" => Ok(Platform::Ios),
            "windows" | "win" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "android" => Ok(Platform::Android),
            "emscripten" | "emsc" | "wasm" => Ok(Platform::Emscripten),
            _ => Err(format!(
                "invalid platform '{}'; expected one of: macos, ios, windows, linux, android, emscripten",
                s
            )),
        }
    }
}

/// Compiler family of a build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compiler {
    Msvc,
    Clang,
    Gcc,
    #[serde(alias = "apple-clang")]
    AppleClang,
    Emcc,
    Unknown,
}

impl Compiler {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compiler::Msvc => "msvc",
            Compiler::Clang => "clang",
            Compiler::Gcc => "gcc",
            Compiler::AppleClang => "appleclang",
            Compiler::Emcc => "emcc",
            Compiler::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compiler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "msvc" | "cl" => Ok(Compiler::Msvc),
            "clang" => Ok(Compiler::Clang),
            "gcc" => Ok(Compiler::Gcc),
            "appleclang" | "apple-clang" => Ok(Compiler::AppleClang),
            "emcc" | "emscripten" => Ok(Compiler::Emcc),
            "unknown" => Ok(Compiler::Unknown),
            _ => Err(format!(
                "invalid compiler '{}'; expected one of: msvc, clang, gcc, appleclang, emcc",
                s
            )),
        }
    }
}

/// A fully-defaulted backend declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSpec {
    /// Backend tag (key in `[backends]`)
    pub tag: BackendTag,

    /// Label used in generated target and source names
    pub label: String,

    /// Directory containing the backend's sample sources
    pub dir: PathBuf,

    /// Kind of the generated sample targets
    pub kind: TargetKind,

    /// Entry/runtime libraries every sample links against
    pub runtime: Vec<String>,

    /// Extra libraries for the UI variant
    pub ui_libs: Vec<String>,

    /// Compile definitions added to the UI variant
    pub ui_defines: BTreeMap<String, String>,

    /// Whether samples with a debug UI get a `-ui` variant on this backend
    pub ui_variants: bool,

    /// Public include directories of generated targets
    pub include_dirs: Vec<String>,

    /// Link options of generated targets
    pub link_options: Vec<String>,

    /// Whether shader compile jobs are scheduled for this backend
    pub shaders: bool,

    /// Job name used for shader compile requests
    pub shader_job: String,

    /// Configuration name prefix used when a configuration does not
    /// declare its activated backends explicitly
    pub config_prefix: String,
}

impl BackendSpec {
    /// Create a backend with default settings.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        BackendSpec {
            label: tag.clone(),
            dir: PathBuf::from(&tag),
            kind: TargetKind::WindowedExe,
            runtime: Vec::new(),
            ui_libs: Vec::new(),
            ui_defines: default_ui_defines(),
            ui_variants: true,
            include_dirs: Vec::new(),
            link_options: Vec::new(),
            shaders: false,
            shader_job: DEFAULT_SHADER_JOB.to_string(),
            config_prefix: format!("{}-", tag),
            tag: BackendTag::new(tag),
        }
    }

    pub fn with_runtime(mut self, libs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.runtime = libs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ui_libs(mut self, libs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ui_libs = libs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_shaders(mut self, shaders: bool) -> Self {
        self.shaders = shaders;
        self
    }

    pub fn with_ui_variants(mut self, ui_variants: bool) -> Self {
        self.ui_variants = ui_variants;
        self
    }

    pub fn with_kind(mut self, kind: TargetKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Check whether a configuration name follows this backend's prefix convention.
    pub fn matches_config_name(&self, config_name: &str) -> bool {
        !self.config_prefix.is_empty() && config_name.starts_with(&self.config_prefix)
    }
}

pub(crate) fn default_ui_defines() -> BTreeMap<String, String> {
    let mut defines = BTreeMap::new();
    defines.insert("USE_DBG_UI".to_string(), "1".to_string());
    defines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_defaults() {
        let backend = BackendSpec::new("sapp");
        assert_eq!(backend.label, "sapp");
        assert_eq!(backend.dir, PathBuf::from("sapp"));
        assert_eq!(backend.config_prefix, "sapp-");
        assert_eq!(backend.shader_job, DEFAULT_SHADER_JOB);
        assert_eq!(backend.ui_defines.get("USE_DBG_UI").map(String::as_str), Some("1"));
        assert!(backend.ui_variants);
    }

    #[test]
    fn test_config_prefix_match() {
        let backend = BackendSpec::new("glfw");
        assert!(backend.matches_config_name("glfw-macos-ninja-debug"));
        assert!(!backend.matches_config_name("sapp-gl-macos-ninja-debug"));
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!("osx".parse::<Platform>().unwrap(), Platform::Macos);
        assert_eq!("Windows".parse::<Platform>().unwrap(), Platform::Windows);
        assert!("amiga".parse::<Platform>().is_err());
    }

    #[test]
    fn test_compiler_parse() {
        assert_eq!("cl".parse::<Compiler>().unwrap(), Compiler::Msvc);
        assert_eq!("apple-clang".parse::<Compiler>().unwrap(), Compiler::AppleClang);
        assert!("tcc".parse::<Compiler>().is_err());
    }
}
