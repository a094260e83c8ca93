//! Configuration resolution.
//!
//! Folds each configuration's inheritance chain root-to-leaf into a
//! `ResolvedConfiguration`. The resolver is pure: all inputs are the
//! declared records and backends, and results are memoized per name.

pub mod errors;

pub use errors::ConfigError;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::core::backend::{BackendSpec, BackendTag};
use crate::core::configuration::{ConfigurationRecord, ResolvedConfiguration};

/// Resolves configuration inheritance with memoization.
pub struct ConfigResolver<'a> {
    /// Declared configurations by name
    declared: HashMap<&'a str, &'a ConfigurationRecord>,

    /// Declaration order
    order: Vec<&'a str>,

    backends: &'a [BackendSpec],

    /// Resolved configurations by name
    cache: HashMap<String, ResolvedConfiguration>,
}

impl<'a> ConfigResolver<'a> {
    /// Create a resolver over the declared configurations.
    pub fn new(
        configs: &'a [ConfigurationRecord],
        backends: &'a [BackendSpec],
    ) -> Result<Self, ConfigError> {
        let mut declared = HashMap::new();
        let mut order = Vec::new();

        for config in configs {
            if declared.insert(config.name.as_str(), config).is_some() {
                return Err(ConfigError::DuplicateName {
                    name: config.name.clone(),
                });
            }
            order.push(config.name.as_str());
        }

        Ok(ConfigResolver {
            declared,
            order,
            backends,
            cache: HashMap::new(),
        })
    }

    /// Resolve a single configuration by name.
    pub fn resolve_one(&mut self, name: &str) -> Result<&ResolvedConfiguration, ConfigError> {
        if !self.cache.contains_key(name) {
            let resolved = self.fold(name)?;
            self.cache.insert(name.to_string(), resolved);
        } else {
            tracing::trace!("configuration `{}` served from cache", name);
        }

        self.cache.get(name).ok_or_else(|| ConfigError::UnknownConfig {
            name: name.to_string(),
        })
    }

    /// Resolve every declared configuration.
    pub fn resolve_all(mut self) -> Result<BTreeMap<String, ResolvedConfiguration>, ConfigError> {
        let names: Vec<&'a str> = self.order.clone();
        for name in names {
            self.resolve_one(name)?;
        }

        Ok(self.cache.into_iter().collect())
    }

    /// Walk `inherits` links from `name` to the root.
    ///
    /// Returns the chain root-first. A revisited name is a cycle.
    fn chain(&self, name: &str) -> Result<Vec<&'a ConfigurationRecord>, ConfigError> {
        let mut current = *self
            .declared
            .get(name)
            .ok_or_else(|| ConfigError::UnknownConfig {
                name: name.to_string(),
            })?;

        let mut visited = HashSet::new();
        let mut chain = Vec::new();

        loop {
            if !visited.insert(current.name.as_str()) {
                let mut names: Vec<String> = chain
                    .iter()
                    .map(|c: &&ConfigurationRecord| c.name.clone())
                    .collect();
                names.push(current.name.clone());
                return Err(ConfigError::Cycle { chain: names });
            }
            chain.push(current);

            match &current.inherits {
                None => break,
                Some(parent) => {
                    current = *self.declared.get(parent.as_str()).ok_or_else(|| {
                        ConfigError::UnknownParent {
                            config: current.name.clone(),
                            parent: parent.clone(),
                        }
                    })?;
                }
            }
        }

        chain.reverse();
        Ok(chain)
    }

    fn fold(&self, name: &str) -> Result<ResolvedConfiguration, ConfigError> {
        let chain = self.chain(name)?;
        let mut resolved = ResolvedConfiguration::default();
        let mut explicit: Option<BTreeSet<BackendTag>> = None;

        for record in &chain {
            resolved.name = record.name.clone();
            resolved.inherits = record.inherits.clone();
            resolved.chain.push(record.name.clone());

            if record.platform.is_some() {
                resolved.platform = record.platform;
            }
            if record.compiler.is_some() {
                resolved.compiler = record.compiler;
            }
            if let Some(ref activates) = record.activates {
                for backend in activates {
                    if !self.backends.iter().any(|b| &b.tag == backend) {
                        return Err(ConfigError::UnknownBackend {
                            config: record.name.clone(),
                            backend: backend.clone(),
                        });
                    }
                }
                explicit = Some(activates.iter().cloned().collect());
            }

            resolved.compile_definitions.extend(
                record
                    .compile_definitions
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
            resolved
                .overrides
                .extend(record.overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        resolved.activates = match explicit {
            Some(set) => set,
            None => self
                .backends
                .iter()
                .filter(|b| b.matches_config_name(&resolved.name))
                .map(|b| b.tag.clone())
                .collect(),
        };

        tracing::debug!(
            "resolved configuration `{}` ({} levels, activates {:?})",
            resolved.name,
            resolved.chain.len(),
            resolved.activates
        );

        Ok(resolved)
    }
}

/// Resolve all configurations against the declared backends.
pub fn resolve(
    configs: &[ConfigurationRecord],
    backends: &[BackendSpec],
) -> Result<BTreeMap<String, ResolvedConfiguration>, ConfigError> {
    ConfigResolver::new(configs, backends)?.resolve_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::{Compiler, Platform};

    fn backends() -> Vec<BackendSpec> {
        vec![
            BackendSpec::new("sapp"),
            BackendSpec::new("glfw"),
            BackendSpec::new("d3d11"),
        ]
    }

    #[test]
    fn test_three_level_chain_matches_manual_fold() {
        let configs = vec![
            ConfigurationRecord::new("base")
                .with_platform(Platform::Macos)
                .with_override("generator", "Ninja")
                .with_override("build_type", "Debug")
                .with_define("A", "base"),
            ConfigurationRecord::new("mid")
                .inherits("base")
                .with_compiler(Compiler::Clang)
                .with_override("build_type", "Release")
                .with_define("B", "mid"),
            ConfigurationRecord::new("leaf")
                .inherits("mid")
                .with_override("generator", "Xcode")
                .with_define("A", "leaf"),
        ];

        let backends = backends();
        let resolved = resolve(&configs, &backends).unwrap();
        let leaf = &resolved["leaf"];

        // Manual root-to-leaf fold.
        let mut overrides = BTreeMap::new();
        let mut defines = BTreeMap::new();
        for c in &configs {
            overrides.extend(c.overrides.clone());
            defines.extend(c.compile_definitions.clone());
        }

        assert_eq!(leaf.overrides, overrides);
        assert_eq!(leaf.compile_definitions, defines);
        assert_eq!(leaf.override_str("generator"), Some("Xcode"));
        assert_eq!(leaf.override_str("build_type"), Some("Release"));
        assert_eq!(leaf.platform, Some(Platform::Macos));
        assert_eq!(leaf.compiler, Some(Compiler::Clang));
        assert_eq!(leaf.chain, vec!["base", "mid", "leaf"]);
        assert_eq!(leaf.inherits.as_deref(), Some("mid"));
    }

    #[test]
    fn test_cycle_detected() {
        let configs = vec![
            ConfigurationRecord::new("a").inherits("b"),
            ConfigurationRecord::new("b").inherits("a"),
        ];

        let backends = backends();
        let err = resolve(&configs, &backends).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Cycle {
                chain: vec!["a".to_string(), "b".to_string(), "a".to_string()]
            }
        );
    }

    #[test]
    fn test_self_inheritance_is_cycle() {
        let configs = vec![ConfigurationRecord::new("loop").inherits("loop")];

        let backends = backends();
        let err = resolve(&configs, &backends).unwrap_err();
        assert!(matches!(err, ConfigError::Cycle { .. }));
    }

    #[test]
    fn test_unknown_parent() {
        let configs = vec![ConfigurationRecord::new("sapp-debug").inherits("macos-debug")];

        let backends = backends();
        let err = resolve(&configs, &backends).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownParent {
                config: "sapp-debug".to_string(),
                parent: "macos-debug".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_name() {
        let configs = vec![ConfigurationRecord::new("a"), ConfigurationRecord::new("a")];

        let backends = backends();
        assert!(matches!(
            ConfigResolver::new(&configs, &backends),
            Err(ConfigError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_explicit_activation_wins_over_prefix() {
        let configs = vec![
            ConfigurationRecord::new("win-vstudio-debug").with_compiler(Compiler::Msvc),
            ConfigurationRecord::new("glfw-win-vstudio-debug")
                .inherits("win-vstudio-debug")
                .activates(["d3d11"]),
        ];

        let backends = backends();
        let resolved = resolve(&configs, &backends).unwrap();
        let config = &resolved["glfw-win-vstudio-debug"];
        assert!(config.activates(&BackendTag::new("d3d11")));
        assert!(!config.activates(&BackendTag::new("glfw")));
    }

    #[test]
    fn test_activation_falls_back_to_prefix() {
        let configs = vec![
            ConfigurationRecord::new("macos-ninja-debug"),
            ConfigurationRecord::new("glfw-macos-ninja-debug").inherits("macos-ninja-debug"),
        ];

        let backends = backends();
        let resolved = resolve(&configs, &backends).unwrap();
        assert!(resolved["macos-ninja-debug"].activates.is_empty());
        assert_eq!(
            resolved["glfw-macos-ninja-debug"].activates,
            [BackendTag::new("glfw")].into_iter().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_activation_inherited_from_parent() {
        let configs = vec![
            ConfigurationRecord::new("sapp-base").activates(["sapp"]),
            ConfigurationRecord::new("my-debug").inherits("sapp-base"),
        ];

        let backends = backends();
        let resolved = resolve(&configs, &backends).unwrap();
        assert!(resolved["my-debug"].activates(&BackendTag::new("sapp")));
    }

    #[test]
    fn test_unknown_backend_in_activation() {
        let configs = vec![ConfigurationRecord::new("vk-debug").activates(["vulkan"])];

        let backends = backends();
        let err = resolve(&configs, &backends).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend { .. }));
    }

    #[test]
    fn test_resolve_one_is_memoized() {
        let configs = vec![
            ConfigurationRecord::new("base").with_platform(Platform::Linux),
            ConfigurationRecord::new("leaf").inherits("base"),
        ];

        let backends = backends();
        let mut resolver = ConfigResolver::new(&configs, &backends).unwrap();
        let first = resolver.resolve_one("leaf").unwrap().clone();
        let second = resolver.resolve_one("leaf").unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(resolver.cache.len(), 1);
    }

    #[test]
    fn test_resolve_unknown_config() {
        let configs = vec![ConfigurationRecord::new("base")];

        let backends = backends();
        let mut resolver = ConfigResolver::new(&configs, &backends).unwrap();
        assert!(matches!(
            resolver.resolve_one("missing"),
            Err(ConfigError::UnknownConfig { .. })
        ));
    }
}
