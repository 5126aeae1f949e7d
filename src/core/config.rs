//! Configuration system: TOML file + env var overrides + defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::errors::{ChainError, Result};

/// Default pattern a string must match to be read as a type name under the
/// conventional policy: capitalized segments, optionally `::`-separated.
pub const DEFAULT_TYPE_NAME_PATTERN: &str = r"^[A-Z][A-Za-z0-9_]*(::[A-Z][A-Za-z0-9_]*)*$";

/// Full mock-chain configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub resolution: ResolutionConfig,
    pub catalog: CatalogConfig,
}

/// How plain string literals are told apart from type references.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TypeNamePolicy {
    /// Only explicit type references build stubs.
    #[default]
    Explicit,
    /// A string literal matching the type-name pattern that names a known
    /// type builds that type's stub.
    Conventional,
}

/// Resolution behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolutionConfig {
    pub type_names: TypeNamePolicy,
    pub type_name_pattern: String,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            type_names: TypeNamePolicy::Explicit,
            type_name_pattern: DEFAULT_TYPE_NAME_PATTERN.to_string(),
        }
    }
}

impl ResolutionConfig {
    /// Compiled type-name pattern, present only under the conventional policy.
    pub fn type_name_regex(&self) -> Result<Option<Regex>> {
        match self.type_names {
            TypeNamePolicy::Explicit => Ok(None),
            TypeNamePolicy::Conventional => Regex::new(&self.type_name_pattern)
                .map(Some)
                .map_err(|error| ChainError::InvalidConfig {
                    details: format!(
                        "resolution.type_name_pattern {:?} does not compile: {error}",
                        self.type_name_pattern
                    ),
                }),
        }
    }
}

/// Where the bundled stub framework reads its type catalog from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    /// Default configuration path: `$MOCK_CHAIN_CONFIG`, else `mock_chain.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        env_var("MOCK_CHAIN_CONFIG").map_or_else(|| PathBuf::from("mock_chain.toml"), PathBuf::from)
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| ChainError::io(&path_buf, source))?;
            Self::from_toml_str(&raw)?
        } else if is_explicit_path {
            return Err(ChainError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides_from(env_var)?;
        cfg.resolve_relative_paths(path_buf.parent());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses a TOML document without env overrides or validation.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("MOCK_CHAIN_TYPE_NAMES") {
            self.resolution.type_names = parse_env_policy("MOCK_CHAIN_TYPE_NAMES", &raw)?;
        }
        if let Some(raw) = lookup("MOCK_CHAIN_TYPE_NAME_PATTERN") {
            self.resolution.type_name_pattern = raw;
        }
        if let Some(raw) = lookup("MOCK_CHAIN_CATALOG") {
            self.catalog.path = Some(PathBuf::from(raw));
        }
        Ok(())
    }

    /// A relative catalog path is taken relative to the config file.
    fn resolve_relative_paths(&mut self, base: Option<&Path>) {
        if let (Some(path), Some(base)) = (self.catalog.path.as_mut(), base)
            && path.is_relative()
            && !base.as_os_str().is_empty()
        {
            *path = base.join(&*path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolution.type_names == TypeNamePolicy::Conventional
            && self.resolution.type_name_pattern.trim().is_empty()
        {
            return Err(ChainError::InvalidConfig {
                details: "resolution.type_name_pattern must not be empty under the conventional policy"
                    .to_string(),
            });
        }
        self.resolution.type_name_regex()?;
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_policy(name: &str, raw: &str) -> Result<TypeNamePolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "explicit" => Ok(TypeNamePolicy::Explicit),
        "conventional" => Ok(TypeNamePolicy::Conventional),
        other => Err(ChainError::ConfigParse {
            context: "env",
            details: format!("{name}={other:?}: expected \"explicit\" or \"conventional\""),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ChainError, Config, TypeNamePolicy};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.resolution.type_names, TypeNamePolicy::Explicit);
        assert!(cfg.resolution.type_name_regex().unwrap().is_none());
    }

    #[test]
    fn conventional_pattern_matches_capitalized_names() {
        let mut cfg = Config::default();
        cfg.resolution.type_names = TypeNamePolicy::Conventional;
        let regex = cfg.resolution.type_name_regex().unwrap().unwrap();
        assert!(regex.is_match("Organ"));
        assert!(regex.is_match("Anatomy::Organ"));
        assert!(!regex.is_match("organ"));
        assert!(!regex.is_match("Left lung"));
    }

    #[test]
    fn broken_pattern_rejected() {
        let mut cfg = Config::default();
        cfg.resolution.type_names = TypeNamePolicy::Conventional;
        cfg.resolution.type_name_pattern = "([A-Z".to_string();
        let err = cfg.validate().expect_err("expected pattern error");
        assert!(err.to_string().contains("type_name_pattern"));
    }

    #[test]
    fn toml_sections_parse() {
        let cfg = Config::from_toml_str(
            r#"
            [resolution]
            type_names = "conventional"

            [catalog]
            path = "types.toml"
            "#,
        )
        .expect("valid toml");
        assert_eq!(cfg.resolution.type_names, TypeNamePolicy::Conventional);
        assert_eq!(cfg.catalog.path, Some(PathBuf::from("types.toml")));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut cfg = Config::default();
        let overrides = vars(&[
            ("MOCK_CHAIN_TYPE_NAMES", "Conventional"),
            ("MOCK_CHAIN_CATALOG", "/tmp/mock-chain/types.toml"),
        ]);
        cfg.apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect("env overrides should parse");
        assert_eq!(cfg.resolution.type_names, TypeNamePolicy::Conventional);
        assert_eq!(
            cfg.catalog.path,
            Some(PathBuf::from("/tmp/mock-chain/types.toml"))
        );
    }

    #[test]
    fn env_invalid_policy_rejected() {
        let mut cfg = Config::default();
        let overrides = vars(&[("MOCK_CHAIN_TYPE_NAMES", "sometimes")]);
        let err = cfg
            .apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect_err("invalid policy should fail");
        match err {
            ChainError::ConfigParse { context, details } => {
                assert_eq!(context, "env");
                assert!(details.contains("MOCK_CHAIN_TYPE_NAMES"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn relative_catalog_path_follows_the_config_file() {
        let mut cfg = Config::default();
        cfg.catalog.path = Some(PathBuf::from("types.toml"));
        cfg.resolve_relative_paths(Some(Path::new("/fixtures")));
        assert_eq!(cfg.catalog.path, Some(PathBuf::from("/fixtures/types.toml")));
    }

    #[test]
    fn load_returns_error_for_explicit_missing_path() {
        let result = Config::load(Some(Path::new("/nonexistent/mock-chain/config.toml")));
        assert!(matches!(result, Err(ChainError::MissingConfig { .. })));
    }

    #[test]
    fn load_reads_an_explicit_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mock_chain.toml");
        std::fs::write(&path, "[catalog]\npath = \"types.toml\"\n").expect("write config");

        let cfg = Config::load(Some(&path)).expect("config loads");
        assert_eq!(cfg.catalog.path, Some(dir.path().join("types.toml")));
    }
}
