//! Type catalog: which types exist and which methods each one has.
//!
//! ```toml
//! [types.Organ]
//! methods = ["getName", "shoutName"]
//! ```

#![allow(missing_docs)]

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{ChainError, Result};
use crate::rules::rule::TypeName;

/// Methods of one catalogued type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TypeShape {
    pub methods: BTreeSet<String>,
}

/// Known types and their methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TypeCatalog {
    pub types: BTreeMap<TypeName, TypeShape>,
}

impl TypeCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `type_name` with `methods`, merging with any earlier definition.
    #[must_use]
    pub fn with_type<I, S>(mut self, type_name: impl Into<TypeName>, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.define(type_name, methods);
        self
    }

    pub fn define<I, S>(&mut self, type_name: impl Into<TypeName>, methods: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types
            .entry(type_name.into())
            .or_default()
            .methods
            .extend(methods.into_iter().map(Into::into));
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ChainError::MissingConfig {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path).map_err(|source| ChainError::io(path, source))?;
        Self::from_toml_str(&raw)
    }

    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.keys().any(|known| known.as_str() == type_name)
    }

    #[must_use]
    pub fn shape(&self, type_name: &TypeName) -> Option<&TypeShape> {
        self.types.get(type_name)
    }

    /// Fails on the first name in `methods` the type does not have.
    pub fn check_methods(&self, type_name: &TypeName, methods: &[String]) -> Result<()> {
        let shape = self.shape(type_name).ok_or_else(|| ChainError::UnknownType {
            type_name: type_name.clone(),
        })?;
        match methods.iter().find(|method| !shape.methods.contains(*method)) {
            Some(missing) => Err(ChainError::UnknownMethod {
                type_name: type_name.clone(),
                method: missing.clone(),
            }),
            None => Ok(()),
        }
    }
}
