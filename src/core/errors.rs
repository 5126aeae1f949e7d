//! MCH-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::rules::rule::{DirectedError, TypeName};

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, ChainError>;

/// Top-level error type for mock chains.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("[MCH-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[MCH-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[MCH-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[MCH-1101] cannot stub unknown type {type_name}")]
    UnknownType { type_name: TypeName },

    #[error("[MCH-1102] cannot stub method \"{method}\" on {type_name}: no such method")]
    UnknownMethod { type_name: TypeName, method: String },

    #[error("[MCH-1201] no type established yet: call add before {operation}")]
    NoTypeEstablished { operation: &'static str },

    #[error("[MCH-2001] option {key} does not exist")]
    OptionNotFound { key: String },

    #[error("[MCH-2002] option index {index} out of range for {len} argument(s)")]
    MissingArgument { index: usize, len: usize },

    #[error("[MCH-2003] method \"{method}\" is not intercepted on stub of {type_name}")]
    NotIntercepted { type_name: TypeName, method: String },

    #[error("[MCH-3001] chain dropped before {type_name}::{method} was invoked")]
    ChainDropped { type_name: TypeName, method: String },

    #[error("[MCH-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[MCH-3003] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    /// An error a rule was told to raise. Displays as the wrapped error.
    #[error(transparent)]
    Directed(DirectedError),
}

impl ChainError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "MCH-1001",
            Self::MissingConfig { .. } => "MCH-1002",
            Self::ConfigParse { .. } => "MCH-1003",
            Self::UnknownType { .. } => "MCH-1101",
            Self::UnknownMethod { .. } => "MCH-1102",
            Self::NoTypeEstablished { .. } => "MCH-1201",
            Self::OptionNotFound { .. } => "MCH-2001",
            Self::MissingArgument { .. } => "MCH-2002",
            Self::NotIntercepted { .. } => "MCH-2003",
            Self::ChainDropped { .. } => "MCH-3001",
            Self::Io { .. } => "MCH-3002",
            Self::Serialization { .. } => "MCH-3003",
            Self::Directed(_) => "MCH-9000",
        }
    }

    /// Whether the failure comes from how the chain was set up rather than
    /// from a stubbed call.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::MissingConfig { .. }
                | Self::ConfigParse { .. }
                | Self::UnknownType { .. }
                | Self::UnknownMethod { .. }
                | Self::NoTypeEstablished { .. }
        )
    }

    /// The user error carried by a [`ChainError::Directed`] failure.
    #[must_use]
    pub const fn directed(&self) -> Option<&DirectedError> {
        match self {
            Self::Directed(err) => Some(err),
            _ => None,
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<DirectedError> for ChainError {
    fn from(value: DirectedError) -> Self {
        Self::Directed(value)
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
