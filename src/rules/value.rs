//! Concrete results handed back to the caller of a stubbed method.

#![allow(missing_docs)]

use serde_json::Value as Json;

/// Arguments captured from one invocation of a stubbed method.
pub type ArgumentList = Vec<Json>;

/// The outcome of resolving a rule: plain data, a stub, or a list of either.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<H> {
    Null,
    Json(Json),
    Stub(H),
    List(Vec<Value<H>>),
}

impl<H> Value<H> {
    /// Wraps a JSON value, folding JSON `null` into [`Value::Null`].
    #[must_use]
    pub fn json(value: impl Into<Json>) -> Self {
        match value.into() {
            Json::Null => Self::Null,
            other => Self::Json(other),
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Json(json) => json.as_str(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Json> {
        match self {
            Self::Json(json) => Some(json),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_stub(&self) -> Option<&H> {
        match self {
            Self::Stub(stub) => Some(stub),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts to JSON when no stub appears anywhere inside the value.
    #[must_use]
    pub fn to_json(&self) -> Option<Json> {
        match self {
            Self::Null => Some(Json::Null),
            Self::Json(json) => Some(json.clone()),
            Self::Stub(_) => None,
            Self::List(items) => items
                .iter()
                .map(Self::to_json)
                .collect::<Option<Vec<_>>>()
                .map(Json::Array),
        }
    }
}

impl<H> Default for Value<H> {
    fn default() -> Self {
        Self::Null
    }
}
