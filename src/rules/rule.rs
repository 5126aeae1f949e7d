//! The rule language: what a stubbed method does when it is invoked.

#![allow(missing_docs)]

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use thiserror::Error;

use super::options::Options;
use super::sequence::Sequence;
use super::value::Value;

/// Name of a stubbable type, as known to the chain and its framework.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&TypeName> for TypeName {
    fn from(value: &TypeName) -> Self {
        value.clone()
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Marker for "return null on purpose", as opposed to "no rule declared".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturnNull;

#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

/// An error a rule raises every time its method is invoked.
///
/// Clones share the same underlying error, so the caller observes the very
/// same error value on each call.
#[derive(Clone)]
pub struct DirectedError(Arc<dyn StdError + Send + Sync + 'static>);

impl DirectedError {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// A directed error carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    #[must_use]
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Identity comparison: true when both handles carry the same error value.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0).cast::<()>(),
            Arc::as_ptr(&other.0).cast::<()>(),
        )
    }

    /// Downcasts the carried error to a concrete type.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

impl fmt::Debug for DirectedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DirectedError").field(&self.0).finish()
    }
}

impl fmt::Display for DirectedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for DirectedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// A declared directive for a stubbed method.
#[derive(Debug, Clone)]
pub enum Rule<H> {
    /// Returned unchanged.
    Literal(Value<H>),
    /// Build (or fetch) the stub for this type and return it.
    Type(TypeName),
    /// Raise this error.
    Error(DirectedError),
    Sequence(Sequence<H>),
    Options(Options<H>),
    /// Explicitly return null.
    Null,
}

impl<H> Rule<H> {
    /// Reference to a type whose stub is returned.
    pub fn of_type(name: impl Into<TypeName>) -> Self {
        Self::Type(name.into())
    }

    pub fn error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Error(DirectedError::new(error))
    }

    /// An already-built stub, returned as is.
    pub fn stub(handle: H) -> Self {
        Self::Literal(Value::Stub(handle))
    }

    /// A list of already-built stubs.
    pub fn stubs(handles: impl IntoIterator<Item = H>) -> Self {
        Self::Literal(Value::List(handles.into_iter().map(Value::Stub).collect()))
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short variant name for log output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Type(_) => "type",
            Self::Error(_) => "error",
            Self::Sequence(_) => "sequence",
            Self::Options(_) => "options",
            Self::Null => "null",
        }
    }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<H> From<$ty> for Rule<H> {
                fn from(value: $ty) -> Self {
                    Self::from(Value::json(value))
                }
            }
        )*
    };
}

literal_from!(&str, String, bool, i32, i64, u32, u64, usize, f64, Json);

impl<H> From<Value<H>> for Rule<H> {
    fn from(value: Value<H>) -> Self {
        match value {
            Value::Null => Self::Null,
            other => Self::Literal(other),
        }
    }
}

impl<H> From<ReturnNull> for Rule<H> {
    fn from(_: ReturnNull) -> Self {
        Self::Null
    }
}

impl<H> From<TypeName> for Rule<H> {
    fn from(value: TypeName) -> Self {
        Self::Type(value)
    }
}

impl<H> From<DirectedError> for Rule<H> {
    fn from(value: DirectedError) -> Self {
        Self::Error(value)
    }
}

impl<H> From<Sequence<H>> for Rule<H> {
    fn from(value: Sequence<H>) -> Self {
        Self::Sequence(value)
    }
}

impl<H> From<Options<H>> for Rule<H> {
    fn from(value: Options<H>) -> Self {
        Self::Options(value)
    }
}

impl<H, T> From<Option<T>> for Rule<H>
where
    T: Into<Rule<H>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
