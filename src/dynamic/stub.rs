//! Catalog-checked stubs whose methods are called by name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value as Json;

use super::catalog::TypeCatalog;
use crate::chain::framework::{InvokeFn, StubFramework};
use crate::core::config::Config;
use crate::core::errors::{ChainError, Result};
use crate::rules::rule::TypeName;
use crate::rules::value::Value;

type Handler = Arc<dyn Fn(&[Json]) -> Result<Value<DynStub>> + Send + Sync>;

struct StubInner {
    type_name: TypeName,
    handlers: RwLock<HashMap<String, Handler>>,
}

/// Handle to a stub built by [`DynamicStubs`]. Clones share the stub;
/// equality is identity.
#[derive(Clone)]
pub struct DynStub {
    inner: Arc<StubInner>,
}

impl DynStub {
    fn new(type_name: TypeName) -> Self {
        Self {
            inner: Arc::new(StubInner {
                type_name,
                handlers: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Type this stub stands in for.
    #[must_use]
    pub fn type_name(&self) -> &TypeName {
        &self.inner.type_name
    }

    /// Invokes `method` with `args`.
    ///
    /// Methods the stub does not intercept fail with
    /// [`ChainError::NotIntercepted`]: there is no original logic to fall
    /// back to.
    pub fn call(&self, method: &str, args: &[Json]) -> Result<Value<Self>> {
        let handler = self.inner.handlers.read().get(method).cloned();
        match handler {
            Some(handler) => handler(args),
            None => Err(ChainError::NotIntercepted {
                type_name: self.inner.type_name.clone(),
                method: method.to_string(),
            }),
        }
    }

    /// Whether `method` is intercepted.
    #[must_use]
    pub fn intercepts(&self, method: &str) -> bool {
        self.inner.handlers.read().contains_key(method)
    }

    /// Identity comparison.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for DynStub {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for DynStub {}

impl fmt::Debug for DynStub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<String> = self.inner.handlers.read().keys().cloned().collect();
        methods.sort();
        f.debug_struct("DynStub")
            .field("type_name", &self.inner.type_name)
            .field("methods", &methods)
            .finish()
    }
}

/// Stub framework backed by a [`TypeCatalog`].
#[derive(Debug, Clone, Default)]
pub struct DynamicStubs {
    catalog: TypeCatalog,
}

impl DynamicStubs {
    #[must_use]
    pub const fn new(catalog: TypeCatalog) -> Self {
        Self { catalog }
    }

    /// Loads the catalog named by `[catalog] path`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = config
            .catalog
            .path
            .as_deref()
            .ok_or_else(|| ChainError::InvalidConfig {
                details: "catalog.path must be set to load a type catalog".to_string(),
            })?;
        Ok(Self::new(TypeCatalog::load(path)?))
    }

    #[must_use]
    pub const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }
}

impl StubFramework for DynamicStubs {
    type Handle = DynStub;

    fn create_stub(&self, type_name: &TypeName, methods: &[String]) -> Result<DynStub> {
        self.catalog.check_methods(type_name, methods)?;
        Ok(DynStub::new(type_name.clone()))
    }

    fn on_invoke(&self, stub: &DynStub, method: &str, callback: InvokeFn<DynStub>) -> Result<()> {
        stub.inner
            .handlers
            .write()
            .insert(method.to_string(), Arc::from(callback));
        Ok(())
    }

    fn knows_type(&self, type_name: &str) -> bool {
        self.catalog.contains(type_name)
    }
}
