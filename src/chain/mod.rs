//! Chain: declared rules, stub construction and the identity-preserving cache.
//!
//! A chain owns everything a test scenario configures: the rules declared per
//! (type, method), the stubs already built for each type, and the arguments
//! captured under store labels. Stubs only hold a weak reference back to that
//! state, so keep the chain alive for as long as its stubs are used.

pub mod framework;

mod cache;
mod registry;
mod resolve;

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value as Json;
use tracing::debug;

use self::cache::{CaptureStore, MockCache};
use self::framework::{InvokeFn, StubFramework};
use self::registry::Registry;
use self::resolve::{Outcome, TypeNameMatcher, resolve};
use crate::core::config::Config;
use crate::core::errors::{ChainError, Result};
use crate::rules::rule::{Rule, TypeName};
use crate::rules::value::{ArgumentList, Value};

/// Fluent builder and resolution engine for one test scenario.
pub struct Chain<F: StubFramework> {
    shared: Arc<Shared<F>>,
}

struct Shared<F: StubFramework> {
    framework: F,
    type_names: TypeNameMatcher,
    state: Mutex<ChainState<F::Handle>>,
}

struct ChainState<H> {
    registry: Registry<H>,
    cache: MockCache<H>,
    store: CaptureStore,
}

impl<H> Default for ChainState<H> {
    fn default() -> Self {
        Self {
            registry: Registry::default(),
            cache: MockCache::default(),
            store: CaptureStore::default(),
        }
    }
}

impl<F: StubFramework> Chain<F> {
    /// A chain with default resolution settings.
    pub fn new(framework: F) -> Self {
        Self::from_parts(framework, TypeNameMatcher::default())
    }

    /// A chain using the `[resolution]` settings of `config`.
    pub fn with_config(framework: F, config: &Config) -> Result<Self> {
        let matcher = TypeNameMatcher::from_config(&config.resolution)?;
        Ok(Self::from_parts(framework, matcher))
    }

    fn from_parts(framework: F, type_names: TypeNameMatcher) -> Self {
        Self {
            shared: Arc::new(Shared {
                framework,
                type_names,
                state: Mutex::new(ChainState::default()),
            }),
        }
    }

    /// The stub framework this chain builds with.
    pub fn framework(&self) -> &F {
        &self.shared.framework
    }

    /// Registers a type without declaring any method. The first type ever
    /// added becomes the root built by [`Chain::get_mock`].
    pub fn add_type(&mut self, type_name: impl Into<TypeName>) -> &mut Self {
        self.shared.state.lock().registry.declare_type(type_name.into());
        self
    }

    /// Declares what `method` of `type_name` returns.
    pub fn add(
        &mut self,
        type_name: impl Into<TypeName>,
        method: impl Into<String>,
        rule: impl Into<Rule<F::Handle>>,
    ) -> &mut Self {
        self.declare(type_name.into(), method.into(), Some(rule.into()), None)
    }

    /// Like [`Chain::add`], also capturing each call's arguments under `label`.
    pub fn add_stored(
        &mut self,
        type_name: impl Into<TypeName>,
        method: impl Into<String>,
        rule: impl Into<Rule<F::Handle>>,
        label: impl Into<String>,
    ) -> &mut Self {
        self.declare(
            type_name.into(),
            method.into(),
            Some(rule.into()),
            Some(label.into()),
        )
    }

    /// Intercepts `method` without a rule: every call returns null.
    pub fn add_bare(
        &mut self,
        type_name: impl Into<TypeName>,
        method: impl Into<String>,
    ) -> &mut Self {
        self.declare(type_name.into(), method.into(), None, None)
    }

    /// [`Chain::add`] on the type most recently added.
    pub fn addd(
        &mut self,
        method: impl Into<String>,
        rule: impl Into<Rule<F::Handle>>,
    ) -> Result<&mut Self> {
        let type_name = self.last_type("addd")?;
        Ok(self.declare(type_name, method.into(), Some(rule.into()), None))
    }

    /// [`Chain::add_stored`] on the type most recently added.
    pub fn addd_stored(
        &mut self,
        method: impl Into<String>,
        rule: impl Into<Rule<F::Handle>>,
        label: impl Into<String>,
    ) -> Result<&mut Self> {
        let type_name = self.last_type("addd")?;
        Ok(self.declare(
            type_name,
            method.into(),
            Some(rule.into()),
            Some(label.into()),
        ))
    }

    /// [`Chain::add_bare`] on the type most recently added.
    pub fn addd_bare(&mut self, method: impl Into<String>) -> Result<&mut Self> {
        let type_name = self.last_type("addd")?;
        Ok(self.declare(type_name, method.into(), None, None))
    }

    fn declare(
        &mut self,
        type_name: TypeName,
        method: String,
        rule: Option<Rule<F::Handle>>,
        label: Option<String>,
    ) -> &mut Self {
        self.shared
            .state
            .lock()
            .registry
            .declare(type_name, method, rule, label);
        self
    }

    fn last_type(&self, operation: &'static str) -> Result<TypeName> {
        self.shared
            .state
            .lock()
            .registry
            .last()
            .cloned()
            .ok_or(ChainError::NoTypeEstablished { operation })
    }

    /// Builds, or returns the cached, stub of the root type.
    pub fn get_mock(&self) -> Result<F::Handle> {
        let root = self
            .shared
            .state
            .lock()
            .registry
            .root()
            .cloned()
            .ok_or(ChainError::NoTypeEstablished {
                operation: "get_mock",
            })?;
        self.shared.build(&root)
    }

    /// Builds, or returns the cached, stub of any type.
    ///
    /// Methods declared after a type's stub was built are not intercepted by
    /// that stub.
    pub fn build(&self, type_name: impl Into<TypeName>) -> Result<F::Handle> {
        self.shared.build(&type_name.into())
    }

    /// Arguments of the latest call captured under `label`; empty if none.
    #[must_use]
    pub fn get_stored_input(&self, label: &str) -> ArgumentList {
        self.shared.state.lock().store.get(label).to_vec()
    }

    /// Types whose stub has been built so far.
    #[must_use]
    pub fn cached_types(&self) -> Vec<TypeName> {
        self.shared.state.lock().cache.types()
    }
}

impl<F: StubFramework> Shared<F> {
    fn build(self: &Arc<Self>, type_name: &TypeName) -> Result<F::Handle> {
        let methods = {
            let state = self.state.lock();
            if let Some(stub) = state.cache.get(type_name) {
                debug!(type_name = %type_name, "serving cached stub");
                return Ok(stub.clone());
            }
            state.registry.methods(type_name)
        };

        debug!(type_name = %type_name, methods = ?methods, "building stub");
        let stub = self.framework.create_stub(type_name, &methods)?;
        for method in &methods {
            self.framework
                .on_invoke(&stub, method, self.callback(type_name, method))?;
        }

        Ok(self
            .state
            .lock()
            .cache
            .insert_if_absent(type_name.clone(), stub))
    }

    fn callback(self: &Arc<Self>, type_name: &TypeName, method: &str) -> InvokeFn<F::Handle> {
        let shared = Arc::downgrade(self);
        let owner = type_name.clone();
        let method = method.to_string();
        Box::new(move |args: &[Json]| {
            let shared = shared.upgrade().ok_or_else(|| ChainError::ChainDropped {
                type_name: owner.clone(),
                method: method.clone(),
            })?;
            shared.invoke(&owner, &method, args)
        })
    }

    /// One call of `owner::method` with `args`.
    fn invoke(
        self: &Arc<Self>,
        owner: &TypeName,
        method: &str,
        args: &[Json],
    ) -> Result<Value<F::Handle>> {
        let outcome = {
            let mut guard = self.state.lock();
            let ChainState {
                registry, store, ..
            } = &mut *guard;
            let Some(declaration) = registry.declaration_mut(owner, method) else {
                return Ok(Value::Null);
            };
            if let Some(label) = &declaration.label {
                debug!(type_name = %owner, method, label = %label, "capturing arguments");
                store.record(label, args);
            }
            match declaration.rule.as_mut() {
                Some(rule) => resolve(rule, args, store)?,
                None => Outcome::Value(Value::Null),
            }
        };

        match outcome {
            // Naming the owner itself hits the cache and yields the stub
            // whose method is being invoked.
            Outcome::Build(type_name) => self.build(&type_name).map(Value::Stub),
            Outcome::Value(value) => {
                let named = self
                    .type_names
                    .candidate(&value)
                    .filter(|name| self.knows_type(name))
                    .map(TypeName::from);
                match named {
                    Some(type_name) => self.build(&type_name).map(Value::Stub),
                    None => Ok(value),
                }
            }
        }
    }

    fn knows_type(&self, name: &str) -> bool {
        self.state.lock().registry.contains(name) || self.framework.knows_type(name)
    }
}
