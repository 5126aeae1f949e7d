//! Boundary with the test-double framework that creates interceptable stubs.

use serde_json::Value as Json;

use crate::core::errors::Result;
use crate::rules::rule::TypeName;
use crate::rules::value::Value;

/// Callback run whenever an intercepted method is invoked on a stub. Its
/// result (value or error) is the outcome of the call.
pub type InvokeFn<H> = Box<dyn Fn(&[Json]) -> Result<Value<H>> + Send + Sync>;

/// Capability a [`Chain`](super::Chain) needs from a stubbing framework.
pub trait StubFramework: Send + Sync + 'static {
    /// Handle to a built stub. Clones must refer to the same stub.
    type Handle: Clone + Send + Sync + 'static;

    /// Builds a stub of `type_name` intercepting exactly `methods`.
    ///
    /// Must fail with a configuration error when a method does not exist on
    /// the type.
    fn create_stub(&self, type_name: &TypeName, methods: &[String]) -> Result<Self::Handle>;

    /// Routes invocations of `method` on `stub` to `callback`.
    fn on_invoke(
        &self,
        stub: &Self::Handle,
        method: &str,
        callback: InvokeFn<Self::Handle>,
    ) -> Result<()>;

    /// Whether `type_name` names a type this framework could stub.
    fn knows_type(&self, _type_name: &str) -> bool {
        false
    }
}
