//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use mock_chain::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, TypeNamePolicy};
pub use crate::core::errors::{ChainError, Result};

// Rules
pub use crate::rules::options::{OptionKey, Options};
pub use crate::rules::rule::{DirectedError, ReturnNull, Rule, TypeName};
pub use crate::rules::sequence::Sequence;
pub use crate::rules::value::{ArgumentList, Value};

// Chain
pub use crate::chain::Chain;
pub use crate::chain::framework::{InvokeFn, StubFramework};

// Bundled framework
pub use crate::dynamic::catalog::{TypeCatalog, TypeShape};
pub use crate::dynamic::stub::{DynStub, DynamicStubs};
