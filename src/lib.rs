#![forbid(unsafe_code)]

//! Mock Chain: declarative return behavior for test stubs.
//!
//! One declaration per (type, method) says what a stubbed call returns:
//! 1. **Literals**: values (or already-built stubs) returned as is
//! 2. **Type references**: another stub, built on demand and cached per type
//! 3. **Sequences**: successive calls walk a list, repeating its last entry
//! 4. **Options**: the call's arguments pick the rule from a keyed table
//! 5. **Directed errors**: the call fails with a given error
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use mock_chain::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> mock_chain::prelude::Result<()> {
//! let catalog = TypeCatalog::new()
//!     .with_type("System", ["getName", "getOrgan"])
//!     .with_type("Organ", ["getName"]);
//!
//! let mut chain = Chain::new(DynamicStubs::new(catalog));
//! chain
//!     .add("System", "getName", "digestive")
//!     .addd("getOrgan", Rule::of_type("Organ"))?
//!     .add("Organ", "getName", Sequence::new().add("mouth").add("stomach"));
//!
//! let system = chain.get_mock()?;
//! let _organ = system.call("getOrgan", &[json!("mouth")])?;
//! # Ok(())
//! # }
//! ```

pub mod prelude;

pub mod chain;
pub mod core;
pub mod dynamic;
pub mod rules;
