//! Per-chain state that outlives single invocations: built stubs and
//! captured call arguments.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value as Json;

use crate::rules::rule::TypeName;

/// At most one stub per type; every reference to a type resolves to it.
#[derive(Debug)]
pub(crate) struct MockCache<H> {
    stubs: BTreeMap<TypeName, H>,
}

impl<H> Default for MockCache<H> {
    fn default() -> Self {
        Self {
            stubs: BTreeMap::new(),
        }
    }
}

impl<H: Clone> MockCache<H> {
    pub fn get(&self, type_name: &TypeName) -> Option<&H> {
        self.stubs.get(type_name)
    }

    /// Keeps an already cached stub over `stub`, returning whichever wins.
    pub fn insert_if_absent(&mut self, type_name: TypeName, stub: H) -> H {
        self.stubs.entry(type_name).or_insert(stub).clone()
    }

    pub fn types(&self) -> Vec<TypeName> {
        self.stubs.keys().cloned().collect()
    }
}

/// Most recent arguments per store label. Captures overwrite.
#[derive(Debug, Default)]
pub(crate) struct CaptureStore {
    inputs: HashMap<String, Vec<Json>>,
}

impl CaptureStore {
    pub fn record(&mut self, label: &str, args: &[Json]) {
        self.inputs.insert(label.to_string(), args.to_vec());
    }

    /// Empty when nothing was captured under `label`.
    pub fn get(&self, label: &str) -> &[Json] {
        self.inputs.get(label).map(Vec::as_slice).unwrap_or_default()
    }
}
