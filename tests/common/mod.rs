//! Anatomy fixture domain shared by the integration tests.
//!
//! `Body` is real code under test: it only talks to `System` and `Organ`
//! through stub calls, the way production code would talk to collaborators.

#![allow(dead_code)]

use mock_chain::prelude::*;
use serde_json::Value as Json;

pub fn anatomy_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with_type("Body", ["addSystem", "getSystem", "getSystems", "getOrgans"])
        .with_type("System", ["getName", "addOrgan", "getOrgan", "getOrgans"])
        .with_type("Organ", ["getName", "shoutName", "getNeighbor"])
}

pub fn anatomy_chain() -> Chain<DynamicStubs> {
    Chain::new(DynamicStubs::new(anatomy_catalog()))
}

/// Calls `method` and expects a plain string back.
pub fn call_str(stub: &DynStub, method: &str, args: &[Json]) -> String {
    let value = stub
        .call(method, args)
        .unwrap_or_else(|err| panic!("{method} failed: {err}"));
    value
        .as_str()
        .unwrap_or_else(|| panic!("{method} returned {value:?}, expected a string"))
        .to_string()
}

/// Calls `method` and expects a stub back.
pub fn call_stub(stub: &DynStub, method: &str, args: &[Json]) -> DynStub {
    match stub.call(method, args) {
        Ok(Value::Stub(found)) => found,
        Ok(other) => panic!("{method} returned {other:?}, expected a stub"),
        Err(err) => panic!("{method} failed: {err}"),
    }
}

pub struct Body {
    systems: Vec<DynStub>,
}

impl Body {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    pub fn add_system(&mut self, system: DynStub) {
        self.systems.push(system);
    }

    pub fn get_system(&self, name: &str) -> Result<Option<DynStub>> {
        for system in &self.systems {
            if system.call("getName", &[])?.as_str() == Some(name) {
                return Ok(Some(system.clone()));
            }
        }
        Ok(None)
    }

    pub fn get_systems(&self) -> Result<Vec<String>> {
        self.systems
            .iter()
            .map(|system| {
                Ok(system
                    .call("getName", &[])?
                    .as_str()
                    .unwrap_or_default()
                    .to_string())
            })
            .collect()
    }

    pub fn get_organs(&self) -> Result<Vec<String>> {
        let mut organs = Vec::new();
        for system in &self.systems {
            let listed = system.call("getOrgans", &[])?;
            for organ in listed.as_list().unwrap_or_default() {
                if let Some(organ) = organ.as_stub() {
                    let name = organ.call("getName", &[])?;
                    organs.push(name.as_str().unwrap_or_default().to_string());
                }
            }
        }
        Ok(organs)
    }
}
