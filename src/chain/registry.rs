//! Declared rules per (type, method), plus root/last-type bookkeeping.

use std::collections::BTreeMap;

use crate::rules::rule::{Rule, TypeName};

/// What one `add` recorded for a method.
#[derive(Debug, Clone)]
pub(crate) struct Declaration<H> {
    /// `None` intercepts the method but resolves every call to null.
    pub rule: Option<Rule<H>>,
    /// Store label capturing the arguments of every call.
    pub label: Option<String>,
}

#[derive(Debug)]
pub(crate) struct Registry<H> {
    types: BTreeMap<TypeName, BTreeMap<String, Declaration<H>>>,
    root: Option<TypeName>,
    last: Option<TypeName>,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self {
            types: BTreeMap::new(),
            root: None,
            last: None,
        }
    }
}

impl<H> Registry<H> {
    /// Records `type_name` as known, as the last type, and as root when it is
    /// the first one.
    pub fn declare_type(&mut self, type_name: TypeName) {
        if self.root.is_none() {
            self.root = Some(type_name.clone());
        }
        self.types.entry(type_name.clone()).or_default();
        self.last = Some(type_name);
    }

    /// Declares `method` on `type_name`. A later declaration replaces the
    /// rule; the store label is only replaced when a new one is given.
    pub fn declare(
        &mut self,
        type_name: TypeName,
        method: String,
        rule: Option<Rule<H>>,
        label: Option<String>,
    ) {
        self.declare_type(type_name.clone());
        let methods = self.types.entry(type_name).or_default();
        match methods.get_mut(&method) {
            Some(existing) => {
                existing.rule = rule;
                if label.is_some() {
                    existing.label = label;
                }
            }
            None => {
                methods.insert(method, Declaration { rule, label });
            }
        }
    }

    pub fn root(&self) -> Option<&TypeName> {
        self.root.as_ref()
    }

    pub fn last(&self) -> Option<&TypeName> {
        self.last.as_ref()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.keys().any(|known| known.as_str() == type_name)
    }

    /// Method names declared for `type_name`, sorted.
    pub fn methods(&self, type_name: &TypeName) -> Vec<String> {
        self.types
            .get(type_name)
            .map(|methods| methods.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn declaration_mut(
        &mut self,
        type_name: &TypeName,
        method: &str,
    ) -> Option<&mut Declaration<H>> {
        self.types.get_mut(type_name)?.get_mut(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_type_is_root_and_last_tracks_latest() {
        let mut registry: Registry<()> = Registry::default();
        registry.declare_type(TypeName::from("System"));
        registry.declare(
            TypeName::from("Organ"),
            "getName".to_string(),
            Some(Rule::from("mouth")),
            None,
        );
        assert_eq!(registry.root().map(TypeName::as_str), Some("System"));
        assert_eq!(registry.last().map(TypeName::as_str), Some("Organ"));
        assert!(registry.contains("System"));
        assert!(registry.methods(&TypeName::from("System")).is_empty());
        assert_eq!(registry.methods(&TypeName::from("Organ")), vec!["getName"]);
    }

    #[test]
    fn redeclaring_keeps_the_label_unless_replaced() {
        let mut registry: Registry<()> = Registry::default();
        let organ = TypeName::from("Organ");
        registry.declare(
            organ.clone(),
            "getName".to_string(),
            Some(Rule::from("a")),
            Some("names".to_string()),
        );
        registry.declare(organ.clone(), "getName".to_string(), Some(Rule::from("b")), None);

        let declaration = registry.declaration_mut(&organ, "getName").unwrap();
        assert_eq!(declaration.label.as_deref(), Some("names"));
        assert!(matches!(&declaration.rule, Some(Rule::Literal(v)) if v.as_str() == Some("b")));
    }
}
