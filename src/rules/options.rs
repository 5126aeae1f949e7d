//! Argument-keyed rule tables.
//!
//! Keys are canonical strings: a string argument is its own key, other
//! scalars use their JSON text and arrays/objects their compact JSON encoding
//! (object fields sorted), so structurally equal arguments share one key.

#![allow(missing_docs)]

use std::fmt;

use serde_json::{Map, Value as Json};

use super::rule::Rule;
use crate::core::errors::{ChainError, Result};

/// Canonical lookup key of an [`Options`] table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OptionKey(String);

impl OptionKey {
    /// Key for a single argument.
    #[must_use]
    pub fn from_argument(argument: &Json) -> Self {
        match argument {
            Json::String(text) => Self(text.clone()),
            other => Self(canonical(other).to_string()),
        }
    }

    /// Key for a whole argument list.
    #[must_use]
    pub fn from_arguments(arguments: &[Json]) -> Self {
        Self(Json::Array(arguments.iter().map(canonical).collect()).to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rebuilds `value` with every object's fields inserted in sorted order, so
/// the encoding does not depend on the map's iteration order.
fn canonical(value: &Json) -> Json {
    match value {
        Json::Array(items) => Json::Array(items.iter().map(canonical).collect()),
        Json::Object(fields) => {
            let mut sorted: Vec<(&String, &Json)> = fields.iter().collect();
            sorted.sort_by(|(left, _), (right, _)| left.cmp(right));
            Json::Object(
                sorted
                    .into_iter()
                    .map(|(name, field)| (name.clone(), canonical(field)))
                    .collect::<Map<String, Json>>(),
            )
        }
        scalar => scalar.clone(),
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OptionKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OptionKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Json> for OptionKey {
    fn from(value: Json) -> Self {
        Self::from_argument(&value)
    }
}

impl From<&Json> for OptionKey {
    fn from(value: &Json) -> Self {
        Self::from_argument(value)
    }
}

macro_rules! key_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for OptionKey {
                fn from(value: $ty) -> Self {
                    Self::from_argument(&Json::from(value))
                }
            }
        )*
    };
}

key_from_scalar!(bool, i32, i64, u32, u64, usize);

/// Table of rules selected by the arguments of the call being resolved.
#[derive(Debug, Clone)]
pub struct Options<H> {
    entries: Vec<(OptionKey, Rule<H>)>,
    index: Option<usize>,
    uses: Option<String>,
}

impl<H> Default for Options<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            uses: None,
        }
    }
}

impl<H> Options<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `rule` under `key`. Re-adding a key replaces its rule in place.
    #[must_use]
    pub fn add(mut self, key: impl Into<OptionKey>, rule: impl Into<Rule<H>>) -> Self {
        self.insert(key, rule);
        self
    }

    pub fn insert(&mut self, key: impl Into<OptionKey>, rule: impl Into<Rule<H>>) {
        let key = key.into();
        let rule = rule.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = rule,
            None => self.entries.push((key, rule)),
        }
    }

    /// Merges the arguments last stored under `label` into key derivation.
    #[must_use]
    pub fn using(mut self, label: impl Into<String>) -> Self {
        self.uses = Some(label.into());
        self
    }

    /// Picks the argument at `index` as the key when several are present.
    #[must_use]
    pub const fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    #[must_use]
    pub fn uses(&self) -> Option<&str> {
        self.uses.as_deref()
    }

    /// Registered keys in insertion order.
    #[must_use]
    pub fn options(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    /// Looks up the rule for `key`.
    ///
    /// A non-empty sequence stored under `key` is advanced and its current
    /// step is returned, so repeated lookups walk the sequence. `None` when
    /// the key is not registered.
    pub fn fetch(&mut self, key: &str) -> Option<&mut Rule<H>> {
        let rule = &mut self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.as_str() == key)?
            .1;
        let walk = matches!(rule, Rule::Sequence(seq) if !seq.is_empty());
        match (walk, rule) {
            (true, Rule::Sequence(seq)) => seq.advance(),
            (_, other) => Some(other),
        }
    }

    /// Derives the lookup key for a call.
    ///
    /// `stored` is appended to `args` when this table uses a store label. A
    /// single merged argument is the key; otherwise the configured index
    /// selects one; otherwise the whole merged list is serialized.
    pub fn derive_key(&self, args: &[Json], stored: &[Json]) -> Result<OptionKey> {
        let mut merged = args.to_vec();
        if self.uses.is_some() {
            merged.extend_from_slice(stored);
        }

        if let [single] = merged.as_slice() {
            return Ok(OptionKey::from_argument(single));
        }
        if let Some(index) = self.index {
            return merged
                .get(index)
                .map(OptionKey::from_argument)
                .ok_or(ChainError::MissingArgument {
                    index,
                    len: merged.len(),
                });
        }
        Ok(OptionKey::from_arguments(&merged))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::sequence::Sequence;
    use crate::rules::value::Value;
    use serde_json::json;

    fn fetch_str(options: &mut Options<()>, key: &str) -> Option<String> {
        match options.fetch(key)? {
            Rule::Literal(value) => value.as_str().map(str::to_string),
            _ => None,
        }
    }

    #[test]
    fn fetch_walks_sequence_entries() {
        let mut options: Options<()> = Options::new()
            .add("hello", "goodbye")
            .add("hola", "chao")
            .add("multi", Sequence::new().add("adieu").add("shalom"));

        assert_eq!(options.options(), vec!["hello", "hola", "multi"]);
        assert_eq!(fetch_str(&mut options, "hello").as_deref(), Some("goodbye"));
        assert_eq!(fetch_str(&mut options, "hello").as_deref(), Some("goodbye"));
        assert_eq!(fetch_str(&mut options, "hola").as_deref(), Some("chao"));
        assert_eq!(fetch_str(&mut options, "multi").as_deref(), Some("adieu"));
        assert_eq!(fetch_str(&mut options, "multi").as_deref(), Some("shalom"));
        assert_eq!(fetch_str(&mut options, "multi").as_deref(), Some("shalom"));
        assert!(options.fetch("not-an-option").is_none());
    }

    #[test]
    fn index_and_use_are_recorded() {
        let options: Options<()> = Options::new().with_index(2).using("organ");
        assert_eq!(options.index(), Some(2));
        assert_eq!(options.uses(), Some("organ"));
    }

    #[test]
    fn re_adding_a_key_replaces_in_place() {
        let mut options: Options<()> = Options::new().add("a", 1).add("b", 2).add("a", 3);
        assert_eq!(options.options(), vec!["a", "b"]);
        assert!(matches!(options.fetch("a"), Some(Rule::Literal(Value::Json(n))) if *n == 3));
    }

    #[test]
    fn non_scalar_keys_are_canonical_json() {
        let mut options: Options<()> = Options::new().add(json!(["lung", 0]), "left lung");
        assert_eq!(options.options(), vec![r#"["lung",0]"#]);
        assert_eq!(
            fetch_str(&mut options, r#"["lung",0]"#).as_deref(),
            Some("left lung")
        );

        let left = OptionKey::from(json!({"b": 1, "a": 2}));
        let right = OptionKey::from(json!({"a": 2, "b": 1}));
        assert_eq!(left, right);
    }

    #[test]
    fn object_keys_are_sorted_whatever_the_insertion_order() {
        let build = |fields: &[(&str, Json)]| {
            Json::Object(
                fields
                    .iter()
                    .map(|(name, value)| ((*name).to_string(), value.clone()))
                    .collect(),
            )
        };
        let forward = build(&[("b", json!(1)), ("a", json!({"y": 2, "x": 3}))]);
        let backward = build(&[("a", json!({"x": 3, "y": 2})), ("b", json!(1))]);

        let key = OptionKey::from_argument(&forward);
        assert_eq!(key, OptionKey::from_argument(&backward));
        assert_eq!(key.as_str(), r#"{"a":{"x":3,"y":2},"b":1}"#);
        assert_eq!(
            OptionKey::from_arguments(&[forward]),
            OptionKey::from_arguments(&[backward])
        );
    }

    #[test]
    fn scalar_keys_match_scalar_arguments() {
        assert_eq!(OptionKey::from(0).as_str(), "0");
        assert_eq!(OptionKey::from(true).as_str(), "true");
        assert_eq!(OptionKey::from("mouth").as_str(), "mouth");
        assert_eq!(OptionKey::from_argument(&json!("mouth")).as_str(), "mouth");
    }

    #[test]
    fn derive_key_prefers_single_then_index_then_serialization() {
        let plain: Options<()> = Options::new();
        assert_eq!(
            plain.derive_key(&[json!("mouth")], &[]).unwrap().as_str(),
            "mouth"
        );
        assert_eq!(
            plain
                .derive_key(&[json!("lung"), json!(1)], &[])
                .unwrap()
                .as_str(),
            r#"["lung",1]"#
        );

        let indexed: Options<()> = Options::new().with_index(1);
        assert_eq!(
            indexed
                .derive_key(&[json!("lung"), json!(1)], &[])
                .unwrap()
                .as_str(),
            "1"
        );
        assert_eq!(
            indexed.derive_key(&[json!("lone")], &[]).unwrap().as_str(),
            "lone"
        );
    }

    #[test]
    fn derive_key_reports_out_of_range_index() {
        let indexed: Options<()> = Options::new().with_index(5);
        let err = indexed
            .derive_key(&[json!("a"), json!("b")], &[])
            .expect_err("index past the arguments");
        assert!(matches!(err, ChainError::MissingArgument { index: 5, len: 2 }));
    }

    #[test]
    fn stored_arguments_only_merge_when_used() {
        let stored = [json!("stomach")];
        let plain: Options<()> = Options::new();
        assert_eq!(plain.derive_key(&[], &stored).unwrap().as_str(), "[]");

        let using: Options<()> = Options::new().using("organ");
        assert_eq!(using.derive_key(&[], &stored).unwrap().as_str(), "stomach");
        assert_eq!(
            using.derive_key(&[json!(1)], &stored).unwrap().as_str(),
            r#"[1,"stomach"]"#
        );
    }
}
