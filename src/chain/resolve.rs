//! Return resolution: turns a declared rule plus live call arguments into a
//! value, a type to build, or an error.

use regex::Regex;
use serde_json::Value as Json;
use tracing::trace;

use super::cache::CaptureStore;
use crate::core::config::ResolutionConfig;
use crate::core::errors::{ChainError, Result};
use crate::rules::rule::{Rule, TypeName};
use crate::rules::value::Value;

/// Terminal result of walking a rule. Building is left to the caller so the
/// registry borrow that holds the rule ends first.
#[derive(Debug)]
pub(crate) enum Outcome<H> {
    Value(Value<H>),
    Build(TypeName),
}

/// Walks `rule` for one invocation.
///
/// Sequences advance exactly once per level they are reached at; option
/// tables key on `args` merged with the stored arguments they use.
pub(crate) fn resolve<H: Clone>(
    rule: &mut Rule<H>,
    args: &[Json],
    store: &CaptureStore,
) -> Result<Outcome<H>> {
    trace!(kind = rule.kind(), "resolving rule");
    match rule {
        Rule::Null => Ok(Outcome::Value(Value::Null)),
        Rule::Sequence(seq) => match seq.advance() {
            Some(next) => resolve(next, args, store),
            None => Ok(Outcome::Value(Value::Null)),
        },
        Rule::Options(options) => {
            let stored = options.uses().map(|label| store.get(label)).unwrap_or_default();
            let key = options.derive_key(args, stored)?;
            trace!(key = %key, "option lookup");
            match options.fetch(key.as_str()) {
                Some(next) => resolve(next, args, store),
                None => Err(ChainError::OptionNotFound {
                    key: key.to_string(),
                }),
            }
        }
        Rule::Error(error) => Err(ChainError::Directed(error.clone())),
        Rule::Type(type_name) => Ok(Outcome::Build(type_name.clone())),
        Rule::Literal(value) => Ok(Outcome::Value(value.clone())),
    }
}

/// Decides whether a plain string literal stands for a type.
#[derive(Debug, Clone, Default)]
pub(crate) struct TypeNameMatcher {
    pattern: Option<Regex>,
}

impl TypeNameMatcher {
    pub fn from_config(config: &ResolutionConfig) -> Result<Self> {
        Ok(Self {
            pattern: config.type_name_regex()?,
        })
    }

    /// The string in `value` when it looks like a type name. Always `None`
    /// under the explicit policy.
    pub fn candidate<'a, H>(&self, value: &'a Value<H>) -> Option<&'a str> {
        let pattern = self.pattern.as_ref()?;
        value.as_str().filter(|text| pattern.is_match(text))
    }
}
