//! Config Parser: decode the `key=value` input blob into an [`OptionSet`].
//!
//! Assignments are whitespace separated (spaces or newlines). The first `=`
//! splits key from value; later `=` characters stay in the value. Keys outside
//! the vocabulary are dropped with a warning, never rejected.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::ConfigError;

/// One recognized option name and the constraints the parser enforces on it.
#[derive(Debug, Clone, Copy)]
pub struct KeySpec {
    pub name: &'static str,
    pub required: bool,
    pub allowed: &'static [&'static str],
}

impl KeySpec {
    pub const fn optional(name: &'static str) -> Self { Self { name, required: false, allowed: &[] } }
    pub const fn required(name: &'static str) -> Self { Self { name, required: true, allowed: &[] } }
    pub const fn one_of(self, allowed: &'static [&'static str]) -> Self { Self { allowed, ..self } }
}

/// Validated option values. Every recognized key is present; unset keys map to `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet(BTreeMap<String, String>);

impl OptionSet {
    pub fn new() -> Self { Self::default() }
    pub fn with(mut self, key: &str, value: &str) -> Self { self.0.insert(key.into(), value.into()); self }

    /// Value for `key`, or the empty string when unset or unknown.
    pub fn get(&self, key: &str) -> &str { self.0.get(key).map(String::as_str).unwrap_or("") }

    pub fn is_set(&self, key: &str) -> bool { !self.get(key).is_empty() }

    /// Boolean view of an option: only the exact literal `true` turns it on.
    pub fn switch(&self, key: &str) -> bool { self.get(key) == "true" }

    pub fn keys(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }
}

pub fn parse(raw: &str, vocab: &[KeySpec]) -> Result<OptionSet, ConfigError> {
    let mut values: BTreeMap<String, String> = BTreeMap::new();

    for token in raw.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            warn!(%token, "unknown parameter, no `=` in assignment");
            continue;
        };
        if !vocab.iter().any(|k| k.name == key) {
            warn!(%key, "unknown parameter dropped");
            continue;
        }
        values.insert(key.to_string(), value.to_string());
    }

    for spec in vocab {
        let value = values.entry(spec.name.to_string()).or_default();
        if value.is_empty() {
            if spec.required {
                return Err(ConfigError::MissingRequired { key: spec.name.to_string() });
            }
            continue;
        }
        if !spec.allowed.is_empty() && !spec.allowed.contains(&value.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: spec.name.to_string(),
                value: value.clone(),
                allowed: spec.allowed.iter().map(|s| s.to_string()).collect(),
            });
        }
    }

    Ok(OptionSet(values))
}
