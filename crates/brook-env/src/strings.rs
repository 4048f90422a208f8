#![forbid(unsafe_code)]

//! Localized string lookup as a capability.
//!
//! The engine never ships string tables; hosts provide one through
//! [`StringTable`]. Substitutions use `%{name}` placeholders.

use std::collections::HashMap;

/// Localized string lookup.
pub trait StringTable {
    /// The localized string for `key`, or `None` when the table has no
    /// entry.
    fn lookup(&self, key: &str) -> Option<String>;

    /// Resolve `key` with a fallback `default`, applying `%{name}`
    /// substitutions to whichever string is chosen.
    fn resolve(&self, key: &str, default: &str, substitutions: &[(&str, &str)]) -> String {
        let template = self.lookup(key).unwrap_or_else(|| default.to_string());
        substitute(&template, substitutions)
    }
}

fn substitute(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in substitutions {
        out = out.replace(&format!("%{{{name}}}"), value);
    }
    out
}

/// A table with no entries; every resolve falls through to its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStrings;

impl StringTable for IdentityStrings {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

/// An in-memory table, mostly for tests and small hosts.
#[derive(Debug, Clone, Default)]
pub struct KeyedStrings {
    entries: HashMap<String, String>,
}

impl KeyedStrings {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl StringTable for KeyedStrings {
    fn lookup(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}
